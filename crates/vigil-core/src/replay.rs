//! Deterministic replay and state hashing. The monitor keeps no history of
//! its own; a harness that wants to audit a run records per-tick envelopes
//! and can recompute the whole verdict sequence from the initial state.

use blake3::Hasher;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Envelope, SessionId, Snapshot};
use crate::error::MonitorError;
use crate::monitor::MonitorInstance;
use crate::policy::Policy;
use crate::verdict::Verdict;

/// Hash of a monitor's current state: policy name plus the canonical
/// serialisation of the automaton. Two runs over the same snapshot sequence
/// always land on the same hash.
pub fn state_hash(instance: &MonitorInstance) -> [u8; 32] {
    let mut hasher = Hasher::new();
    hasher.update(instance.policy_name().as_bytes());
    hasher.update(&[0]);
    let body =
        serde_json::to_vec(instance.automaton()).expect("automaton state serialises to JSON");
    hasher.update(&body);
    *hasher.finalize().as_bytes()
}

/// In-memory record of one monitored run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayLog {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub records: Vec<Envelope>,
}

impl ReplayLog {
    pub fn new() -> Self {
        ReplayLog {
            session_id: SessionId::new(),
            started_at: Utc::now(),
            records: Vec::new(),
        }
    }

    pub fn record(&mut self, ts_us: i64, snapshot: Snapshot, verdict: Verdict) {
        let seq = self.records.len() as u64 + 1;
        self.records.push(Envelope {
            session_id: self.session_id.clone(),
            seq,
            ts_us,
            snapshot,
            verdict,
            meta: serde_json::json!({}),
        });
    }

    pub fn snapshots(&self) -> impl Iterator<Item = &Snapshot> {
        self.records.iter().map(|r| &r.snapshot)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for ReplayLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute the verdict sequence for a snapshot sequence from the policy's
/// initial state. Process restart implies exactly this: no state survives
/// outside the instance.
pub fn replay<'a, I>(policy: &Policy, snapshots: I) -> Result<Vec<Verdict>, MonitorError>
where
    I: IntoIterator<Item = &'a Snapshot>,
{
    let mut instance = MonitorInstance::init(policy)?;
    let mut verdicts = Vec::new();
    for snapshot in snapshots {
        verdicts.push(instance.advance(snapshot)?);
    }
    Ok(verdicts)
}
