use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::verdict::Verdict;

/// Discriminant for the snapshot field set an automaton reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotKind {
    Logic,
    Thermal,
}

impl fmt::Display for SnapshotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotKind::Logic => f.write_str("logic"),
            SnapshotKind::Thermal => f.write_str("thermal"),
        }
    }
}

/// One tick's sensed inputs and actuated outputs. Owned by the caller; the
/// monitor mutates it in place during enforcement and never retains a
/// reference past the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Snapshot {
    /// Boolean input/output pair: `a` is sensed, `b` is actuated.
    Logic { a: bool, b: bool },
    /// Single numeric reading, e.g. a temperature in whole degrees.
    Thermal { t: i64 },
}

impl Snapshot {
    /// Logic snapshot with both fields at their declared default (false).
    pub fn logic() -> Self {
        Snapshot::Logic { a: false, b: false }
    }

    /// Thermal snapshot at the declared default reading (0).
    pub fn thermal() -> Self {
        Snapshot::Thermal { t: 0 }
    }

    pub fn kind(&self) -> SnapshotKind {
        match self {
            Snapshot::Logic { .. } => SnapshotKind::Logic,
            Snapshot::Thermal { .. } => SnapshotKind::Thermal,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One recorded tick: the snapshot the monitor saw and the verdict it
/// produced. Recording is strictly a harness concern; the monitor itself
/// keeps no history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub session_id: SessionId,
    pub seq: u64,
    pub ts_us: i64,
    pub snapshot: Snapshot,
    pub verdict: Verdict,
    pub meta: serde_json::Value,
}
