use log::{debug, error, warn};

use crate::automaton::{Automaton, Patch};
use crate::domain::Snapshot;
use crate::error::MonitorError;
use crate::policy::Policy;
use crate::verdict::{classify, Verdict};

/// One live monitor: the automaton state for one policy, advanced once per
/// tick. Instances never share state, so independent policies can be ticked
/// in any order over the same or different snapshots.
#[derive(Debug, Clone)]
pub struct MonitorInstance {
    policy: String,
    automaton: Automaton,
    tick: u64,
    poisoned: bool,
}

impl MonitorInstance {
    /// Build an instance in the policy's declared initial state. Fails only
    /// on an invalid policy description, which is a fatal configuration
    /// error, not a runtime one.
    pub fn init(policy: &Policy) -> Result<Self, MonitorError> {
        policy.validate()?;
        debug!("monitor {}: initialised", policy.name());
        Ok(MonitorInstance {
            policy: policy.name().to_string(),
            automaton: policy.instantiate(),
            tick: 0,
            poisoned: false,
        })
    }

    /// Advance one tick from the given snapshot and return the new verdict.
    /// A contract violation poisons the instance: the verdict could no longer
    /// be trusted, so every later advance fails rather than guess.
    pub fn advance(&mut self, snapshot: &Snapshot) -> Result<Verdict, MonitorError> {
        if self.poisoned {
            return Err(MonitorError::Poisoned {
                policy: self.policy.clone(),
            });
        }
        let before = self.query();
        if let Err(source) = self.automaton.advance(snapshot) {
            self.poisoned = true;
            error!("monitor {}: contract violation: {source}", self.policy);
            return Err(MonitorError::Contract {
                policy: self.policy.clone(),
                source,
            });
        }
        self.tick += 1;
        let verdict = self.query();
        if verdict != before {
            if before.is_compliant() && !verdict.is_compliant() {
                warn!(
                    "monitor {}: verdict {before} -> {verdict} at tick {}",
                    self.policy, self.tick
                );
            } else {
                debug!(
                    "monitor {}: verdict {before} -> {verdict} at tick {}",
                    self.policy, self.tick
                );
            }
        }
        Ok(verdict)
    }

    /// Current verdict, re-derived from the automaton state on every call.
    /// Read-only and idempotent between advances; the verdict is never stored
    /// separately from the state it came from.
    pub fn query(&self) -> Verdict {
        classify(self.automaton.acceptance())
    }

    /// Actuator substitution declared by the policy, if any.
    pub fn fallback(&self) -> Option<Patch> {
        self.automaton.fallback()
    }

    /// Replay from tick zero: declared initial state, tick count cleared,
    /// poisoning cleared.
    pub fn reset(&mut self) {
        self.automaton.reset();
        self.tick = 0;
        self.poisoned = false;
        debug!("monitor {}: reset to initial state", self.policy);
    }

    pub fn policy_name(&self) -> &str {
        &self.policy
    }

    /// Ticks advanced since initialisation or the last reset.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }
}
