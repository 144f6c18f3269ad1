use serde::{Deserialize, Serialize};

use crate::automaton::{
    Automaton, BoundedResponseAutomaton, CoolingAutomaton, CoolingParams, LatchAutomaton,
};
use crate::error::ConfigError;

/// Static description of one compiled policy: a name, the automaton shape and
/// its parameters. Policies built through the constructors are validated;
/// deserialised ones are re-validated when a monitor is initialised from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    name: String,
    shape: PolicyShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
enum PolicyShape {
    Latch,
    Cooling(CoolingParams),
    BoundedResponse { limit: u64 },
}

impl Policy {
    /// One-tick boolean delay policy with actuator enforcement on `b`.
    pub fn latch() -> Self {
        Policy {
            name: "latch".to_string(),
            shape: PolicyShape::Latch,
        }
    }

    /// Observer-only cooling-window policy over a thermal stream.
    pub fn cooling(params: CoolingParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Policy {
            name: "cooling-window".to_string(),
            shape: PolicyShape::Cooling(params),
        })
    }

    /// Observer-only bounded-response policy: every `a` answered by `b`
    /// within `limit` ticks.
    pub fn bounded_response(limit: u64) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroDeadline);
        }
        Ok(Policy {
            name: "bounded-response".to_string(),
            shape: PolicyShape::BoundedResponse { limit },
        })
    }

    /// Rename the policy, e.g. when several instances of one shape run side
    /// by side.
    pub fn named(mut self, name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        self.name = name;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Re-check the invariants the constructors enforce. Needed because a
    /// policy can also arrive through deserialisation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        match &self.shape {
            PolicyShape::Latch => Ok(()),
            PolicyShape::Cooling(params) => params.validate(),
            PolicyShape::BoundedResponse { limit } => {
                if *limit == 0 {
                    Err(ConfigError::ZeroDeadline)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Build the automaton in its declared initial state.
    pub(crate) fn instantiate(&self) -> Automaton {
        match &self.shape {
            PolicyShape::Latch => Automaton::Latch(LatchAutomaton::new()),
            PolicyShape::Cooling(params) => Automaton::Cooling(CoolingAutomaton::new(*params)),
            PolicyShape::BoundedResponse { limit } => {
                Automaton::BoundedResponse(BoundedResponseAutomaton::new(*limit))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_validate_parameters() {
        assert!(Policy::bounded_response(0).is_err());
        assert!(Policy::bounded_response(5).is_ok());
        let bad = CoolingParams {
            window_lo: 90,
            window_hi: 10,
            ..CoolingParams::default()
        };
        assert!(Policy::cooling(bad).is_err());
    }

    #[test]
    fn rename_rejects_empty() {
        assert_eq!(Policy::latch().named(""), Err(ConfigError::EmptyName));
        let p = Policy::latch().named("delay-1").unwrap();
        assert_eq!(p.name(), "delay-1");
    }

    #[test]
    fn deserialised_policy_is_revalidated() {
        let mut p = Policy::cooling(CoolingParams::default()).unwrap();
        let raw = serde_json::to_string(&p).unwrap().replace("160", "-5");
        p = serde_json::from_str(&raw).unwrap();
        assert!(p.validate().is_err());
    }
}
