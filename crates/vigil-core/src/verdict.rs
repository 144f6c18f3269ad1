use std::fmt;

use serde::{Deserialize, Serialize};

/// Four-valued classification of a policy's compliance given the prefix
/// observed so far. A live stream can rarely be judged definitively, hence
/// the "currently" pair: a compliant prefix may still fail later, and a
/// violating prefix of a co-safety property may still recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// Every continuation satisfies the policy.
    PermanentlyTrue,
    /// The prefix satisfies the policy; some continuation violates it.
    CurrentlyTrue,
    /// The prefix violates the policy; some continuation recovers.
    CurrentlyFalse,
    /// Every continuation violates the policy.
    PermanentlyFalse,
}

impl Verdict {
    pub fn is_compliant(self) -> bool {
        matches!(self, Verdict::PermanentlyTrue | Verdict::CurrentlyTrue)
    }

    /// True once the verdict can no longer change without a reset.
    pub fn is_final(self) -> bool {
        matches!(self, Verdict::PermanentlyTrue | Verdict::PermanentlyFalse)
    }

    /// Numeric status code, 0..=3 from best to worst.
    pub fn code(self) -> u8 {
        match self {
            Verdict::PermanentlyTrue => 0,
            Verdict::CurrentlyTrue => 1,
            Verdict::CurrentlyFalse => 2,
            Verdict::PermanentlyFalse => 3,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::PermanentlyTrue => "TRUE",
            Verdict::CurrentlyTrue => "CURRENTLY TRUE",
            Verdict::CurrentlyFalse => "CURRENTLY FALSE",
            Verdict::PermanentlyFalse => "FALSE",
        };
        f.write_str(s)
    }
}

/// Acceptance tag of one automaton state. `terminal` marks states from which
/// no state of the opposite accepting kind is reachable, so the verdict is
/// settled for good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acceptance {
    pub accepting: bool,
    pub terminal: bool,
}

/// Map a state's acceptance tag to the four-valued verdict. Pure and O(1);
/// only the current state matters, never the path that reached it.
pub fn classify(acceptance: Acceptance) -> Verdict {
    match (acceptance.accepting, acceptance.terminal) {
        (true, true) => Verdict::PermanentlyTrue,
        (true, false) => Verdict::CurrentlyTrue,
        (false, false) => Verdict::CurrentlyFalse,
        (false, true) => Verdict::PermanentlyFalse,
    }
}
