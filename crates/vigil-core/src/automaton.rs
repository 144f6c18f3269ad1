//! Policy automata: deterministic per-tick state machines with auxiliary
//! counters, one variant per policy shape. Every variant carries exactly the
//! counters it needs and exposes the same advance/acceptance contract, so the
//! store and the classifier stay shape-agnostic.

use serde::{Deserialize, Serialize};

use crate::domain::{Snapshot, SnapshotKind};
use crate::error::{AutomatonError, ConfigError};
use crate::verdict::Acceptance;

/// Actuator substitution a policy declares for non-compliant ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Patch {
    /// Overwrite the `b` field of a logic snapshot.
    LogicB(bool),
}

impl Patch {
    pub fn apply(self, snapshot: &mut Snapshot) -> Result<(), AutomatonError> {
        match (self, snapshot) {
            (Patch::LogicB(value), Snapshot::Logic { b, .. }) => {
                *b = value;
                Ok(())
            }
            (Patch::LogicB(_), other) => Err(AutomatonError::SnapshotKind {
                expected: SnapshotKind::Logic,
                got: other.kind(),
            }),
        }
    }
}

/// One-tick boolean delay: the actuated output must equal the previous
/// tick's input. The whole history the policy needs is that one bit; the
/// declared default before the first tick is false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatchAutomaton {
    prev_in: bool,
    required_out: bool,
    matched: bool,
}

impl LatchAutomaton {
    pub fn new() -> Self {
        LatchAutomaton {
            prev_in: false,
            required_out: false,
            matched: true,
        }
    }

    fn step(&mut self, a: bool, b: bool) {
        self.required_out = self.prev_in;
        self.matched = b == self.required_out;
        self.prev_in = a;
    }

    /// The output value the policy requires for the tick just advanced.
    pub fn required_out(&self) -> bool {
        self.required_out
    }

    fn acceptance(&self) -> Acceptance {
        Acceptance {
            accepting: self.matched,
            terminal: false,
        }
    }
}

impl Default for LatchAutomaton {
    fn default() -> Self {
        Self::new()
    }
}

/// Phase of the cooling-window policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoolingPhase {
    NotYetHeated,
    Cooling,
    Safe,
    Expired,
}

impl CoolingPhase {
    pub fn code(self) -> u8 {
        match self {
            CoolingPhase::NotYetHeated => 0,
            CoolingPhase::Cooling => 1,
            CoolingPhase::Safe => 2,
            CoolingPhase::Expired => 3,
        }
    }
}

/// Thresholds for the cooling-window policy, in whole degrees and ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolingParams {
    pub hot_threshold: i64,
    pub window_lo: i64,
    pub window_hi: i64,
    pub max_window_age: u64,
}

impl CoolingParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_lo > self.window_hi {
            return Err(ConfigError::InvertedWindow {
                lo: self.window_lo,
                hi: self.window_hi,
            });
        }
        if self.hot_threshold <= self.window_hi {
            return Err(ConfigError::HotThresholdInsideWindow {
                hot: self.hot_threshold,
                hi: self.window_hi,
            });
        }
        if self.max_window_age == 0 {
            return Err(ConfigError::ZeroWindowAge);
        }
        Ok(())
    }
}

impl Default for CoolingParams {
    fn default() -> Self {
        CoolingParams {
            hot_threshold: 160,
            window_lo: 35,
            window_hi: 55,
            max_window_age: 40,
        }
    }
}

/// Two-phase quantitative policy over a numeric reading: the quantity must
/// cross `hot_threshold`, then cool into `[window_lo, window_hi]`; only while
/// inside that window, and for at most `max_window_age` ticks after first
/// entering it, does the property hold. Expiry is a trap: once the age limit
/// elapses the verdict is settled even if the reading re-enters the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoolingAutomaton {
    params: CoolingParams,
    phase: CoolingPhase,
    /// Ticks since the reading last crossed the hot threshold.
    since_hot: u64,
    /// Ticks since the reading first dropped into the safe window.
    window_age: u64,
    window_entered: bool,
}

impl CoolingAutomaton {
    pub fn new(params: CoolingParams) -> Self {
        CoolingAutomaton {
            params,
            phase: CoolingPhase::NotYetHeated,
            since_hot: 0,
            window_age: 0,
            window_entered: false,
        }
    }

    fn in_window(&self, t: i64) -> bool {
        t >= self.params.window_lo && t <= self.params.window_hi
    }

    fn step(&mut self, t: i64) {
        // Timers run only once the quantity has been hot; window age counts
        // from the first window entry and is never reset afterwards.
        if matches!(self.phase, CoolingPhase::Cooling | CoolingPhase::Safe) {
            self.since_hot += 1;
            if self.window_entered {
                self.window_age += 1;
            }
        }
        match self.phase {
            CoolingPhase::NotYetHeated => {
                if t >= self.params.hot_threshold {
                    self.phase = CoolingPhase::Cooling;
                    self.since_hot = 0;
                }
            }
            CoolingPhase::Cooling => {
                if self.window_entered && self.window_age > self.params.max_window_age {
                    self.phase = CoolingPhase::Expired;
                } else if t >= self.params.hot_threshold {
                    self.since_hot = 0;
                } else if self.in_window(t) {
                    self.phase = CoolingPhase::Safe;
                    if !self.window_entered {
                        self.window_entered = true;
                        self.window_age = 0;
                    }
                } else if t < self.params.window_lo {
                    // Overshot past the window while cooling; it was missed.
                    self.phase = CoolingPhase::Expired;
                }
            }
            CoolingPhase::Safe => {
                if self.window_age > self.params.max_window_age {
                    self.phase = CoolingPhase::Expired;
                } else if t > self.params.window_hi {
                    self.phase = CoolingPhase::Cooling;
                } else if t < self.params.window_lo {
                    self.phase = CoolingPhase::Expired;
                }
            }
            CoolingPhase::Expired => {}
        }
    }

    pub fn phase(&self) -> CoolingPhase {
        self.phase
    }

    pub fn since_hot(&self) -> u64 {
        self.since_hot
    }

    pub fn window_age(&self) -> u64 {
        self.window_age
    }

    fn acceptance(&self) -> Acceptance {
        match self.phase {
            CoolingPhase::Safe => Acceptance {
                accepting: true,
                terminal: false,
            },
            CoolingPhase::Expired => Acceptance {
                accepting: false,
                terminal: true,
            },
            CoolingPhase::NotYetHeated | CoolingPhase::Cooling => Acceptance {
                accepting: false,
                terminal: false,
            },
        }
    }
}

/// States of the bounded-response policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseState {
    Idle,
    Waiting,
    Done,
    Violation,
}

/// Every request `a` must be answered by `b` within `limit` ticks, with no
/// spurious or doubled events. `Done` and `Violation` are traps, so this is
/// the one built-in shape that can settle on either permanent verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundedResponseAutomaton {
    limit: u64,
    state: ResponseState,
    elapsed: u64,
}

impl BoundedResponseAutomaton {
    pub fn new(limit: u64) -> Self {
        BoundedResponseAutomaton {
            limit,
            state: ResponseState::Idle,
            elapsed: 0,
        }
    }

    fn step(&mut self, a: bool, b: bool) {
        self.elapsed += 1;
        self.state = match self.state {
            ResponseState::Idle => {
                if !a && !b {
                    self.elapsed = 0;
                    ResponseState::Idle
                } else if a && !b {
                    self.elapsed = 0;
                    ResponseState::Waiting
                } else if !a && b {
                    // Answer with no outstanding request.
                    ResponseState::Violation
                } else {
                    ResponseState::Done
                }
            }
            ResponseState::Waiting => {
                if !a && !b && self.elapsed < self.limit {
                    ResponseState::Waiting
                } else if !a && b {
                    ResponseState::Idle
                } else {
                    // Deadline elapsed, or a second request before the answer.
                    ResponseState::Violation
                }
            }
            ResponseState::Done => ResponseState::Done,
            ResponseState::Violation => ResponseState::Violation,
        };
    }

    pub fn state(&self) -> ResponseState {
        self.state
    }

    fn acceptance(&self) -> Acceptance {
        match self.state {
            ResponseState::Idle => Acceptance {
                accepting: true,
                terminal: false,
            },
            ResponseState::Waiting => Acceptance {
                accepting: false,
                terminal: false,
            },
            ResponseState::Done => Acceptance {
                accepting: true,
                terminal: true,
            },
            ResponseState::Violation => Acceptance {
                accepting: false,
                terminal: true,
            },
        }
    }
}

/// The tagged-variant automaton family behind one shared contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Automaton {
    Latch(LatchAutomaton),
    Cooling(CoolingAutomaton),
    BoundedResponse(BoundedResponseAutomaton),
}

impl Automaton {
    /// The snapshot field set this automaton reads.
    pub fn kind(&self) -> SnapshotKind {
        match self {
            Automaton::Latch(_) | Automaton::BoundedResponse(_) => SnapshotKind::Logic,
            Automaton::Cooling(_) => SnapshotKind::Thermal,
        }
    }

    /// Advance one tick. Deterministic and total over legal snapshots; a
    /// snapshot of the wrong kind is a contract violation.
    pub fn advance(&mut self, snapshot: &Snapshot) -> Result<(), AutomatonError> {
        match (&mut *self, snapshot) {
            (Automaton::Latch(m), Snapshot::Logic { a, b }) => {
                m.step(*a, *b);
                Ok(())
            }
            (Automaton::Cooling(m), Snapshot::Thermal { t }) => {
                m.step(*t);
                Ok(())
            }
            (Automaton::BoundedResponse(m), Snapshot::Logic { a, b }) => {
                m.step(*a, *b);
                Ok(())
            }
            (me, other) => Err(AutomatonError::SnapshotKind {
                expected: me.kind(),
                got: other.kind(),
            }),
        }
    }

    /// Acceptance tag of the current state, from the automaton's static
    /// description.
    pub fn acceptance(&self) -> Acceptance {
        match self {
            Automaton::Latch(m) => m.acceptance(),
            Automaton::Cooling(m) => m.acceptance(),
            Automaton::BoundedResponse(m) => m.acceptance(),
        }
    }

    /// Actuator substitution for non-compliant ticks, if the policy controls
    /// an actuator at all. Observer policies return None.
    pub fn fallback(&self) -> Option<Patch> {
        match self {
            Automaton::Latch(m) => Some(Patch::LogicB(m.required_out())),
            Automaton::Cooling(_) | Automaton::BoundedResponse(_) => None,
        }
    }

    /// Return to the declared initial state, keeping the parameters.
    pub fn reset(&mut self) {
        match self {
            Automaton::Latch(m) => *m = LatchAutomaton::new(),
            Automaton::Cooling(m) => *m = CoolingAutomaton::new(m.params),
            Automaton::BoundedResponse(m) => *m = BoundedResponseAutomaton::new(m.limit),
        }
    }
}
