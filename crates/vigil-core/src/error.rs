use thiserror::Error;

use crate::domain::SnapshotKind;

/// Invalid policy or monitor configuration. Always fatal at initialisation;
/// bad parameters are never silently defaulted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("policy name must not be empty")]
    EmptyName,
    #[error("safe window is inverted: lo {lo} > hi {hi}")]
    InvertedWindow { lo: i64, hi: i64 },
    #[error("hot threshold {hot} must sit above the safe window (hi {hi})")]
    HotThresholdInsideWindow { hot: i64, hi: i64 },
    #[error("window age limit must be at least one tick")]
    ZeroWindowAge,
    #[error("response deadline must be at least one tick")]
    ZeroDeadline,
    #[error("could not load configuration: {0}")]
    Load(String),
}

/// Programming-contract violation inside an automaton step. Indicates the
/// store was corrupted or mis-wired, not a property of the observed stream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("snapshot kind mismatch: automaton reads {expected} snapshots, got {got}")]
    SnapshotKind {
        expected: SnapshotKind,
        got: SnapshotKind,
    },
}

/// Errors surfaced by the monitor store and enforcement wrapper. Note that a
/// non-compliant verdict is not an error; it is the monitor's normal output.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MonitorError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("contract violation in policy {policy}: {source}")]
    Contract {
        policy: String,
        #[source]
        source: AutomatonError,
    },
    #[error("monitor for policy {policy} was aborted by an earlier contract violation")]
    Poisoned { policy: String },
}
