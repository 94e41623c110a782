//! Error kinds for the scheduler: a flat `thiserror::Error` enum with
//! structured fields rather than a single opaque string.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SchedulerError {
    #[error("invalid partition: expected {expected} global qubits, got {got}")]
    InvalidPartition { expected: usize, got: usize },

    #[error("invalid global swap: {reason}")]
    InvalidGlobalSwap { reason: String },

    #[error("insufficient qubits: circuit has {n} qubits, gate touches {touched}, needs {needed} free for globals")]
    InsufficientQubits {
        n: usize,
        touched: usize,
        needed: usize,
    },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("execute called with no gates queued")]
    PlanEmpty,

    #[error("resource exhausted on device {device}: {reason} (try a smaller device count)")]
    ResourceExhausted { device: String, reason: String },

    #[error("unsupported feature: {0}")]
    UnsupportedFeature(UnsupportedFeature),
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum UnsupportedFeature {
    DensityMatrix,
    NoiseMap,
    NonDeepCopy,
}

impl std::fmt::Display for UnsupportedFeature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnsupportedFeature::DensityMatrix => write!(f, "density-matrix execution"),
            UnsupportedFeature::NoiseMap => write!(f, "noise-map execution"),
            UnsupportedFeature::NonDeepCopy => write!(f, "non-deep plan copy"),
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
