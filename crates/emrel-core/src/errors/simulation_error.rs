//! Simulation driver errors and the terminal failure record.

use super::error_code::{self, EmrelErrorCode};
use super::{DomainError, EngineInvocationError, MalformedOutputError};

/// Errors that end a simulation run.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("Engine invocation error: {0}")]
    Engine(#[from] EngineInvocationError),

    #[error("Malformed engine output: {0}")]
    MalformedOutput(#[from] MalformedOutputError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("No convergence after {iterations} iterations ({elapsed_ms}ms simulated)")]
    ConvergenceTimeout { iterations: u64, elapsed_ms: u64 },

    #[error("Invalid settings for {field}: {message}")]
    InvalidSettings { field: String, message: String },

    #[error("Driver already finished ({phase}); create a new driver to run again")]
    AlreadyFinished { phase: String },
}

impl EmrelErrorCode for SimulationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Engine(e) => e.error_code(),
            Self::MalformedOutput(e) => e.error_code(),
            Self::Domain(e) => e.error_code(),
            Self::ConvergenceTimeout { .. } => error_code::CONVERGENCE_TIMEOUT,
            Self::InvalidSettings { .. } => error_code::INVALID_SETTINGS,
            Self::AlreadyFinished { .. } => error_code::INVALID_STATE,
        }
    }
}

/// A run that ended in the FAILED state: the triggering error plus where it happened.
#[derive(Debug, thiserror::Error)]
#[error("{error} (after {iterations} iterations, {elapsed_ms}ms simulated)")]
pub struct SimulationFailure {
    #[source]
    pub error: SimulationError,
    /// Cumulative simulated time when the failure occurred.
    pub elapsed_ms: u64,
    /// Completed iterations before the failure.
    pub iterations: u64,
}

impl SimulationFailure {
    pub fn new(error: impl Into<SimulationError>, elapsed_ms: u64, iterations: u64) -> Self {
        Self {
            error: error.into(),
            elapsed_ms,
            iterations,
        }
    }
}

impl EmrelErrorCode for SimulationFailure {
    fn error_code(&self) -> &'static str {
        self.error.error_code()
    }
}
