//! Reliability engine invocation errors.

use super::error_code::{self, EmrelErrorCode};

/// The reliability engine could not be run or terminated abnormally.
#[derive(Debug, thiserror::Error)]
pub enum EngineInvocationError {
    #[error("Failed to launch engine {program}: {message}")]
    Spawn { program: String, message: String },

    #[error("Engine exited abnormally ({status}): {stderr}")]
    AbnormalExit { status: String, stderr: String },

    #[error("Engine did not finish within {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Engine I/O on {path}: {message}")]
    Io { path: String, message: String },

    #[error("Engine produced no checkpoint at {path}")]
    MissingCheckpoint { path: String },

    #[error("Unusable checkpoint: {0}")]
    InvalidCheckpoint(String),

    #[error("Engine computation failed: {0}")]
    Computation(String),
}

impl EmrelErrorCode for EngineInvocationError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => error_code::ENGINE_TIMEOUT,
            _ => error_code::ENGINE_INVOCATION_ERROR,
        }
    }
}
