//! Physical-domain errors raised by the analytic model.

use super::error_code::{self, EmrelErrorCode};

/// Invalid physical inputs to the electromigration model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("Absolute temperature must be positive, got {kelvin} K ({celsius} °C)")]
    NonPositiveTemperature { celsius: f64, kelvin: f64 },

    #[error("Elapsed time must be non-negative, got {hours} h")]
    NegativeTime { hours: f64 },

    #[error("Non-finite value for {quantity}: {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    #[error("Invalid model parameter {name}: {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Reliability cannot increase over time ({previous} -> {next})")]
    ReliabilityIncreased { previous: f64, next: f64 },
}

impl EmrelErrorCode for DomainError {
    fn error_code(&self) -> &'static str {
        error_code::DOMAIN_ERROR
    }
}
