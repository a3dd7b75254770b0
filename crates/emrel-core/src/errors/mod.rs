//! Error handling for emrel.
//! One error enum per concern, `thiserror` only.

pub mod config_error;
pub mod domain_error;
pub mod engine_error;
pub mod error_code;
pub mod output_error;
pub mod simulation_error;
pub mod trace_error;

pub use config_error::ConfigError;
pub use domain_error::DomainError;
pub use engine_error::EngineInvocationError;
pub use error_code::EmrelErrorCode;
pub use output_error::MalformedOutputError;
pub use simulation_error::{SimulationError, SimulationFailure};
pub use trace_error::TraceError;
