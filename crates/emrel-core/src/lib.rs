//! # emrel-core
//!
//! Foundation crate for the emrel electromigration reliability estimator.
//! Defines errors, config, tracing setup, unit conversions, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod units;

// Re-export the most commonly used types at the crate root.
pub use config::{AreaMode, EmrelConfig, EngineKind};
pub use errors::{
    DomainError, EmrelErrorCode, EngineInvocationError, MalformedOutputError, SimulationError,
    SimulationFailure, TraceError,
};
