//! EmrelErrorCode trait for stable, machine-readable error codes.

/// Trait giving every emrel error a stable code string.
/// The CLI prints failures as `[CODE] message`.
pub trait EmrelErrorCode {
    /// Returns the error code string (e.g., "DOMAIN_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const DOMAIN_ERROR: &str = "DOMAIN_ERROR";
pub const ENGINE_INVOCATION_ERROR: &str = "ENGINE_INVOCATION_ERROR";
pub const ENGINE_TIMEOUT: &str = "ENGINE_TIMEOUT";
pub const MALFORMED_OUTPUT: &str = "MALFORMED_OUTPUT";
pub const TRACE_ERROR: &str = "TRACE_ERROR";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const CONVERGENCE_TIMEOUT: &str = "CONVERGENCE_TIMEOUT";
pub const INVALID_SETTINGS: &str = "INVALID_SETTINGS";
pub const INVALID_STATE: &str = "INVALID_STATE";
