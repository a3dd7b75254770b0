//! Malformed engine output errors.

use super::error_code::{self, EmrelErrorCode};

/// The engine's reliability report does not parse or does not match the trace.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedOutputError {
    #[error("Report is missing its header line")]
    MissingHeader,

    #[error("Report is missing its value line")]
    MissingValues,

    #[error("Report has {values} values for {columns} header columns")]
    ColumnCountMismatch { columns: usize, values: usize },

    #[error("Cannot parse value {value:?} for component {component}")]
    InvalidValue { component: String, value: String },

    #[error("Expected {expected} components, engine reported {found}")]
    ComponentCountMismatch { expected: usize, found: usize },

    #[error("Component {index} is {found:?}, expected {expected:?}")]
    ComponentMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Reliability of {component} out of [0, 1]: {value}")]
    OutOfRange { component: String, value: f64 },
}

impl EmrelErrorCode for MalformedOutputError {
    fn error_code(&self) -> &'static str {
        error_code::MALFORMED_OUTPUT
    }
}
