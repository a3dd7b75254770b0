//! Temperature trace parsing errors.

use super::error_code::{self, EmrelErrorCode};

/// Errors reading a temperature trace.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraceError {
    #[error("Trace is empty")]
    Empty,

    #[error("Trace header has an empty component name at column {column}")]
    EmptyName { column: usize },

    #[error("Duplicate component name {name:?}")]
    DuplicateName { name: String },

    #[error("Trace has a header but no temperature rows")]
    NoRows,

    #[error("Row {row} has {found} values, header has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("Row {row}, column {column}: cannot parse {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Cannot read trace {path}: {message}")]
    Io { path: String, message: String },
}

impl EmrelErrorCode for TraceError {
    fn error_code(&self) -> &'static str {
        error_code::TRACE_ERROR
    }
}
