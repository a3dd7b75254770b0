//! Serving side of the process-engine file contract.
//!
//! Lets any [`ReliabilityEngine`] act as the external program that
//! [`ProcessEngine`](super::ProcessEngine) shells out to: read the Celsius trace
//! and the previous checkpoint, evaluate one window, write the report and the new
//! checkpoint.

use std::fs;
use std::path::Path;

use tracing::info;

use emrel_core::errors::{EmrelErrorCode, EngineInvocationError, TraceError};

use super::{EngineFault, ReliabilityEngine};
use crate::checkpoint::Checkpoint;
use crate::settings::TimeStep;
use crate::snapshot::write_report;
use crate::trace::{TemperatureTrace, TemperatureUnit};

/// Failure while serving one window.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Engine(#[from] EngineFault),
}

impl From<EngineInvocationError> for ServeError {
    fn from(e: EngineInvocationError) -> Self {
        Self::Engine(EngineFault::Invocation(e))
    }
}

impl EmrelErrorCode for ServeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Trace(e) => e.error_code(),
            Self::Engine(e) => e.error_code(),
        }
    }
}

/// Run one window of `engine` against the contract's files.
///
/// A missing or empty checkpoint file means "first window".
pub fn serve_once<E: ReliabilityEngine + ?Sized>(
    engine: &mut E,
    time_step: TimeStep,
    trace_path: &Path,
    checkpoint_path: &Path,
    report_path: &Path,
) -> Result<(), ServeError> {
    let trace = TemperatureTrace::from_file(trace_path, TemperatureUnit::Celsius)?;
    let previous = read_checkpoint(checkpoint_path)?;

    let output = engine.evaluate(time_step, &trace, previous.as_ref())?;

    write(report_path, write_report(&output.snapshot).as_bytes())?;
    write(checkpoint_path, output.checkpoint.as_bytes())?;
    info!(
        components = output.snapshot.len(),
        checkpoint_bytes = output.checkpoint.len(),
        "window served"
    );
    Ok(())
}

fn read_checkpoint(path: &Path) -> Result<Option<Checkpoint>, EngineInvocationError> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Ok(None),
        Ok(bytes) => Ok(Some(Checkpoint::from_bytes(bytes))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(EngineInvocationError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }),
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), EngineInvocationError> {
    fs::write(path, bytes).map_err(|e| EngineInvocationError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
