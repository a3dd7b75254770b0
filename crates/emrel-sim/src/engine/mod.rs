//! The reliability engine capability and its implementations.
//!
//! The driver only sees [`ReliabilityEngine::evaluate`]; whether the engine
//! runs in process, as a child process, or as a test double is invisible to it.

pub mod file_contract;
pub mod native;
pub mod process;

use emrel_core::errors::{
    EmrelErrorCode, EngineInvocationError, MalformedOutputError, SimulationError,
};

use crate::checkpoint::Checkpoint;
use crate::settings::TimeStep;
use crate::snapshot::ReliabilitySnapshot;
use crate::trace::TemperatureTrace;

pub use native::NativeEngine;
pub use process::ProcessEngine;

/// Result of one engine window.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOutput {
    pub snapshot: ReliabilitySnapshot,
    /// The engine's full accumulated state; replaces the previous checkpoint.
    pub checkpoint: Checkpoint,
}

/// Ways an engine invocation can fail.
#[derive(Debug, thiserror::Error)]
pub enum EngineFault {
    #[error(transparent)]
    Invocation(#[from] EngineInvocationError),

    #[error(transparent)]
    MalformedOutput(#[from] MalformedOutputError),
}

impl From<EngineFault> for SimulationError {
    fn from(fault: EngineFault) -> Self {
        match fault {
            EngineFault::Invocation(e) => SimulationError::Engine(e),
            EngineFault::MalformedOutput(e) => SimulationError::MalformedOutput(e),
        }
    }
}

impl EmrelErrorCode for EngineFault {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Invocation(e) => e.error_code(),
            Self::MalformedOutput(e) => e.error_code(),
        }
    }
}

/// A black-box reliability computation advanced one window at a time.
///
/// `checkpoint` is `None` on the first window and afterwards exactly the bytes
/// returned by the previous call. Calls are strictly sequential.
pub trait ReliabilityEngine {
    fn evaluate(
        &mut self,
        time_step: TimeStep,
        trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault>;
}

impl<E: ReliabilityEngine + ?Sized> ReliabilityEngine for Box<E> {
    fn evaluate(
        &mut self,
        time_step: TimeStep,
        trace: &TemperatureTrace,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<EngineOutput, EngineFault> {
        (**self).evaluate(time_step, trace, checkpoint)
    }
}
