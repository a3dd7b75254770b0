//! # emrel-sim
//!
//! Time-stepped reliability simulation. A [`SimulationDriver`] calls a
//! [`ReliabilityEngine`] once per fixed window, hands each window the previous
//! window's opaque [`Checkpoint`], accumulates the area under every component's
//! reliability curve, and stops once the weakest component reaches the limit.

pub mod checkpoint;
pub mod driver;
pub mod engine;
pub mod events;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod trace;

pub use checkpoint::Checkpoint;
pub use driver::{SimulationDriver, SimulationReport};
pub use engine::{EngineFault, EngineOutput, NativeEngine, ProcessEngine, ReliabilityEngine};
pub use events::{EventDispatcher, SimulationEventHandler};
pub use settings::{ConvergenceGuard, RunSettings, Threshold, TimeStep};
pub use snapshot::{parse_report, write_report, ReliabilitySnapshot};
pub use state::{RunPhase, SimulationState};
pub use trace::{TemperatureTrace, TemperatureUnit};
