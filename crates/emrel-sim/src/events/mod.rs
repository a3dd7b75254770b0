//! Run events.
//! Trait with no-op defaults, synchronous dispatch, nothing to do when empty.

pub mod dispatcher;
pub mod handler;
pub mod types;

pub use dispatcher::EventDispatcher;
pub use handler::SimulationEventHandler;
pub use types::{ConvergedEvent, FailedEvent, IterationCompletedEvent};
