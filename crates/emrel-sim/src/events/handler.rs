//! SimulationEventHandler trait; every method defaults to a no-op.

use super::types::*;

/// Observer of a simulation run.
///
/// Implement only the events you care about. Handlers are shared through
/// `Arc`, hence `Send + Sync`.
pub trait SimulationEventHandler: Send + Sync {
    fn on_iteration_completed(&self, _event: &IterationCompletedEvent) {}
    fn on_converged(&self, _event: &ConvergedEvent) {}
    fn on_failed(&self, _event: &FailedEvent) {}
}
