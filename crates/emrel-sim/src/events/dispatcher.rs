//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use tracing::warn;

use super::handler::SimulationEventHandler;
use super::types::*;

/// Ordered list of handlers. Emitting with none registered does nothing.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn SimulationEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn SimulationEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Call `f` on every handler. A panicking handler is logged and skipped;
    /// later handlers still see the event.
    fn emit<F: Fn(&dyn SimulationEventHandler)>(&self, event: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                warn!(event, "event handler panicked");
            }
        }
    }

    pub fn emit_iteration_completed(&self, event: &IterationCompletedEvent) {
        self.emit("iteration_completed", |h| h.on_iteration_completed(event));
    }

    pub fn emit_converged(&self, event: &ConvergedEvent) {
        self.emit("converged", |h| h.on_converged(event));
    }

    pub fn emit_failed(&self, event: &FailedEvent) {
        self.emit("failed", |h| h.on_failed(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
