//! Event payloads.

use crate::snapshot::ReliabilitySnapshot;

/// Payload for `on_iteration_completed`.
#[derive(Debug, Clone)]
pub struct IterationCompletedEvent {
    /// 1-based window number.
    pub iteration: u64,
    pub elapsed_ms: u64,
    pub min_reliability: f64,
    pub snapshot: ReliabilitySnapshot,
}

/// Payload for `on_converged`.
#[derive(Debug, Clone)]
pub struct ConvergedEvent {
    pub iterations: u64,
    pub elapsed_ms: u64,
    pub min_reliability: f64,
    /// Per-component area under the curve, hours, in trace order.
    pub area_hours: Vec<f64>,
}

/// Payload for `on_failed`.
#[derive(Debug, Clone)]
pub struct FailedEvent {
    pub iterations: u64,
    pub elapsed_ms: u64,
    pub error_code: &'static str,
    pub message: String,
}
