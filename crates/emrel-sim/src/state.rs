//! Mutable per-run state owned by the driver.

use std::fmt;

use serde::{Deserialize, Serialize};

use emrel_core::config::AreaMode;

use crate::checkpoint::Checkpoint;
use crate::settings::{Threshold, TimeStep};
use crate::snapshot::ReliabilitySnapshot;

/// Driver lifecycle: `Init → Running → {Converged, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    Init,
    Running,
    Converged,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Converged | Self::Failed)
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Running => "RUNNING",
            Self::Converged => "CONVERGED",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Cumulative time, per-component area, and the checkpoint to hand back next.
#[derive(Debug, Clone)]
pub struct SimulationState {
    elapsed_ms: u64,
    iterations: u64,
    area_hours: Vec<f64>,
    /// Elapsed time at the end of the window in which each component was first
    /// observed at or below the limit.
    crossed_at_ms: Vec<Option<u64>>,
    checkpoint: Option<Checkpoint>,
    last_snapshot: Option<ReliabilitySnapshot>,
}

impl SimulationState {
    /// Zeroed state for `components` tracked components and no checkpoint.
    pub fn new(components: usize) -> Self {
        Self {
            elapsed_ms: 0,
            iterations: 0,
            area_hours: vec![0.0; components],
            crossed_at_ms: vec![None; components],
            checkpoint: None,
            last_snapshot: None,
        }
    }

    /// Fold one completed window into the state and return the window's
    /// minimum reliability.
    ///
    /// Area uses the end-of-window value times the window length
    /// (rectangle rule). The snapshot must already be validated against the trace.
    pub fn record_window(
        &mut self,
        time_step: TimeStep,
        snapshot: ReliabilitySnapshot,
        checkpoint: Checkpoint,
        r_limit: Threshold,
        area_mode: AreaMode,
    ) -> f64 {
        self.checkpoint = Some(checkpoint);
        self.elapsed_ms = self.elapsed_ms.saturating_add(time_step.as_millis());
        self.iterations += 1;

        let hours = time_step.hours();
        for (i, &value) in snapshot.values().iter().enumerate() {
            let accumulate = match area_mode {
                AreaMode::AllComponents => true,
                AreaMode::UntilComponentFailure => self.crossed_at_ms[i].is_none(),
            };
            if accumulate {
                self.area_hours[i] += value * hours;
            }
            if self.crossed_at_ms[i].is_none() && r_limit.is_crossed_by(value) {
                self.crossed_at_ms[i] = Some(self.elapsed_ms);
            }
        }

        let min = snapshot.min().unwrap_or(f64::NAN);
        self.last_snapshot = Some(snapshot);
        min
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn area_hours(&self) -> &[f64] {
        &self.area_hours
    }

    /// Per component, when it first reached the limit (`None` if not yet).
    pub fn crossed_at_ms(&self) -> &[Option<u64>] {
        &self.crossed_at_ms
    }

    /// True once every component has reached the limit at least once.
    pub fn all_crossed(&self) -> bool {
        self.crossed_at_ms.iter().all(Option::is_some)
    }

    pub fn checkpoint(&self) -> Option<&Checkpoint> {
        self.checkpoint.as_ref()
    }

    pub fn last_snapshot(&self) -> Option<&ReliabilitySnapshot> {
        self.last_snapshot.as_ref()
    }
}
