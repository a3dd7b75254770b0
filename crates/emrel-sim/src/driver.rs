//! The time-stepped simulation driver.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use emrel_core::config::AreaMode;
use emrel_core::errors::{EmrelErrorCode, SimulationError, SimulationFailure};
use emrel_core::units::{hours_to_years, ms_to_hours, ms_to_years};

use crate::engine::ReliabilityEngine;
use crate::events::{
    ConvergedEvent, EventDispatcher, FailedEvent, IterationCompletedEvent,
    SimulationEventHandler,
};
use crate::settings::RunSettings;
use crate::snapshot::ReliabilitySnapshot;
use crate::state::{RunPhase, SimulationState};
use crate::trace::TemperatureTrace;

/// Outcome of a converged run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Simulated time until the first window whose minimum fell to `r_limit`.
    pub elapsed_ms: u64,
    pub iterations: u64,
    pub r_limit: f64,
    pub area_mode: AreaMode,
    /// Per-component area under the reliability curve, hours, in trace order.
    pub area_hours: Vec<f64>,
    /// Per component, elapsed time at the end of its first window at or below
    /// `r_limit`.
    pub crossed_at_ms: Vec<Option<u64>>,
    pub final_snapshot: ReliabilitySnapshot,
}

impl SimulationReport {
    pub fn elapsed_hours(&self) -> f64 {
        ms_to_hours(self.elapsed_ms as f64)
    }

    pub fn elapsed_years(&self) -> f64 {
        ms_to_years(self.elapsed_ms as f64)
    }

    /// `(component, area in hours)` pairs in trace order.
    pub fn areas(&self) -> Vec<(&str, f64)> {
        self.final_snapshot
            .components()
            .iter()
            .map(String::as_str)
            .zip(self.area_hours.iter().copied())
            .collect()
    }

    /// Same as [`areas`](Self::areas) but in years, the unit reported to users.
    pub fn areas_in_years(&self) -> Vec<(&str, f64)> {
        self.areas()
            .into_iter()
            .map(|(name, hours)| (name, hours_to_years(hours)))
            .collect()
    }
}

/// Advances an engine window by window until the weakest component's
/// reliability reaches the limit.
///
/// With [`AreaMode::UntilComponentFailure`] the run instead continues until
/// every component has reached the limit once, and each component stops
/// accumulating area after its own crossing window.
///
/// One driver performs one run: `INIT → RUNNING → {CONVERGED, FAILED}`.
pub struct SimulationDriver<E> {
    engine: E,
    events: EventDispatcher,
    phase: RunPhase,
    state: Option<SimulationState>,
}

impl<E: ReliabilityEngine> SimulationDriver<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            events: EventDispatcher::new(),
            phase: RunPhase::Init,
            state: None,
        }
    }

    pub fn with_handler(mut self, handler: Arc<dyn SimulationEventHandler>) -> Self {
        self.events.register(handler);
        self
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// State of the last run, including a failed one. `None` before `run`.
    pub fn state(&self) -> Option<&SimulationState> {
        self.state.as_ref()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_engine(self) -> E {
        self.engine
    }

    /// Run to convergence.
    ///
    /// Engine failures and malformed reports end the run immediately; nothing
    /// is retried. The guard in `settings` bounds an engine that never reaches
    /// the limit.
    pub fn run(
        &mut self,
        trace: &TemperatureTrace,
        settings: &RunSettings,
    ) -> Result<SimulationReport, SimulationFailure> {
        if self.phase != RunPhase::Init {
            return Err(SimulationFailure::new(
                SimulationError::AlreadyFinished {
                    phase: self.phase.to_string(),
                },
                0,
                0,
            ));
        }

        let span = info_span!(
            "simulation",
            components = trace.component_count(),
            time_step_ms = settings.time_step.as_millis(),
            r_limit = settings.r_limit.value(),
        );
        let _guard = span.enter();

        self.phase = RunPhase::Running;
        let mut state = SimulationState::new(trace.component_count());
        let outcome = self.drive(trace, settings, &mut state);

        let result = match outcome {
            Ok(min_reliability) => {
                self.phase = RunPhase::Converged;
                let report = SimulationReport {
                    elapsed_ms: state.elapsed_ms(),
                    iterations: state.iterations(),
                    r_limit: settings.r_limit.value(),
                    area_mode: settings.area_mode,
                    area_hours: state.area_hours().to_vec(),
                    crossed_at_ms: state.crossed_at_ms().to_vec(),
                    final_snapshot: state.last_snapshot().cloned().unwrap_or_default(),
                };
                info!(
                    iterations = report.iterations,
                    elapsed_ms = report.elapsed_ms,
                    min_reliability,
                    "simulation converged"
                );
                self.events.emit_converged(&ConvergedEvent {
                    iterations: report.iterations,
                    elapsed_ms: report.elapsed_ms,
                    min_reliability,
                    area_hours: report.area_hours.clone(),
                });
                Ok(report)
            }
            Err(error) => {
                self.phase = RunPhase::Failed;
                let failure = SimulationFailure::new(error, state.elapsed_ms(), state.iterations());
                warn!(
                    iterations = failure.iterations,
                    elapsed_ms = failure.elapsed_ms,
                    error = %failure.error.coded_string(),
                    "simulation failed"
                );
                self.events.emit_failed(&FailedEvent {
                    iterations: failure.iterations,
                    elapsed_ms: failure.elapsed_ms,
                    error_code: failure.error_code(),
                    message: failure.error.to_string(),
                });
                Err(failure)
            }
        };

        self.state = Some(state);
        result
    }

    /// The window loop. Returns the minimum reliability of the converging window.
    fn drive(
        &mut self,
        trace: &TemperatureTrace,
        settings: &RunSettings,
        state: &mut SimulationState,
    ) -> Result<f64, SimulationError> {
        loop {
            let output = self
                .engine
                .evaluate(settings.time_step, trace, state.checkpoint())?;
            output.snapshot.validate_against(trace)?;

            let checkpoint_bytes = output.checkpoint.len();
            let min_reliability = state.record_window(
                settings.time_step,
                output.snapshot,
                output.checkpoint,
                settings.r_limit,
                settings.area_mode,
            );
            debug!(
                iteration = state.iterations(),
                elapsed_ms = state.elapsed_ms(),
                min_reliability,
                checkpoint_bytes,
                "window complete"
            );

            if self.events.handler_count() > 0 {
                if let Some(snapshot) = state.last_snapshot() {
                    self.events.emit_iteration_completed(&IterationCompletedEvent {
                        iteration: state.iterations(),
                        elapsed_ms: state.elapsed_ms(),
                        min_reliability,
                        snapshot: snapshot.clone(),
                    });
                }
            }

            let converged = match settings.area_mode {
                AreaMode::AllComponents => settings.r_limit.is_crossed_by(min_reliability),
                AreaMode::UntilComponentFailure => state.all_crossed(),
            };
            if converged {
                return Ok(min_reliability);
            }
            if settings
                .guard
                .is_exhausted(state.iterations(), state.elapsed_ms())
            {
                return Err(SimulationError::ConvergenceTimeout {
                    iterations: state.iterations(),
                    elapsed_ms: state.elapsed_ms(),
                });
            }
        }
    }
}
