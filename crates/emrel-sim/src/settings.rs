//! Run settings: window size, reliability floor, convergence guard, area mode.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use emrel_core::config::{AreaMode, SimulationConfig};
use emrel_core::errors::SimulationError;
use emrel_core::units::ms_to_hours;

/// Simulated time advanced per engine invocation, in milliseconds. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStep(NonZeroU64);

impl TimeStep {
    pub fn from_millis(ms: i64) -> Result<Self, SimulationError> {
        u64::try_from(ms)
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self)
            .ok_or_else(|| SimulationError::InvalidSettings {
                field: "time_step_ms".to_string(),
                message: format!("must be strictly positive, got {ms}"),
            })
    }

    pub fn as_millis(&self) -> u64 {
        self.0.get()
    }

    pub fn hours(&self) -> f64 {
        ms_to_hours(self.0.get() as f64)
    }
}

impl TryFrom<u64> for TimeStep {
    type Error = SimulationError;

    fn try_from(ms: u64) -> Result<Self, Self::Error> {
        NonZeroU64::new(ms)
            .map(Self)
            .ok_or_else(|| SimulationError::InvalidSettings {
                field: "time_step_ms".to_string(),
                message: "must be strictly positive, got 0".to_string(),
            })
    }
}

/// Reliability floor `r_limit` in (0, 1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold(f64);

impl Threshold {
    pub fn new(r_limit: f64) -> Result<Self, SimulationError> {
        if r_limit > 0.0 && r_limit < 1.0 {
            Ok(Self(r_limit))
        } else {
            Err(SimulationError::InvalidSettings {
                field: "r_limit".to_string(),
                message: format!("must be strictly between 0 and 1, got {r_limit}"),
            })
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// True when `reliability` counts as failed.
    pub fn is_crossed_by(&self, reliability: f64) -> bool {
        reliability <= self.0
    }
}

impl TryFrom<f64> for Threshold {
    type Error = SimulationError;

    fn try_from(r_limit: f64) -> Result<Self, Self::Error> {
        Self::new(r_limit)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> Self {
        threshold.0
    }
}

/// Upper bounds on a run that would otherwise loop until the engine crosses
/// the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceGuard {
    pub max_iterations: NonZeroU64,
    pub max_elapsed_ms: Option<NonZeroU64>,
}

impl ConvergenceGuard {
    pub fn iterations(max_iterations: NonZeroU64) -> Self {
        Self {
            max_iterations,
            max_elapsed_ms: None,
        }
    }

    pub fn with_max_elapsed_ms(mut self, max_elapsed_ms: NonZeroU64) -> Self {
        self.max_elapsed_ms = Some(max_elapsed_ms);
        self
    }

    /// True once either budget is used up.
    pub fn is_exhausted(&self, iterations: u64, elapsed_ms: u64) -> bool {
        iterations >= self.max_iterations.get()
            || self
                .max_elapsed_ms
                .is_some_and(|max| elapsed_ms >= max.get())
    }
}

impl Default for ConvergenceGuard {
    fn default() -> Self {
        Self::iterations(
            NonZeroU64::new(emrel_core::constants::DEFAULT_MAX_ITERATIONS)
                .unwrap_or(NonZeroU64::MIN),
        )
    }
}

/// Everything `SimulationDriver::run` needs besides the trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub time_step: TimeStep,
    pub r_limit: Threshold,
    pub guard: ConvergenceGuard,
    pub area_mode: AreaMode,
}

impl RunSettings {
    pub fn new(time_step: TimeStep, r_limit: Threshold) -> Self {
        Self {
            time_step,
            r_limit,
            guard: ConvergenceGuard::default(),
            area_mode: AreaMode::default(),
        }
    }

    pub fn with_guard(mut self, guard: ConvergenceGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_area_mode(mut self, area_mode: AreaMode) -> Self {
        self.area_mode = area_mode;
        self
    }

    pub fn from_config(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let time_step = TimeStep::try_from(config.effective_time_step_ms())?;
        let r_limit = Threshold::new(config.effective_r_limit())?;
        let max_iterations = NonZeroU64::new(config.effective_max_iterations()).ok_or_else(|| {
            SimulationError::InvalidSettings {
                field: "max_iterations".to_string(),
                message: "must be greater than 0".to_string(),
            }
        })?;
        let mut guard = ConvergenceGuard::iterations(max_iterations);
        if let Some(max_elapsed) = config.max_elapsed_ms.and_then(NonZeroU64::new) {
            guard = guard.with_max_elapsed_ms(max_elapsed);
        }
        Ok(Self {
            time_step,
            r_limit,
            guard,
            area_mode: config.effective_area_mode(),
        })
    }
}
