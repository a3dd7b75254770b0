//! Simulation driver configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// How area under the reliability curve is accumulated per component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AreaMode {
    /// Every component accumulates every window until the run converges.
    #[default]
    AllComponents,
    /// A component stops accumulating after the window in which it was
    /// first observed at or below the reliability limit.
    UntilComponentFailure,
}

impl std::str::FromStr for AreaMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all_components" | "all-components" | "all" => Ok(Self::AllComponents),
            "until_component_failure" | "until-component-failure" | "per-component" => {
                Ok(Self::UntilComponentFailure)
            }
            other => Err(format!("unknown area mode: {other}")),
        }
    }
}

/// Configuration for the simulation driver.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    /// Window per engine invocation in milliseconds. Default: 100 days.
    pub time_step_ms: Option<u64>,
    /// Reliability floor in (0, 1). Default: 0.01.
    pub r_limit: Option<f64>,
    /// Iteration cap. Default: 100000.
    pub max_iterations: Option<u64>,
    /// Simulated-time cap in milliseconds. Default: none.
    pub max_elapsed_ms: Option<u64>,
    /// Area accumulation mode. Default: all_components.
    pub area_mode: Option<AreaMode>,
}

impl SimulationConfig {
    pub fn effective_time_step_ms(&self) -> u64 {
        self.time_step_ms.unwrap_or(constants::DEFAULT_TIME_STEP_MS)
    }

    pub fn effective_r_limit(&self) -> f64 {
        self.r_limit.unwrap_or(constants::DEFAULT_R_LIMIT)
    }

    pub fn effective_max_iterations(&self) -> u64 {
        self.max_iterations
            .unwrap_or(constants::DEFAULT_MAX_ITERATIONS)
    }

    pub fn effective_area_mode(&self) -> AreaMode {
        self.area_mode.unwrap_or_default()
    }
}
