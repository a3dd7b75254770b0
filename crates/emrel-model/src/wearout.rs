use serde::{Deserialize, Serialize};

use emrel_core::errors::DomainError;

use crate::formula;
use crate::model::EmModel;

/// Incremental wear-out state for one component under a varying temperature.
///
/// Keeps the running sum `s = Σ Δt_j / L(T_j)` and derives
/// `R = exp(-s^β)`. At constant temperature this collapses to the closed-form
/// Weibull survival function. Area under the curve is the caller's concern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WearoutAccumulator {
    sum: f64,
    reliability: f64,
}

impl Default for WearoutAccumulator {
    fn default() -> Self {
        Self {
            sum: 0.0,
            reliability: 1.0,
        }
    }
}

impl WearoutAccumulator {
    /// Fresh component, `R = 1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a previously stored sum.
    pub fn resume(sum: f64, shape: f64) -> Result<Self, DomainError> {
        if !(sum.is_finite() && sum >= 0.0) {
            return Err(DomainError::InvalidParameter {
                name: "wearout_sum",
                message: format!("must be non-negative and finite, got {sum}"),
            });
        }
        Ok(Self {
            sum,
            reliability: formula::survival(sum, shape),
        })
    }

    /// Apply `delta_hours` at `temperature_celsius`; returns the new reliability.
    pub fn add_interval(
        &mut self,
        model: &EmModel,
        temperature_celsius: f64,
        delta_hours: f64,
    ) -> Result<f64, DomainError> {
        formula::check_elapsed(delta_hours)?;
        let lifetime = model.characteristic_lifetime(temperature_celsius)?;

        let sum = self.sum + delta_hours / lifetime;
        let next = formula::survival(sum, model.params().weibull_shape);
        if next > self.reliability {
            return Err(DomainError::ReliabilityIncreased {
                previous: self.reliability,
                next,
            });
        }

        self.sum = sum;
        self.reliability = next;
        Ok(next)
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn reliability(&self) -> f64 {
        self.reliability
    }
}
