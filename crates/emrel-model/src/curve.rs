use serde::{Deserialize, Serialize};

use emrel_core::errors::DomainError;

use crate::formula;
use crate::params::EmModelParams;

/// One sample of a reference reliability curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub hours: f64,
    pub reliability: f64,
}

/// Analytic reliability over a synthetic time axis at constant temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub temperature_celsius: f64,
    pub lifetime_hours: f64,
    pub points: Vec<CurvePoint>,
}

/// Sample `reliability_at` at `0, step, 2*step, ...` strictly below `horizon_hours`.
pub fn reference_curve(
    params: &EmModelParams,
    temperature_celsius: f64,
    horizon_hours: f64,
    step_hours: f64,
) -> Result<ReferenceCurve, DomainError> {
    formula::check_elapsed(horizon_hours)?;
    if horizon_hours.is_infinite() {
        return Err(DomainError::NonFinite {
            quantity: "curve horizon",
            value: horizon_hours,
        });
    }
    if !(step_hours.is_finite() && step_hours > 0.0) {
        return Err(DomainError::InvalidParameter {
            name: "step_hours",
            message: format!("must be positive and finite, got {step_hours}"),
        });
    }

    let lifetime = formula::characteristic_lifetime(params, temperature_celsius)?;
    let samples = (horizon_hours / step_hours).ceil() as usize;
    let points = (0..samples)
        .map(|i| i as f64 * step_hours)
        .take_while(|&hours| hours < horizon_hours)
        .map(|hours| CurvePoint {
            hours,
            reliability: formula::survival(hours / lifetime, params.weibull_shape),
        })
        .collect();

    Ok(ReferenceCurve {
        temperature_celsius,
        lifetime_hours: lifetime,
        points,
    })
}

impl ReferenceCurve {
    /// First sampled time at which reliability is at or below `r_limit`.
    pub fn first_crossing(&self, r_limit: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.reliability <= r_limit)
            .map(|p| p.hours)
    }
}
