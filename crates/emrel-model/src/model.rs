use emrel_core::errors::DomainError;

use crate::curve::{self, ReferenceCurve};
use crate::formula;
use crate::params::EmModelParams;

/// Analytic electromigration model bound to one validated parameter set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmModel {
    params: EmModelParams,
}

impl EmModel {
    /// Build a model, rejecting parameters that leave it ill-defined.
    pub fn new(params: EmModelParams) -> Result<Self, DomainError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &EmModelParams {
        &self.params
    }

    /// Characteristic lifetime in hours at a constant temperature (°C).
    pub fn characteristic_lifetime(&self, temperature_celsius: f64) -> Result<f64, DomainError> {
        formula::characteristic_lifetime(&self.params, temperature_celsius)
    }

    /// Survival probability after `hours` at a constant temperature (°C).
    pub fn reliability_at(&self, hours: f64, temperature_celsius: f64) -> Result<f64, DomainError> {
        formula::reliability_at(&self.params, hours, temperature_celsius)
    }

    pub fn reference_curve(
        &self,
        temperature_celsius: f64,
        horizon_hours: f64,
        step_hours: f64,
    ) -> Result<ReferenceCurve, DomainError> {
        curve::reference_curve(&self.params, temperature_celsius, horizon_hours, step_hours)
    }
}

impl Default for EmModel {
    fn default() -> Self {
        Self {
            params: EmModelParams::default(),
        }
    }
}
