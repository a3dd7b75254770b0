//! Electromigration model configuration.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Physical constants for Black's equation and the Weibull survival function.
/// Unset fields fall back to the compiled defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Activation energy Ea in eV. Default: 0.48.
    pub activation_energy: Option<f64>,
    /// Boltzmann constant in eV/K. Default: 8.6173324e-5.
    pub boltzmann_constant: Option<f64>,
    /// Current density j. Default: 1.5e6.
    pub current_density: Option<f64>,
    /// Current-density exponent n. Default: 1.1.
    pub current_density_exponent: Option<f64>,
    /// Cross-section constant A0. Default: 30000.
    pub cross_section_constant: Option<f64>,
    /// Weibull shape β. Default: 2.
    pub weibull_shape: Option<f64>,
    /// Gamma(1 + 1/β). When unset it is derived from `weibull_shape`.
    pub gamma_correction: Option<f64>,
}

impl ModelConfig {
    pub fn effective_activation_energy(&self) -> f64 {
        self.activation_energy
            .unwrap_or(constants::DEFAULT_ACTIVATION_ENERGY)
    }

    pub fn effective_boltzmann_constant(&self) -> f64 {
        self.boltzmann_constant
            .unwrap_or(constants::DEFAULT_BOLTZMANN_CONSTANT)
    }

    pub fn effective_current_density(&self) -> f64 {
        self.current_density
            .unwrap_or(constants::DEFAULT_CURRENT_DENSITY)
    }

    pub fn effective_current_density_exponent(&self) -> f64 {
        self.current_density_exponent
            .unwrap_or(constants::DEFAULT_CURRENT_DENSITY_EXPONENT)
    }

    pub fn effective_cross_section_constant(&self) -> f64 {
        self.cross_section_constant
            .unwrap_or(constants::DEFAULT_CROSS_SECTION_CONSTANT)
    }

    pub fn effective_weibull_shape(&self) -> f64 {
        self.weibull_shape.unwrap_or(constants::DEFAULT_WEIBULL_SHAPE)
    }
}
