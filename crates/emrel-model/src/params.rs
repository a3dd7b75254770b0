use serde::{Deserialize, Serialize};

use emrel_core::config::ModelConfig;
use emrel_core::constants;
use emrel_core::errors::DomainError;

/// Physical constants of the electromigration model.
///
/// Immutable once built; pass it explicitly so several parameter sets can be
/// compared side by side in one process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmModelParams {
    /// Activation energy Ea (eV).
    pub activation_energy: f64,
    /// Boltzmann constant k (eV/K).
    pub boltzmann_constant: f64,
    /// Current density j.
    pub current_density: f64,
    /// Current-density exponent n in `j^(-n)`.
    pub current_density_exponent: f64,
    /// Cross-section / material constant A0.
    pub cross_section_constant: f64,
    /// Weibull shape β.
    pub weibull_shape: f64,
    /// Gamma(1 + 1/β), converting the median lifetime into the Weibull scale.
    pub gamma_correction: f64,
}

impl Default for EmModelParams {
    fn default() -> Self {
        Self {
            activation_energy: constants::DEFAULT_ACTIVATION_ENERGY,
            boltzmann_constant: constants::DEFAULT_BOLTZMANN_CONSTANT,
            current_density: constants::DEFAULT_CURRENT_DENSITY,
            current_density_exponent: constants::DEFAULT_CURRENT_DENSITY_EXPONENT,
            cross_section_constant: constants::DEFAULT_CROSS_SECTION_CONSTANT,
            weibull_shape: constants::DEFAULT_WEIBULL_SHAPE,
            gamma_correction: constants::DEFAULT_GAMMA_CORRECTION,
        }
    }
}

impl EmModelParams {
    /// Replace the Weibull shape and recompute `Gamma(1 + 1/β)` to match.
    pub fn with_shape(self, shape: f64) -> Result<Self, DomainError> {
        if !(shape.is_finite() && shape > 0.0) {
            return Err(DomainError::InvalidParameter {
                name: "weibull_shape",
                message: format!("must be positive and finite, got {shape}"),
            });
        }
        Ok(Self {
            weibull_shape: shape,
            gamma_correction: gamma_correction_for(shape),
            ..self
        })
    }

    /// Build parameters from configuration. A configured shape without an
    /// explicit gamma correction gets the correction derived from it.
    pub fn from_config(config: &ModelConfig) -> Result<Self, DomainError> {
        let shape = config.effective_weibull_shape();
        let gamma_correction = match (config.gamma_correction, config.weibull_shape) {
            (Some(g), _) => g,
            (None, Some(s)) => gamma_correction_for(s),
            (None, None) => constants::DEFAULT_GAMMA_CORRECTION,
        };
        let params = Self {
            activation_energy: config.effective_activation_energy(),
            boltzmann_constant: config.effective_boltzmann_constant(),
            current_density: config.effective_current_density(),
            current_density_exponent: config.effective_current_density_exponent(),
            cross_section_constant: config.effective_cross_section_constant(),
            weibull_shape: shape,
            gamma_correction,
        };
        params.validate()?;
        Ok(params)
    }

    /// Check that every constant keeps the model well defined.
    ///
    /// A positive activation energy is what makes the lifetime strictly
    /// decreasing in temperature.
    pub fn validate(&self) -> Result<(), DomainError> {
        let positive = [
            ("activation_energy", self.activation_energy),
            ("boltzmann_constant", self.boltzmann_constant),
            ("current_density", self.current_density),
            ("cross_section_constant", self.cross_section_constant),
            ("weibull_shape", self.weibull_shape),
            ("gamma_correction", self.gamma_correction),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(DomainError::InvalidParameter {
                    name,
                    message: format!("must be positive and finite, got {value}"),
                });
            }
        }
        if !self.current_density_exponent.is_finite() {
            return Err(DomainError::InvalidParameter {
                name: "current_density_exponent",
                message: format!("must be finite, got {}", self.current_density_exponent),
            });
        }
        Ok(())
    }

    /// Temperature-independent prefactor `A0 * j^(-n) / Gamma(1 + 1/β)`.
    pub(crate) fn prefactor(&self) -> f64 {
        self.cross_section_constant
            * self.current_density.powf(-self.current_density_exponent)
            / self.gamma_correction
    }
}

/// `Gamma(1 + 1/β)` via `statrs`.
pub fn gamma_correction_for(shape: f64) -> f64 {
    statrs::function::gamma::gamma(1.0 + 1.0 / shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_gamma_matches_shape_two() {
        let derived = gamma_correction_for(2.0);
        assert!((derived - constants::DEFAULT_GAMMA_CORRECTION).abs() < 1e-5);
    }

    #[test]
    fn with_shape_recomputes_correction() {
        let p = EmModelParams::default().with_shape(1.0).unwrap();
        assert_eq!(p.weibull_shape, 1.0);
        assert!((p.gamma_correction - 1.0).abs() < 1e-12);
        assert!(EmModelParams::default().with_shape(0.0).is_err());
    }

    #[test]
    fn from_config_derives_gamma_from_configured_shape() {
        let config = ModelConfig {
            weibull_shape: Some(3.0),
            ..Default::default()
        };
        let p = EmModelParams::from_config(&config).unwrap();
        assert!((p.gamma_correction - gamma_correction_for(3.0)).abs() < 1e-12);

        let p = EmModelParams::from_config(&ModelConfig::default()).unwrap();
        assert_eq!(p, EmModelParams::default());
    }

    #[test]
    fn validate_rejects_zero_activation_energy() {
        let p = EmModelParams {
            activation_energy: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(DomainError::InvalidParameter { name: "activation_energy", .. })
        ));
    }
}
