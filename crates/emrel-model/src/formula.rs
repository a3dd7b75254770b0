use emrel_core::errors::DomainError;
use emrel_core::units::celsius_to_kelvin;

use crate::params::EmModelParams;

/// Black's equation, scaled to the Weibull characteristic lifetime (hours).
///
/// ```text
/// L(T) = A0 * j^(-n) * exp(Ea / (k * T_kelvin)) / Gamma(1 + 1/β)
/// ```
///
/// Strictly positive and strictly decreasing in temperature for Ea > 0.
pub fn characteristic_lifetime(
    params: &EmModelParams,
    temperature_celsius: f64,
) -> Result<f64, DomainError> {
    if !temperature_celsius.is_finite() {
        return Err(DomainError::NonFinite {
            quantity: "temperature",
            value: temperature_celsius,
        });
    }
    let kelvin = celsius_to_kelvin(temperature_celsius);
    if kelvin <= 0.0 {
        return Err(DomainError::NonPositiveTemperature {
            celsius: temperature_celsius,
            kelvin,
        });
    }

    let arrhenius = (params.activation_energy / (params.boltzmann_constant * kelvin)).exp();
    let lifetime = params.prefactor() * arrhenius;

    // Near absolute zero the Arrhenius term overflows.
    if !(lifetime.is_finite() && lifetime > 0.0) {
        return Err(DomainError::NonFinite {
            quantity: "characteristic lifetime",
            value: lifetime,
        });
    }
    Ok(lifetime)
}

/// Weibull survival probability `exp(-(t / L)^β)` at `t` hours.
///
/// 1.0 at `t = 0`, decreasing towards 0, always within [0, 1].
pub fn reliability_at(
    params: &EmModelParams,
    hours: f64,
    temperature_celsius: f64,
) -> Result<f64, DomainError> {
    check_elapsed(hours)?;
    let lifetime = characteristic_lifetime(params, temperature_celsius)?;
    Ok(survival(hours / lifetime, params.weibull_shape))
}

/// `exp(-x^β)` for a normalised age `x >= 0`.
pub(crate) fn survival(normalised_age: f64, shape: f64) -> f64 {
    (-normalised_age.powf(shape)).exp().clamp(0.0, 1.0)
}

pub(crate) fn check_elapsed(hours: f64) -> Result<(), DomainError> {
    if hours.is_nan() {
        return Err(DomainError::NonFinite {
            quantity: "elapsed time",
            value: hours,
        });
    }
    if hours < 0.0 {
        return Err(DomainError::NegativeTime { hours });
    }
    Ok(())
}
