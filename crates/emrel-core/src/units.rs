//! Temperature and time unit conversions.

/// 0 °C expressed in Kelvin.
pub const ZERO_CELSIUS_IN_KELVIN: f64 = 273.15;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;
const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + ZERO_CELSIUS_IN_KELVIN
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - ZERO_CELSIUS_IN_KELVIN
}

pub fn ms_to_hours(ms: f64) -> f64 {
    ms / MS_PER_HOUR
}

pub fn hours_to_ms(hours: f64) -> f64 {
    hours * MS_PER_HOUR
}

/// Converts hours to (365-day) years.
pub fn hours_to_years(hours: f64) -> f64 {
    hours / HOURS_PER_YEAR
}

pub fn ms_to_years(ms: f64) -> f64 {
    hours_to_years(ms_to_hours(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn celsius_kelvin_are_inverse() {
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
        assert!((kelvin_to_celsius(celsius_to_kelvin(50.0)) - 50.0).abs() < 1e-12);
    }

    #[test]
    fn hundred_days_in_years() {
        let years = ms_to_years(8_640_000_000.0);
        assert!((years - 100.0 / 365.0).abs() < 1e-12);
        assert_eq!(ms_to_hours(3_600_000.0), 1.0);
        assert_eq!(hours_to_ms(2.0), 7_200_000.0);
    }
}
