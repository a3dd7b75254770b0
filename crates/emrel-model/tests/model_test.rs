use emrel_core::errors::DomainError;
use emrel_model::{EmModel, EmModelParams, WearoutAccumulator};

fn model() -> EmModel {
    EmModel::new(EmModelParams::default()).unwrap()
}

// ── Concrete scenario: R(L) = e^-1 at 50 °C ─────────────────────────────

#[test]
fn reliability_at_characteristic_lifetime_is_inverse_e() {
    let params = EmModelParams {
        activation_energy: 0.48,
        boltzmann_constant: 8.6173324e-5,
        current_density: 1_500_000.0,
        current_density_exponent: 1.1,
        cross_section_constant: 30_000.0,
        weibull_shape: 2.0,
        gamma_correction: 0.88623,
    };
    let model = EmModel::new(params).unwrap();

    let lifetime = model.characteristic_lifetime(50.0).unwrap();
    assert!(lifetime > 0.0);

    let r = model.reliability_at(lifetime, 50.0).unwrap();
    assert!((r - (-1.0f64).exp()).abs() < 1e-4, "got {r}");
    assert!((r - 0.3679).abs() < 1e-4);
}

#[test]
fn lifetime_matches_black_equation_by_hand() {
    let kelvin: f64 = 50.0 + 273.15;
    let expected = 30_000.0 * 1_500_000f64.powf(-1.1) * (0.48 / (8.6173324e-5 * kelvin)).exp()
        / 0.88623;
    let lifetime = model().characteristic_lifetime(50.0).unwrap();
    assert!((lifetime - expected).abs() / expected < 1e-12);
}

// ── Boundaries ──────────────────────────────────────────────────────────

#[test]
fn reliability_is_one_at_time_zero() {
    for t in [-40.0, 0.0, 25.0, 50.0, 85.0, 125.0] {
        assert_eq!(model().reliability_at(0.0, t).unwrap(), 1.0);
    }
}

#[test]
fn reliability_vanishes_for_long_times() {
    let lifetime = model().characteristic_lifetime(50.0).unwrap();
    let r = model().reliability_at(lifetime * 10.0, 50.0).unwrap();
    assert!(r < 1e-40);
    let r = model().reliability_at(lifetime * 1e6, 50.0).unwrap();
    assert_eq!(r, 0.0);
}

// ── Domain checks ───────────────────────────────────────────────────────

#[test]
fn negative_time_is_a_domain_error() {
    assert!(matches!(
        model().reliability_at(-1.0, 50.0),
        Err(DomainError::NegativeTime { .. })
    ));
}

#[test]
fn absolute_zero_is_a_domain_error() {
    assert!(matches!(
        model().characteristic_lifetime(-273.15),
        Err(DomainError::NonPositiveTemperature { .. })
    ));
    assert!(matches!(
        model().characteristic_lifetime(-300.0),
        Err(DomainError::NonPositiveTemperature { .. })
    ));
    assert!(model().reliability_at(1.0, -273.15).is_err());
}

#[test]
fn invalid_params_are_rejected_at_construction() {
    let params = EmModelParams {
        gamma_correction: 0.0,
        ..Default::default()
    };
    assert!(EmModel::new(params).is_err());
}

// ── Parameter sets side by side ─────────────────────────────────────────

#[test]
fn two_parameter_sets_in_one_process() {
    let default = model();
    let jedec = EmModel::new(EmModelParams {
        activation_energy: 0.8,
        current_density_exponent: 2.0,
        ..Default::default()
    })
    .unwrap();
    let a = default.characteristic_lifetime(50.0).unwrap();
    let b = jedec.characteristic_lifetime(50.0).unwrap();
    assert_ne!(a, b);
    // The default model is untouched by the other parameter set.
    assert_eq!(default.characteristic_lifetime(50.0).unwrap(), a);
}

// ── Cumulative wear-out agrees with the closed form ─────────────────────

#[test]
fn steady_temperature_accumulation_matches_closed_form() {
    let model = model();
    let mut acc = WearoutAccumulator::new();
    let step = 2_400.0;
    for _ in 0..50 {
        acc.add_interval(&model, 50.0, step).unwrap();
    }
    let closed = model.reliability_at(step * 50.0, 50.0).unwrap();
    assert!((acc.reliability() - closed).abs() < 1e-12);
}

#[test]
fn hotter_intervals_wear_faster() {
    let model = model();
    let mut cool = WearoutAccumulator::new();
    let mut hot = WearoutAccumulator::new();
    cool.add_interval(&model, 40.0, 10_000.0).unwrap();
    hot.add_interval(&model, 90.0, 10_000.0).unwrap();
    assert!(hot.reliability() < cool.reliability());
}

#[test]
fn resumed_accumulator_continues_where_it_left_off() {
    let model = model();
    let mut straight = WearoutAccumulator::new();
    straight.add_interval(&model, 60.0, 1_000.0).unwrap();

    let mut resumed =
        WearoutAccumulator::resume(straight.sum(), model.params().weibull_shape).unwrap();
    assert_eq!(resumed, straight);

    let a = straight.add_interval(&model, 60.0, 1_000.0).unwrap();
    let b = resumed.add_interval(&model, 60.0, 1_000.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(resumed, straight);
}

// ── Reference curve ─────────────────────────────────────────────────────

#[test]
fn reference_curve_samples_like_arange() {
    let curve = model().reference_curve(50.0, 10_000.0, 3_000.0).unwrap();
    let hours: Vec<f64> = curve.points.iter().map(|p| p.hours).collect();
    assert_eq!(hours, vec![0.0, 3_000.0, 6_000.0, 9_000.0]);
    assert_eq!(curve.points[0].reliability, 1.0);
    assert!(curve
        .points
        .windows(2)
        .all(|w| w[1].reliability <= w[0].reliability));
}

#[test]
fn reference_curve_crosses_one_percent_within_fifty_years() {
    let curve = model()
        .reference_curve(50.0, 24.0 * 365.0 * 50.0, 3_000.0)
        .unwrap();
    let crossing = curve.first_crossing(0.01).expect("curve should cross 1%");
    assert!(crossing > curve.lifetime_hours);
    assert!(crossing < 24.0 * 365.0 * 50.0);
}

#[test]
fn reference_curve_rejects_bad_axis() {
    assert!(model().reference_curve(50.0, 100.0, 0.0).is_err());
    assert!(model().reference_curve(50.0, -1.0, 1.0).is_err());
    assert!(model().reference_curve(50.0, f64::INFINITY, 1.0).is_err());
    assert!(model().reference_curve(50.0, 0.0, 1.0).unwrap().points.is_empty());
}

#[test]
fn params_round_trip_through_json() {
    let params = EmModelParams::default();
    let json = serde_json::to_string(&params).unwrap();
    let back: EmModelParams = serde_json::from_str(&json).unwrap();
    assert_eq!(back, params);
}
