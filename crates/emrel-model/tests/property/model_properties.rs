use emrel_model::{EmModel, EmModelParams, WearoutAccumulator};
use proptest::prelude::*;

fn arb_params() -> impl Strategy<Value = EmModelParams> {
    (0.3f64..1.0, 0.5f64..3.0, 1.0f64..3.0).prop_map(|(ea, n, shape)| {
        EmModelParams {
            activation_energy: ea,
            current_density_exponent: n,
            ..Default::default()
        }
        .with_shape(shape)
        .unwrap()
    })
}

// ── Lifetime strictly decreasing in temperature ─────────────────────────

proptest! {
    #[test]
    fn lifetime_strictly_decreasing(
        params in arb_params(),
        t1 in -50.0f64..250.0,
        delta in 0.01f64..100.0,
    ) {
        let model = EmModel::new(params).unwrap();
        let cool = model.characteristic_lifetime(t1).unwrap();
        let hot = model.characteristic_lifetime(t1 + delta).unwrap();
        prop_assert!(cool > 0.0 && hot > 0.0);
        prop_assert!(cool > hot, "L({}) = {} <= L({}) = {}", t1, cool, t1 + delta, hot);
    }
}

// ── Reliability bounded and non-increasing in time ──────────────────────

proptest! {
    #[test]
    fn reliability_bounded_and_non_increasing(
        params in arb_params(),
        temperature in -50.0f64..250.0,
        t in 0.0f64..1e7,
        dt in 0.0f64..1e6,
    ) {
        let model = EmModel::new(params).unwrap();
        let earlier = model.reliability_at(t, temperature).unwrap();
        let later = model.reliability_at(t + dt, temperature).unwrap();
        prop_assert!((0.0..=1.0).contains(&earlier));
        prop_assert!((0.0..=1.0).contains(&later));
        prop_assert!(later <= earlier);
    }

    #[test]
    fn negative_time_always_rejected(
        temperature in -50.0f64..250.0,
        t in -1e9f64..-1e-9,
    ) {
        prop_assert!(EmModel::default().reliability_at(t, temperature).is_err());
    }
}

// ── Accumulator never increases reliability ─────────────────────────────

proptest! {
    #[test]
    fn accumulator_monotone_under_varying_temperature(
        intervals in prop::collection::vec((-20.0f64..150.0, 0.0f64..50_000.0), 1..40),
    ) {
        let model = EmModel::default();
        let mut acc = WearoutAccumulator::new();
        let mut prev = acc.reliability();
        for (temperature, hours) in intervals {
            let r = acc.add_interval(&model, temperature, hours).unwrap();
            prop_assert!(r <= prev);
            prop_assert!((0.0..=1.0).contains(&r));
            prev = r;
        }
    }
}
