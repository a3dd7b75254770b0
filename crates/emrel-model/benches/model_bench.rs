use criterion::{black_box, criterion_group, criterion_main, Criterion};
use emrel_model::{EmModel, WearoutAccumulator};

fn bench_reliability_at(c: &mut Criterion) {
    let model = EmModel::default();
    c.bench_function("reliability_at", |b| {
        b.iter(|| model.reliability_at(black_box(100_000.0), black_box(50.0)))
    });
}

fn bench_accumulator(c: &mut Criterion) {
    let model = EmModel::default();
    c.bench_function("wearout_1000_intervals", |b| {
        b.iter(|| {
            let mut acc = WearoutAccumulator::new();
            for i in 0..1000 {
                let _ = acc.add_interval(&model, 40.0 + (i % 50) as f64, black_box(100.0));
            }
            acc.reliability()
        })
    });
}

criterion_group!(benches, bench_reliability_at, bench_accumulator);
criterion_main!(benches);
