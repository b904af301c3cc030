//! Benchmarks for RBF fitting and evaluation.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use lutmos_interp::{RbfConfig, RbfInterpolator};

fn sweep(num_lengths: usize, per_length: usize) -> (Vec<[f64; 2]>, Vec<f64>) {
    let mut points = Vec::with_capacity(num_lengths * per_length);
    let mut values = Vec::with_capacity(num_lengths * per_length);
    for k in 0..num_lengths {
        let length = 180.0 * (k + 1) as f64;
        for i in 0..per_length {
            let gm_id = 3.0 + 22.0 * i as f64 / per_length as f64;
            points.push([gm_id, length]);
            values.push(40.0 * (1.0 - (-length / 400.0).exp()) + 0.5 * gm_id);
        }
    }
    (points, values)
}

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("rbf_fit");
    let config = RbfConfig::default();

    for per_length in [10, 40, 100] {
        let (points, values) = sweep(6, per_length);
        group.bench_with_input(
            BenchmarkId::from_parameter(points.len()),
            &points.len(),
            |bencher, _| {
                bencher.iter(|| {
                    RbfInterpolator::fit(black_box(&points), black_box(&values), &config).unwrap()
                });
            },
        );
    }

    group.finish();
}

fn bench_eval(c: &mut Criterion) {
    let (points, values) = sweep(6, 40);
    let rbf = RbfInterpolator::fit(&points, &values, &RbfConfig::default()).unwrap();
    let queries: Vec<[f64; 2]> = (0..1000)
        .map(|i| [3.0 + (i % 220) as f64 * 0.1, 180.0 + (i % 900) as f64])
        .collect();

    c.bench_function("rbf_eval_single", |b| {
        b.iter(|| rbf.eval(black_box(11.3), black_box(640.0)))
    });
    c.bench_function("rbf_eval_batch_1000", |b| {
        b.iter(|| rbf.evaluate_batch(black_box(&queries)))
    });
}

criterion_group!(benches, bench_fit, bench_eval);
criterion_main!(benches);
