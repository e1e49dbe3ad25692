//! Barycenter and unimodal regression benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use implore_barycenter::{barycenter, fit_unimodal, AggregationMethod};

fn noisy_bump(n: usize, center: f64, seed: u64) -> Vec<f64> {
    // Cheap deterministic jitter so the regressor has violators to pool
    let mut state = seed;
    (0..n)
        .map(|i| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let jitter = (state >> 33) as f64 / (1u64 << 31) as f64;
            let t = (i as f64 - center) / (n as f64 / 10.0);
            (-t * t).exp() + 0.2 * jitter
        })
        .collect()
}

fn bench_unimodal(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit_unimodal");
    for n in [100, 1_000, 10_000, 100_000] {
        let values = noisy_bump(n, n as f64 / 2.0, 7);
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| fit_unimodal(black_box(values), None))
        });
    }
    group.finish();
}

fn bench_barycenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("barycenter");
    for m in [2, 8, 32] {
        let rows: Vec<Vec<f64>> = (0..m)
            .map(|k| noisy_bump(1_000, 300.0 + 10.0 * k as f64, k as u64))
            .collect();
        for method in [AggregationMethod::Mean, AggregationMethod::Median] {
            group.bench_with_input(
                BenchmarkId::new(method.to_string(), m),
                &rows,
                |b, rows| b.iter(|| barycenter(black_box(rows), method, None, 30.0)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_unimodal, bench_barycenter);
criterion_main!(benches);
