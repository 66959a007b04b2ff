//! # Thresholded Loss Benchmarks
//!
//! Measures scoring throughput for batches of increasing size.
//!
//! Run: `cargo bench --bench loss_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use devperf_ml::prelude::*;

fn batch(n: usize) -> (Vec<f64>, Vec<f64>) {
    let references: Vec<f64> = (0..n).map(|i| 0.5 + (i % 17) as f64 * 0.1).collect();
    let predictions = references
        .iter()
        .enumerate()
        .map(|(i, r)| r * if i % 3 == 0 { 1.05 } else { 1.3 })
        .collect();
    (predictions, references)
}

/// Benchmark ThresholdedMseLoss::score
fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("thresholded_mse_score");
    let loss = ThresholdedMseLoss::new(-5.0, 1.5).unwrap();

    for size in [32usize, 256, 4096] {
        let (predictions, references) = batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(loss.score(black_box(&predictions), black_box(&references))))
        });
    }

    group.finish();
}

/// Benchmark MAPE over the same batches
fn bench_mape(c: &mut Criterion) {
    let mut group = c.benchmark_group("mape");

    for size in [32usize, 4096] {
        let (predictions, references) = batch(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(mape(black_box(&predictions), black_box(&references))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_score, bench_mape);
criterion_main!(benches);
