//! # Evaluation Loop Benchmarks
//!
//! One OPV epoch over a synthetic held-out set.
//!
//! Run: `cargo bench --bench eval_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use devperf_ml::prelude::*;

fn dataset(n: usize) -> Dataset {
    Dataset::new(
        (0..n)
            .map(|i| {
                let x = 0.2 + (i % 11) as f64 * 0.1;
                Sample {
                    inputs: vec![x * 1.02, x * 0.9, x * 20.0, x * 0.5],
                    labels: vec![x, x * 0.95, x * 21.0, x * 0.55],
                }
            })
            .collect(),
    )
}

/// Benchmark a full evaluation epoch for several batch sizes
fn bench_epoch(c: &mut Criterion) {
    let mut group = c.benchmark_group("opv_epoch");
    let data = dataset(2048);
    let targets = TargetSet::opv();
    let ctx = ExecutionContext::cpu();

    for batch_size in [16usize, 64, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &batch_size| {
                b.iter(|| {
                    let mut model = PrecomputedModel::new(targets.len());
                    let batches = data.batches(batch_size).unwrap();
                    black_box(evaluate(&mut model, batches, &targets, &ctx).unwrap())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_epoch);
criterion_main!(benches);
