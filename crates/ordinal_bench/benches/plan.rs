//! Procedure planning benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ordinal_bench::{dense_slots, scattered_slots};
use ordinal_store::plan::{plan_compaction, plan_swap};

/// Benchmark planning a move to the front of a dense table.
fn bench_plan_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_swap");

    for size in [10, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let slots = dense_slots(size);
            let last = format!("row{}", size - 1);

            b.iter(|| {
                let outcome = plan_swap("bench", black_box(&slots), black_box(&last), 1);
                black_box(outcome);
            });
        });
    }

    group.finish();
}

/// Benchmark planning a move into a slot shared by several rows.
fn bench_plan_swap_duplicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_swap_duplicates");

    for size in [100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let slots = scattered_slots(size);
            let target = slots[0].position;
            let mover = slots[size / 2].id.clone();

            b.iter(|| {
                let outcome = plan_swap("bench", black_box(&slots), black_box(&mover), target);
                black_box(outcome);
            });
        });
    }

    group.finish();
}

/// Benchmark planning a compaction.
fn bench_plan_compaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("plan_compaction");

    for size in [10, 100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("scattered", size), size, |b, &size| {
            let slots = scattered_slots(size);
            b.iter(|| black_box(plan_compaction(black_box(&slots))));
        });
        group.bench_with_input(BenchmarkId::new("dense", size), size, |b, &size| {
            let slots = dense_slots(size);
            b.iter(|| black_box(plan_compaction(black_box(&slots))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_plan_swap,
    bench_plan_swap_duplicates,
    bench_plan_compaction,
);

criterion_main!(benches);
