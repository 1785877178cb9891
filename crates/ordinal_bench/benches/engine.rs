//! Order engine benchmarks over both stores.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ordinal_bench::{random_moves, seed};
use ordinal_core::{Collection, OrderEngine};
use ordinal_store::{InMemoryStore, PositionStore, SqliteStore};
use std::sync::Arc;
use tempfile::TempDir;

const COLLECTION: Collection = Collection::Places;

fn memory_engine() -> OrderEngine {
    let engine = OrderEngine::new(Arc::new(InMemoryStore::new()));
    engine.prepare().unwrap();
    engine
}

fn sqlite_engine(dir: &TempDir) -> OrderEngine {
    let store: Arc<dyn PositionStore> =
        Arc::new(SqliteStore::open(dir.path().join("bench.db")).unwrap());
    let engine = OrderEngine::new(store);
    engine.prepare().unwrap();
    engine
}

/// Benchmark single moves.
fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("move");

    for size in [100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("memory", size), size, |b, &size| {
            let engine = memory_engine();
            let ids = seed(&engine, COLLECTION, size);
            let moves = random_moves(&ids, 256);
            let mut idx = 0;

            b.iter(|| {
                let (id, target) = &moves[idx];
                idx = (idx + 1) % moves.len();
                black_box(engine.move_to(COLLECTION, id, *target).unwrap());
            });
        });
    }

    // Use a smaller sample size for file-backed operations
    group.sample_size(20);
    group.bench_function("sqlite/100", |b| {
        let dir = TempDir::new().unwrap();
        let engine = sqlite_engine(&dir);
        let ids = seed(&engine, COLLECTION, 100);
        let moves = random_moves(&ids, 256);
        let mut idx = 0;

        b.iter(|| {
            let (id, target) = &moves[idx];
            idx = (idx + 1) % moves.len();
            black_box(engine.move_to(COLLECTION, id, *target).unwrap());
        });
    });

    group.finish();
}

/// Benchmark compacting a table with a hole at the front.
fn bench_compact(c: &mut Criterion) {
    let mut group = c.benchmark_group("compact");

    for size in [100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("memory", size), size, |b, &size| {
            let engine = memory_engine();
            let ids = seed(&engine, COLLECTION, size);

            b.iter(|| {
                // push the head out to the tail, then close the gap
                engine.move_to(COLLECTION, &ids[0], size as i64 + 10).unwrap();
                black_box(engine.compact(COLLECTION).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark reading a collection in display order.
fn bench_ordered_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("ordered_read");

    for size in [100, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("memory", size), size, |b, &size| {
            let engine = memory_engine();
            seed(&engine, COLLECTION, size);

            b.iter(|| {
                let items = engine
                    .get_ordered_items::<serde_json::Value>(COLLECTION)
                    .unwrap();
                black_box(items);
            });
        });
    }

    group.sample_size(20);
    group.bench_function("sqlite/1000", |b| {
        let dir = TempDir::new().unwrap();
        let engine = sqlite_engine(&dir);
        seed(&engine, COLLECTION, 1_000);

        b.iter(|| black_box(engine.get_ordered_entities(COLLECTION).unwrap()));
    });

    group.finish();
}

/// Benchmark duplicate detection.
fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");

    for size in [100, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let engine = memory_engine();
            seed(&engine, COLLECTION, size);
            b.iter(|| black_box(engine.validate_no_duplicates(COLLECTION).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_move,
    bench_compact,
    bench_ordered_read,
    bench_validate,
);

criterion_main!(benches);
