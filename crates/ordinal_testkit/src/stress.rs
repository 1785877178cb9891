//! Stress tests for Ordinal.
//!
//! These drivers hammer one or more collections with moves from several
//! threads. Each move is its own unit of work in the store, so the drivers
//! check that duplicates never appear whatever the interleaving.

use crate::fixtures::scenarios;
use ordinal_core::{Collection, OrderEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a stress test run.
#[derive(Debug, Clone)]
pub struct StressTestResult {
    /// Total operations performed.
    pub total_ops: usize,
    /// Successful operations.
    pub successful_ops: usize,
    /// Failed operations.
    pub failed_ops: usize,
    /// Total duration.
    pub duration: Duration,
    /// Operations per second.
    pub ops_per_second: f64,
}

impl StressTestResult {
    /// Creates a new result.
    pub fn new(successful: usize, failed: usize, duration: Duration) -> Self {
        let total = successful + failed;
        let ops_per_second = if duration.as_secs_f64() > 0.0 {
            total as f64 / duration.as_secs_f64()
        } else {
            0.0
        };

        Self {
            total_ops: total,
            successful_ops: successful,
            failed_ops: failed,
            duration,
            ops_per_second,
        }
    }
}

/// Configuration for stress tests.
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Number of moves to perform (split across threads).
    pub operations: usize,
    /// Number of concurrent threads.
    pub threads: usize,
    /// Rows seeded before the run.
    pub rows: usize,
    /// Largest target position; above `rows` produces sparse tails.
    pub max_target: i64,
    /// Seed for target selection, so a failing run can be replayed.
    pub seed: u64,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            operations: 2_000,
            threads: 4,
            rows: 50,
            max_target: 60,
            seed: 0x0D1A,
        }
    }
}

fn random_move(rng: &mut StdRng, ids: &[String], max_target: i64) -> (usize, i64) {
    (rng.gen_range(0..ids.len()), rng.gen_range(1..=max_target.max(1)))
}

/// Run a sequential move stress test against one collection.
pub fn stress_sequential_moves(
    engine: &OrderEngine,
    collection: Collection,
    config: &StressConfig,
) -> StressTestResult {
    let ids = scenarios::seed(engine, collection, config.rows);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let start = Instant::now();
    let mut successful = 0usize;
    let mut failed = 0usize;

    for _ in 0..config.operations {
        let (row, target) = random_move(&mut rng, &ids, config.max_target);
        match engine.move_to(collection, &ids[row], target) {
            Ok(_) => successful += 1,
            Err(_) => failed += 1,
        }
    }

    StressTestResult::new(successful, failed, start.elapsed())
}

/// Run concurrent moves against one collection.
pub fn stress_concurrent_moves(
    engine: Arc<OrderEngine>,
    collection: Collection,
    config: &StressConfig,
) -> StressTestResult {
    let ids = Arc::new(scenarios::seed(&engine, collection, config.rows));
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let threads = config.threads.max(1);
    let ops_per_thread = config.operations / threads;

    let start = Instant::now();

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = Arc::clone(&engine);
            let ids = Arc::clone(&ids);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let max_target = config.max_target;
            let seed = config.seed.wrapping_add(t as u64);

            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                for _ in 0..ops_per_thread {
                    let (row, target) = random_move(&mut rng, &ids, max_target);
                    match engine.move_to(collection, &ids[row], target) {
                        Ok(_) => {
                            successful.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(_) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

/// Run one thread per collection, mixing moves with compactions.
///
/// Collections are independent, so every thread should see every one of
/// its operations succeed.
pub fn stress_independent_collections(
    engine: Arc<OrderEngine>,
    config: &StressConfig,
) -> StressTestResult {
    let successful = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let ops_per_collection = config.operations / Collection::ALL.len();

    let seeded: Vec<_> = Collection::ALL
        .into_iter()
        .map(|c| (c, scenarios::seed(&engine, c, config.rows)))
        .collect();

    let start = Instant::now();

    let handles: Vec<_> = seeded
        .into_iter()
        .enumerate()
        .map(|(t, (collection, ids))| {
            let engine = Arc::clone(&engine);
            let successful = Arc::clone(&successful);
            let failed = Arc::clone(&failed);
            let max_target = config.max_target;
            let seed = config.seed.wrapping_add(t as u64);

            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                for i in 0..ops_per_collection {
                    let ok = if i % 10 == 9 {
                        engine.compact(collection).is_ok()
                    } else {
                        let (row, target) = random_move(&mut rng, &ids, max_target);
                        engine.move_to(collection, &ids[row], target).is_ok()
                    };
                    let counter = if ok { &successful } else { &failed };
                    counter.fetch_add(1, Ordering::Relaxed);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    StressTestResult::new(
        successful.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed),
        start.elapsed(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::TestEngine;
    use ordinal_store::InMemoryStore;

    fn small() -> StressConfig {
        StressConfig {
            operations: 400,
            threads: 4,
            rows: 12,
            max_target: 16,
            ..Default::default()
        }
    }

    #[test]
    fn test_sequential_moves() {
        let engine = TestEngine::memory();
        let result = stress_sequential_moves(&engine, Collection::Places, &small());
        assert_eq!(result.failed_ops, 0);
        assert_eq!(result.successful_ops, 400);
        assert!(engine.validate_no_duplicates(Collection::Places).unwrap());
    }

    #[test]
    fn test_concurrent_moves() {
        let engine = Arc::new(OrderEngine::new(Arc::new(InMemoryStore::new())));
        engine.prepare().unwrap();
        let result = stress_concurrent_moves(Arc::clone(&engine), Collection::Restaurants, &small());
        assert_eq!(result.failed_ops, 0);
        assert!(engine.validate_no_duplicates(Collection::Restaurants).unwrap());
    }

    #[test]
    fn test_independent_collections() {
        let engine = Arc::new(OrderEngine::new(Arc::new(InMemoryStore::new())));
        engine.prepare().unwrap();
        let result = stress_independent_collections(Arc::clone(&engine), &small());
        assert_eq!(result.failed_ops, 0);
        for collection in Collection::ALL {
            assert!(engine.validate_no_duplicates(collection).unwrap());
        }
    }
}
