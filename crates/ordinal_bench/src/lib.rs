//! Benchmark utilities.

#![warn(missing_docs)]

use ordinal_core::{Collection, OrderEngine};
use ordinal_store::{Row, Slot};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::json;

/// Generate a dense table of `count` slots, `1..=count`, in shuffled scan
/// order.
pub fn dense_slots(count: usize) -> Vec<Slot> {
    let mut slots: Vec<Slot> = (0..count)
        .map(|i| Slot::new(format!("row{i}"), i as i64 + 1, i as i64))
        .collect();
    slots.shuffle(&mut rand::thread_rng());
    slots
}

/// Generate a gapped table with some duplicate positions.
pub fn scattered_slots(count: usize) -> Vec<Slot> {
    let mut rng = rand::thread_rng();
    let max = (count as i64 * 3).max(1);
    (0..count)
        .map(|i| Slot::new(format!("row{i}"), rng.gen_range(1..=max), i as i64))
        .collect()
}

/// Append `count` rows with a small payload; returns their ids.
pub fn seed(engine: &OrderEngine, collection: Collection, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let mut row = Row::new();
            row.insert("name".into(), json!(format!("item {i}")));
            row.insert("rating".into(), json!(i % 5));
            engine
                .append(collection, row)
                .expect("Failed to seed benchmark rows")
        })
        .collect()
}

/// Pick random `(id, target)` moves within `1..=ids.len()`.
pub fn random_moves(ids: &[String], count: usize) -> Vec<(String, i64)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let id = ids[rng.gen_range(0..ids.len())].clone();
            (id, rng.gen_range(1..=ids.len() as i64))
        })
        .collect()
}
