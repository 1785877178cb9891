//! Engine counters and per-collection order statistics.
//!
//! # Usage
//!
//! ```rust,ignore
//! let engine = OrderEngine::new(store);
//! engine.move_to(Collection::Places, "p1", 3)?;
//!
//! let counters = engine.stats().snapshot();
//! println!("Moves: {}", counters.moves);
//!
//! let order = engine.order_stats(Collection::Places)?;
//! println!("Dense: {}", order.is_dense);
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Engine-wide operation counters.
///
/// All counters are atomic and monotonically increasing.
#[derive(Debug, Default)]
pub struct EngineStats {
    /// Moves that changed at least one row.
    moves: AtomicU64,
    /// Moves whose target was already the current position.
    no_op_moves: AtomicU64,
    /// Rows relocated to resolve a collision.
    displacements: AtomicU64,
    /// Compactions run.
    compactions: AtomicU64,
    /// Reorders run.
    reorders: AtomicU64,
    /// Rows rewritten by compactions and reorders.
    rows_renumbered: AtomicU64,
    /// Batches started.
    batches: AtomicU64,
    /// Operations rejected by validation.
    rejected: AtomicU64,
    /// Operations that failed in the store.
    store_failures: AtomicU64,
}

impl EngineStats {
    /// Creates a new stats instance.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_move(&self, displaced: usize) {
        self.moves.fetch_add(1, Ordering::Relaxed);
        self.displacements
            .fetch_add(displaced as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_no_op(&self) {
        self.no_op_moves.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_compaction(&self, rows: usize) {
        self.compactions.fetch_add(1, Ordering::Relaxed);
        self.rows_renumbered.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_reorder(&self, rows: usize) {
        self.reorders.fetch_add(1, Ordering::Relaxed);
        self.rows_renumbered.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_batch(&self) {
        self.batches.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_store_failure(&self) {
        self.store_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of moves that changed rows.
    pub fn moves(&self) -> u64 {
        self.moves.load(Ordering::Relaxed)
    }

    /// Returns the number of no-op moves.
    pub fn no_op_moves(&self) -> u64 {
        self.no_op_moves.load(Ordering::Relaxed)
    }

    /// Returns the number of rows displaced by collisions.
    pub fn displacements(&self) -> u64 {
        self.displacements.load(Ordering::Relaxed)
    }

    /// Returns the number of store failures.
    pub fn store_failures(&self) -> u64 {
        self.store_failures.load(Ordering::Relaxed)
    }

    /// Returns a snapshot of all counters.
    pub fn snapshot(&self) -> EngineStatsSnapshot {
        EngineStatsSnapshot {
            moves: self.moves(),
            no_op_moves: self.no_op_moves(),
            displacements: self.displacements(),
            compactions: self.compactions.load(Ordering::Relaxed),
            reorders: self.reorders.load(Ordering::Relaxed),
            rows_renumbered: self.rows_renumbered.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            store_failures: self.store_failures(),
        }
    }
}

/// A point-in-time copy of [`EngineStats`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct EngineStatsSnapshot {
    /// Moves that changed at least one row.
    pub moves: u64,
    /// Moves whose target was already the current position.
    pub no_op_moves: u64,
    /// Rows relocated to resolve a collision.
    pub displacements: u64,
    /// Compactions run.
    pub compactions: u64,
    /// Reorders run.
    pub reorders: u64,
    /// Rows rewritten by compactions and reorders.
    pub rows_renumbered: u64,
    /// Batches started.
    pub batches: u64,
    /// Operations rejected by validation.
    pub rejected: u64,
    /// Operations that failed in the store.
    pub store_failures: u64,
}

/// Positions shared by more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// The shared position.
    pub position: i64,
    /// Ids holding it, in canonical order.
    pub ids: Vec<String>,
}

/// Shape of one collection's ordering.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OrderStats {
    /// Number of live rows.
    pub total: u64,
    /// Smallest position, if any rows exist.
    pub min_position: Option<i64>,
    /// Largest position, if any rows exist.
    pub max_position: Option<i64>,
    /// Groups of rows sharing a position.
    pub duplicates: Vec<DuplicateGroup>,
    /// Positions in `1..=max_position` held by no row.
    pub gap_count: u64,
    /// Smallest missing position, if any.
    pub first_gap: Option<i64>,
    /// True when positions are exactly `1..=total`.
    pub is_dense: bool,
    /// Append position for the next insert.
    pub next_position: i64,
}

impl OrderStats {
    /// Computes statistics from `(id, position)` pairs in canonical order.
    pub fn from_positions<'a>(slots: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        let mut by_position: BTreeMap<i64, Vec<String>> = BTreeMap::new();
        let mut total = 0u64;
        for (id, position) in slots {
            total += 1;
            by_position.entry(position).or_default().push(id.to_string());
        }

        let min_position = by_position.keys().next().copied();
        let max_position = by_position.keys().next_back().copied();
        let duplicates = by_position
            .iter()
            .filter(|(_, ids)| ids.len() > 1)
            .map(|(position, ids)| DuplicateGroup {
                position: *position,
                ids: ids.clone(),
            })
            .collect();

        let distinct_in_range = by_position.range(1..).count() as u64;
        let gap_count = max_position.map_or(0, |max| {
            u64::try_from(max.max(0)).unwrap_or(0) - distinct_in_range
        });
        let first_gap = if gap_count == 0 {
            None
        } else {
            (1..).find(|p| !by_position.contains_key(p))
        };
        let is_dense = by_position.len() as u64 == total
            && gap_count == 0
            && min_position.map_or(true, |min| min == 1);

        Self {
            total,
            min_position,
            max_position,
            duplicates,
            gap_count,
            first_gap,
            is_dense,
            next_position: ordinal_store::plan::next_position(total),
        }
    }

    /// True when at least two rows share a position.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}
