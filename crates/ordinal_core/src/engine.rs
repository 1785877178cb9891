//! The order engine.

use crate::client::CollectionClient;
use crate::collection::Collection;
use crate::config::EngineConfig;
use crate::entity::{decode_row, sort_rows, OrderedEntity};
use crate::error::{CoreError, CoreResult};
use crate::position::Position;
use crate::report::{BatchOutcome, MoveOutcome, MoveRequest};
use crate::stats::{EngineStats, OrderStats};
use ordinal_store::{slots_of, PositionStore, Row};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Maintains a strict, duplicate-free ordering over every registered
/// collection.
///
/// The engine is an explicit value: construct it once with the store it
/// should drive and hand out references (or wrap it in an `Arc`). It holds
/// no lock of its own. Every operation that writes more than one row is a
/// single store procedure, so exclusion between concurrent callers comes
/// from the store's transactions.
///
/// # Example
///
/// ```rust
/// use ordinal_core::{Collection, OrderEngine};
/// use ordinal_store::{InMemoryStore, Row};
/// use std::sync::Arc;
///
/// let engine = OrderEngine::new(Arc::new(InMemoryStore::new()));
/// engine.prepare().unwrap();
///
/// let a = engine.append(Collection::Excursions, Row::new()).unwrap();
/// let b = engine.append(Collection::Excursions, Row::new()).unwrap();
///
/// let outcome = engine.move_to(Collection::Excursions, &b, 1).unwrap();
/// assert_eq!(outcome.displaced[0].id, a);
/// assert!(engine.validate_no_duplicates(Collection::Excursions).unwrap());
/// ```
pub struct OrderEngine {
    store: Arc<dyn PositionStore>,
    config: EngineConfig,
    stats: EngineStats,
}

impl OrderEngine {
    /// Creates an engine with default configuration.
    pub fn new(store: Arc<dyn PositionStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Creates an engine with custom configuration.
    pub fn with_config(store: Arc<dyn PositionStore>, config: EngineConfig) -> Self {
        Self {
            store,
            config,
            stats: EngineStats::new(),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<dyn PositionStore> {
        &self.store
    }

    /// Returns the configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    /// Returns a facade bound to one collection.
    pub fn client(&self, collection: Collection) -> CollectionClient<'_> {
        CollectionClient::new(self, collection)
    }

    /// Makes sure every registered collection has its table.
    pub fn prepare(&self) -> CoreResult<()> {
        for collection in Collection::ALL {
            let d = collection.descriptor();
            self.store
                .ensure_table(d.table, d.id_field, d.position_field)?;
        }
        Ok(())
    }

    /// Inserts a row at the tail of `collection` and returns its id.
    ///
    /// The position comes from [`Self::next_position`]. Two concurrent
    /// appends can pick the same value; the next move or compaction
    /// resolves it.
    pub fn append(&self, collection: Collection, mut attributes: Row) -> CoreResult<String> {
        let d = collection.descriptor();
        let position = self.next_position(collection)?;
        attributes.insert(d.position_field.to_string(), Value::from(position));
        let id = self
            .store
            .insert(d.table, d.id_field, attributes)
            .map_err(|e| self.store_failure(collection, "append", e))?;
        info!(collection = %collection, id = %id, position, "appended row");
        Ok(id)
    }

    /// Deletes a row. Survivors keep their positions until compaction.
    pub fn remove(&self, collection: Collection, id: &str) -> CoreResult<bool> {
        let d = collection.descriptor();
        let removed = self
            .store
            .delete(d.table, d.id_field, id)
            .map_err(|e| self.store_failure(collection, "remove", e))?;
        if removed {
            info!(collection = %collection, id, "removed row");
        }
        Ok(removed)
    }

    /// Returns `count + 1` for `collection`. Advisory, nothing is reserved.
    pub fn next_position(&self, collection: Collection) -> CoreResult<i64> {
        let d = collection.descriptor();
        let next = self
            .store
            .get_next_order_position(d.table, d.position_field)
            .map_err(|e| self.store_failure(collection, "next_position", e))?;
        debug!(collection = %collection, next, "computed next position");
        Ok(next)
    }

    /// Moves `id` to `target`, displacing whoever holds that slot.
    ///
    /// A target equal to the current position succeeds without writing. A
    /// target beyond the collection size is accepted as is.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidPosition`] if `target < 1`; the store is not
    ///   contacted.
    /// - [`CoreError::Store`] if the row is missing or the unit of work
    ///   aborted; nothing was written.
    pub fn move_to(&self, collection: Collection, id: &str, target: i64) -> CoreResult<MoveOutcome> {
        let target = Position::new(target).map_err(|e| {
            self.stats.record_rejected();
            debug!(collection = %collection, id, error = %e, "rejected move");
            e
        })?;
        self.move_to_position(collection, id, target)
    }

    /// Moves `id` to an already validated position.
    pub fn move_to_position(
        &self,
        collection: Collection,
        id: &str,
        target: Position,
    ) -> CoreResult<MoveOutcome> {
        let d = collection.descriptor();
        let outcome = self
            .store
            .swap_order_position(d.table, id, target.get(), d.id_field, d.position_field)
            .map_err(|e| self.store_failure(collection, "move", e))?;

        if outcome.is_no_op() {
            self.stats.record_no_op();
            debug!(collection = %collection, id, position = target.get(), "move is a no-op");
            return Ok(outcome);
        }

        self.stats.record_move(outcome.displaced.len());
        info!(
            collection = %collection,
            id,
            from = outcome.previous_position,
            to = outcome.new_position,
            displaced = outcome.displaced.len(),
            "moved row"
        );
        if outcome.displaced.len() > 1 {
            warn!(
                collection = %collection,
                target = target.get(),
                displaced = outcome.displaced.len(),
                "target slot was shared by several rows"
            );
        }
        for displaced in &outcome.displaced {
            debug!(
                collection = %collection,
                id = %displaced.id,
                from = displaced.from,
                to = displaced.to,
                "displaced row"
            );
        }
        self.verify(collection);
        Ok(outcome)
    }

    /// Applies `moves` one at a time, in order.
    ///
    /// Each move is its own unit of work. The batch stops at the first
    /// failing move; moves before it stay applied and later ones are never
    /// attempted.
    ///
    /// # Errors
    ///
    /// - [`CoreError::BatchTooLarge`] before anything is applied.
    /// - [`CoreError::BatchInterrupted`] carrying the applied count.
    pub fn batch_move(&self, collection: Collection, moves: &[MoveRequest]) -> CoreResult<BatchOutcome> {
        if moves.len() > self.config.max_batch_moves {
            self.stats.record_rejected();
            return Err(CoreError::BatchTooLarge {
                len: moves.len(),
                max: self.config.max_batch_moves,
            });
        }
        self.stats.record_batch();

        let mut outcomes = Vec::with_capacity(moves.len());
        for (index, request) in moves.iter().enumerate() {
            match self.move_to(collection, &request.id, request.position) {
                Ok(outcome) => outcomes.push(outcome),
                Err(source) => {
                    warn!(
                        collection = %collection,
                        applied = outcomes.len(),
                        failed_index = index,
                        error = %source,
                        "batch stopped"
                    );
                    return Err(CoreError::BatchInterrupted {
                        applied: outcomes.len(),
                        failed_index: index,
                        source: Box::new(source),
                    });
                }
            }
        }

        info!(collection = %collection, applied = outcomes.len(), "batch applied");
        Ok(BatchOutcome {
            applied: outcomes.len(),
            outcomes,
        })
    }

    /// Renumbers `collection` to `1..=N` in canonical order.
    ///
    /// Returns the number of rows rewritten; a second call returns 0.
    pub fn compact(&self, collection: Collection) -> CoreResult<usize> {
        let d = collection.descriptor();
        let rows = self
            .store
            .compact_order_positions(d.table, d.position_field)
            .map_err(|e| self.store_failure(collection, "compact", e))?;
        self.stats.record_compaction(rows);
        info!(collection = %collection, rows, "compacted positions");
        self.verify(collection);
        Ok(rows)
    }

    /// Repairs `collection` when duplicates are suspected.
    ///
    /// Same effect as [`Self::compact`].
    pub fn reorder(&self, collection: Collection) -> CoreResult<usize> {
        let d = collection.descriptor();
        let rows = self
            .store
            .reorder_positions(d.table, d.id_field, d.position_field)
            .map_err(|e| self.store_failure(collection, "reorder", e))?;
        self.stats.record_reorder(rows);
        info!(collection = %collection, rows, "reordered positions");
        self.verify(collection);
        Ok(rows)
    }

    /// Returns false if two live rows share a position. Read only.
    pub fn validate_no_duplicates(&self, collection: Collection) -> CoreResult<bool> {
        let d = collection.descriptor();
        let rows = self
            .store
            .list(d.table)
            .map_err(|e| self.store_failure(collection, "validate", e))?;
        let slots = slots_of(d.table, &rows, d.id_field, d.position_field)?;
        let mut seen = HashSet::with_capacity(slots.len());
        Ok(slots.iter().all(|slot| seen.insert(slot.position)))
    }

    /// Returns every row of `collection` in canonical order.
    pub fn get_ordered_entities(&self, collection: Collection) -> CoreResult<Vec<OrderedEntity>> {
        self.sorted_rows(collection)?
            .into_iter()
            .map(|row| OrderedEntity::from_row(collection, row))
            .collect()
    }

    /// Returns every row of `collection` in canonical order, decoded as `T`.
    ///
    /// `T` sees the whole row: id, position and `created_at` columns
    /// included.
    pub fn get_ordered_items<T: DeserializeOwned>(&self, collection: Collection) -> CoreResult<Vec<T>> {
        self.sorted_rows(collection)?
            .into_iter()
            .map(|row| decode_row(collection, row))
            .collect()
    }

    /// Computes the shape of `collection`'s ordering.
    pub fn order_stats(&self, collection: Collection) -> CoreResult<OrderStats> {
        let d = collection.descriptor();
        let rows = self
            .store
            .list(d.table)
            .map_err(|e| self.store_failure(collection, "stats", e))?;
        let sorted = sort_rows(collection, rows)?;
        Ok(OrderStats::from_positions(
            sorted.iter().map(|(slot, _)| (slot.id.as_str(), slot.position)),
        ))
    }

    fn sorted_rows(&self, collection: Collection) -> CoreResult<Vec<Row>> {
        let d = collection.descriptor();
        let rows = self
            .store
            .list(d.table)
            .map_err(|e| self.store_failure(collection, "list", e))?;
        debug!(collection = %collection, rows = rows.len(), "read rows");
        Ok(sort_rows(collection, rows)?
            .into_iter()
            .map(|(_, row)| row)
            .collect())
    }

    fn store_failure(
        &self,
        collection: Collection,
        operation: &'static str,
        err: ordinal_store::StoreError,
    ) -> CoreError {
        self.stats.record_store_failure();
        warn!(collection = %collection, operation, error = %err, "store operation failed");
        CoreError::Store(err)
    }

    fn verify(&self, collection: Collection) {
        if !self.config.verify_after_write {
            return;
        }
        match self.validate_no_duplicates(collection) {
            Ok(true) => {}
            Ok(false) => warn!(
                collection = %collection,
                "duplicate positions detected after write; run reorder to repair"
            ),
            Err(err) => warn!(collection = %collection, error = %err, "post-write verification failed"),
        }
    }
}

impl std::fmt::Debug for OrderEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderEngine")
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}
