//! Position store trait definition.

use crate::error::StoreResult;
use crate::plan::SwapOutcome;
use crate::row::Row;

/// A relational store holding ordered tables.
///
/// The store owns row identity and the physical rows. The four ordering
/// procedures take table and column names as parameters so a single
/// implementation serves every collection.
///
/// # Invariants
///
/// - Every procedure is one atomic unit of work: all of its writes land or
///   none do.
/// - Procedures re-read the table inside their unit of work, so concurrent
///   callers each resolve collisions against the latest committed state.
/// - Implementations never hold an in-process lock while waiting on I/O that
///   belongs to a different procedure call.
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - For tests and ephemeral data
/// - `SqliteStore` - SQLite-backed store (feature `sqlite`)
pub trait PositionStore: Send + Sync {
    /// Makes sure `table` exists with the given id and position columns.
    ///
    /// Idempotent. Existing tables are left as they are.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is not a valid identifier or the table
    /// cannot be created.
    fn ensure_table(&self, table: &str, id_column: &str, order_column: &str) -> StoreResult<()>;

    /// Returns every row of `table` in storage scan order.
    ///
    /// A table that has never been written is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self, table: &str) -> StoreResult<Vec<Row>>;

    /// Returns the number of rows in `table`.
    fn count(&self, table: &str) -> StoreResult<u64>;

    /// Inserts a row and returns its id.
    ///
    /// A missing id column gets a fresh UUID and a missing `created_at` gets
    /// the current time, strictly increasing per store. The position column
    /// is written as given: a collision at insert time is tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::Constraint`] if the id already exists or
    /// the table was never set up with [`PositionStore::ensure_table`].
    fn insert(&self, table: &str, id_column: &str, row: Row) -> StoreResult<String>;

    /// Deletes a row. Survivors are not renumbered.
    ///
    /// Returns false if no row had that id.
    fn delete(&self, table: &str, id_column: &str, id: &str) -> StoreResult<bool>;

    /// Returns the append position, `count + 1`.
    ///
    /// Advisory only: nothing is reserved.
    fn get_next_order_position(&self, table: &str, column: &str) -> StoreResult<i64>;

    /// Moves row `id` to `new_position`, displacing any holder of that slot.
    ///
    /// See [`crate::plan`] for the resolution rule.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StoreError::RowNotFound`] if `id` does not exist, or
    /// a store error if the unit of work aborts. Nothing is written on error.
    fn swap_order_position(
        &self,
        table: &str,
        id: &str,
        new_position: i64,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<SwapOutcome>;

    /// Renumbers `table` to `1..=N` in canonical order.
    ///
    /// Returns the number of rows whose position changed.
    fn compact_order_positions(&self, table: &str, column: &str) -> StoreResult<usize>;

    /// Repairs `table` after suspected duplicates.
    ///
    /// Same effect as compaction; returns the number of rows rewritten.
    fn reorder_positions(&self, table: &str, id_column: &str, order_column: &str)
        -> StoreResult<usize>;
}

impl<S: PositionStore + ?Sized> PositionStore for std::sync::Arc<S> {
    fn ensure_table(&self, table: &str, id_column: &str, order_column: &str) -> StoreResult<()> {
        (**self).ensure_table(table, id_column, order_column)
    }

    fn list(&self, table: &str) -> StoreResult<Vec<Row>> {
        (**self).list(table)
    }

    fn count(&self, table: &str) -> StoreResult<u64> {
        (**self).count(table)
    }

    fn insert(&self, table: &str, id_column: &str, row: Row) -> StoreResult<String> {
        (**self).insert(table, id_column, row)
    }

    fn delete(&self, table: &str, id_column: &str, id: &str) -> StoreResult<bool> {
        (**self).delete(table, id_column, id)
    }

    fn get_next_order_position(&self, table: &str, column: &str) -> StoreResult<i64> {
        (**self).get_next_order_position(table, column)
    }

    fn swap_order_position(
        &self,
        table: &str,
        id: &str,
        new_position: i64,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<SwapOutcome> {
        (**self).swap_order_position(table, id, new_position, id_column, order_column)
    }

    fn compact_order_positions(&self, table: &str, column: &str) -> StoreResult<usize> {
        (**self).compact_order_positions(table, column)
    }

    fn reorder_positions(
        &self,
        table: &str,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<usize> {
        (**self).reorder_positions(table, id_column, order_column)
    }
}
