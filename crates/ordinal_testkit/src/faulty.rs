//! Fault injection.
//!
//! [`FaultyStore`] wraps a real store and fails chosen procedure calls
//! before they reach it, the way a dropped connection would: the unit of
//! work never starts, so nothing is written.

use ordinal_store::{PositionStore, Row, StoreError, StoreResult, SwapOutcome};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// A store wrapper that fails selected swap calls.
///
/// Swap calls are numbered from 1 in the order they arrive. Every other
/// procedure passes straight through unless
/// [`FaultyStore::set_fail_all`] turned every call into a failure.
#[derive(Debug)]
pub struct FaultyStore<S> {
    inner: S,
    swaps: AtomicUsize,
    failing_swaps: Mutex<HashSet<usize>>,
    fail_all: AtomicBool,
}

impl<S: PositionStore> FaultyStore<S> {
    /// Wraps `inner` with no faults armed.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            swaps: AtomicUsize::new(0),
            failing_swaps: Mutex::new(HashSet::new()),
            fail_all: AtomicBool::new(false),
        }
    }

    /// Makes the `n`-th swap call (1-based) fail.
    #[must_use]
    pub fn fail_swap_at(self, n: usize) -> Self {
        self.arm_swap(n);
        self
    }

    /// Arms a failure for the `n`-th swap call on a shared store.
    pub fn arm_swap(&self, n: usize) {
        self.failing_swaps
            .lock()
            .expect("fault table poisoned")
            .insert(n);
    }

    /// Makes every call fail until cleared.
    pub fn set_fail_all(&self, value: bool) {
        self.fail_all.store(value, Ordering::SeqCst);
    }

    /// Number of swap calls received, failed ones included.
    pub fn swaps(&self) -> usize {
        self.swaps.load(Ordering::SeqCst)
    }

    /// The wrapped store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn check(&self, operation: &str) -> StoreResult<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("injected fault in {operation}")));
        }
        Ok(())
    }
}

impl<S: PositionStore> PositionStore for FaultyStore<S> {
    fn ensure_table(&self, table: &str, id_column: &str, order_column: &str) -> StoreResult<()> {
        self.check("ensure_table")?;
        self.inner.ensure_table(table, id_column, order_column)
    }

    fn list(&self, table: &str) -> StoreResult<Vec<Row>> {
        self.check("list")?;
        self.inner.list(table)
    }

    fn count(&self, table: &str) -> StoreResult<u64> {
        self.check("count")?;
        self.inner.count(table)
    }

    fn insert(&self, table: &str, id_column: &str, row: Row) -> StoreResult<String> {
        self.check("insert")?;
        self.inner.insert(table, id_column, row)
    }

    fn delete(&self, table: &str, id_column: &str, id: &str) -> StoreResult<bool> {
        self.check("delete")?;
        self.inner.delete(table, id_column, id)
    }

    fn get_next_order_position(&self, table: &str, column: &str) -> StoreResult<i64> {
        self.check("get_next_order_position")?;
        self.inner.get_next_order_position(table, column)
    }

    fn swap_order_position(
        &self,
        table: &str,
        id: &str,
        new_position: i64,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<SwapOutcome> {
        let n = self.swaps.fetch_add(1, Ordering::SeqCst) + 1;
        self.check("swap_order_position")?;
        let armed = self
            .failing_swaps
            .lock()
            .expect("fault table poisoned")
            .remove(&n);
        if armed {
            return Err(StoreError::Unavailable(format!(
                "injected fault in swap #{n}"
            )));
        }
        self.inner
            .swap_order_position(table, id, new_position, id_column, order_column)
    }

    fn compact_order_positions(&self, table: &str, column: &str) -> StoreResult<usize> {
        self.check("compact_order_positions")?;
        self.inner.compact_order_positions(table, column)
    }

    fn reorder_positions(
        &self,
        table: &str,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<usize> {
        self.check("reorder_positions")?;
        self.inner.reorder_positions(table, id_column, order_column)
    }
}
