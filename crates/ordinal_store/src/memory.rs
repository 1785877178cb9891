//! In-memory position store.

use crate::backend::PositionStore;
use crate::clock::CreationClock;
use crate::error::{StoreError, StoreResult};
use crate::plan::{self, SwapOutcome};
use crate::row::{slots_of, validate_identifier, Row, CREATED_AT_COLUMN};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct Table {
    id_column: String,
    rows: Vec<Row>,
}

impl Table {
    fn index_of(&self, id_column: &str, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(id_column).and_then(Value::as_str) == Some(id))
    }

    fn set_position(&mut self, id_column: &str, id: &str, column: &str, position: i64) {
        if let Some(index) = self.index_of(id_column, id) {
            self.rows[index].insert(column.to_string(), Value::from(position));
        }
    }
}

/// An in-memory position store.
///
/// Suitable for:
/// - Unit and property tests
/// - Ephemeral catalogs that don't need persistence
///
/// # Atomicity
///
/// Every procedure runs under the store's write lock and computes its plan
/// before touching any row, so a failing procedure leaves the table as it
/// was. Procedures on different tables still serialize; that is the price
/// of one lock.
///
/// # Example
///
/// ```rust
/// use ordinal_store::{InMemoryStore, PositionStore, Row};
/// use serde_json::json;
///
/// let store = InMemoryStore::new();
/// store.ensure_table("places", "id", "position").unwrap();
/// let mut row = Row::new();
/// row.insert("position".into(), json!(1));
/// let id = store.insert("places", "id", row).unwrap();
/// assert_eq!(store.count("places").unwrap(), 1);
/// assert!(store.delete("places", "id", &id).unwrap());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    clock: CreationClock,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every row in `table`, for tests and debugging.
    #[must_use]
    pub fn snapshot(&self, table: &str) -> Vec<Row> {
        self.tables
            .read()
            .get(table)
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    /// Overwrites the position of one row without any resolution.
    ///
    /// This is the "manual data edit" path that can break the no-duplicates
    /// invariant; tests use it to set up repair scenarios.
    pub fn force_position(&self, table: &str, id: &str, column: &str, position: i64) -> StoreResult<()> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::row_not_found(table, id))?;
        let id_column = t.id_column.clone();
        if t.index_of(&id_column, id).is_none() {
            return Err(StoreError::row_not_found(table, id));
        }
        t.set_position(&id_column, id, column, position);
        Ok(())
    }

    fn renumber(&self, table: &str, id_column: Option<&str>, column: &str) -> StoreResult<usize> {
        let mut tables = self.tables.write();
        let Some(t) = tables.get_mut(table) else {
            return Ok(0);
        };
        let id_column = id_column.unwrap_or(&t.id_column).to_string();
        let slots = slots_of(table, &t.rows, &id_column, column)?;
        let plan = plan::plan_compaction(&slots);
        for (id, position) in &plan {
            t.set_position(&id_column, id, column, *position);
        }
        Ok(plan.len())
    }
}

impl PositionStore for InMemoryStore {
    fn ensure_table(&self, table: &str, id_column: &str, order_column: &str) -> StoreResult<()> {
        validate_identifier(table)?;
        validate_identifier(id_column)?;
        validate_identifier(order_column)?;
        self.tables
            .write()
            .entry(table.to_string())
            .or_insert_with(|| Table {
                id_column: id_column.to_string(),
                rows: Vec::new(),
            });
        Ok(())
    }

    fn list(&self, table: &str) -> StoreResult<Vec<Row>> {
        Ok(self.snapshot(table))
    }

    fn count(&self, table: &str) -> StoreResult<u64> {
        Ok(self
            .tables
            .read()
            .get(table)
            .map_or(0, |t| t.rows.len() as u64))
    }

    fn insert(&self, table: &str, id_column: &str, mut row: Row) -> StoreResult<String> {
        let id = match row.get(id_column) {
            Some(Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(StoreError::Constraint(format!(
                    "column {id_column} must be a string, got {other}"
                )))
            }
            None => {
                let id = Uuid::new_v4().to_string();
                row.insert(id_column.to_string(), Value::String(id.clone()));
                id
            }
        };
        if !row.contains_key(CREATED_AT_COLUMN) {
            row.insert(CREATED_AT_COLUMN.to_string(), Value::from(self.clock.stamp()));
        }

        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::Constraint(format!("table {table} does not exist")))?;
        if t.index_of(&t.id_column, &id).is_some() {
            return Err(StoreError::Constraint(format!(
                "duplicate id {id} in table {table}"
            )));
        }
        t.rows.push(row);
        Ok(id)
    }

    fn delete(&self, table: &str, id_column: &str, id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write();
        let Some(t) = tables.get_mut(table) else {
            return Ok(false);
        };
        match t.index_of(id_column, id) {
            Some(index) => {
                t.rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_next_order_position(&self, table: &str, _column: &str) -> StoreResult<i64> {
        Ok(plan::next_position(self.count(table)?))
    }

    fn swap_order_position(
        &self,
        table: &str,
        id: &str,
        new_position: i64,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<SwapOutcome> {
        let mut tables = self.tables.write();
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::row_not_found(table, id))?;
        let slots = slots_of(table, &t.rows, id_column, order_column)?;
        let outcome = plan::plan_swap(table, &slots, id, new_position)?;
        for (row_id, position) in outcome.writes() {
            t.set_position(id_column, row_id, order_column, position);
        }
        Ok(outcome)
    }

    fn compact_order_positions(&self, table: &str, column: &str) -> StoreResult<usize> {
        self.renumber(table, None, column)
    }

    fn reorder_positions(
        &self,
        table: &str,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<usize> {
        self.renumber(table, Some(id_column), order_column)
    }
}
