//! Row representation shared by every backend.

use crate::error::{StoreError, StoreResult};
use serde_json::Value;
use std::cmp::Ordering;

/// A stored row: column name to value.
///
/// Only the id column, the position column and [`CREATED_AT_COLUMN`] mean
/// anything to the store. Every other column is a business attribute and is
/// carried through untouched.
pub type Row = serde_json::Map<String, Value>;

/// Column holding the creation timestamp (Unix milliseconds).
pub const CREATED_AT_COLUMN: &str = "created_at";

/// The ordering-relevant projection of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Row id.
    pub id: String,
    /// Current position.
    pub position: i64,
    /// Creation timestamp, used to break position ties.
    pub created_at: i64,
}

impl Slot {
    /// Creates a slot.
    pub fn new(id: impl Into<String>, position: i64, created_at: i64) -> Self {
        Self {
            id: id.into(),
            position,
            created_at,
        }
    }

    /// Projects a row onto its slot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupted`] if the id is not a string or the
    /// position is not an integer. A missing `created_at` reads as 0.
    pub fn from_row(table: &str, row: &Row, id_column: &str, order_column: &str) -> StoreResult<Self> {
        let id = match row.get(id_column) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(StoreError::corrupted(
                    table,
                    format!("column {id_column} is missing or not a string"),
                ))
            }
        };
        let position = row.get(order_column).and_then(Value::as_i64).ok_or_else(|| {
            StoreError::corrupted(
                table,
                format!("row {id}: column {order_column} is missing or not an integer"),
            )
        })?;
        let created_at = row
            .get(CREATED_AT_COLUMN)
            .and_then(Value::as_i64)
            .unwrap_or(0);
        Ok(Self {
            id,
            position,
            created_at,
        })
    }

    /// Canonical display order: position, then creation time, then id.
    ///
    /// The id comparison only matters for rows created in the same
    /// millisecond at the same position; it keeps the order total.
    #[must_use]
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.position
            .cmp(&other.position)
            .then(self.created_at.cmp(&other.created_at))
            .then_with(|| self.id.cmp(&other.id))
    }
}

/// Projects every row of a table onto its slot.
pub fn slots_of(
    table: &str,
    rows: &[Row],
    id_column: &str,
    order_column: &str,
) -> StoreResult<Vec<Slot>> {
    rows.iter()
        .map(|row| Slot::from_row(table, row, id_column, order_column))
        .collect()
}

/// Checks that `name` is a plain SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
///
/// Table and column names are interpolated into SQL text, so anything
/// else is rejected.
pub fn validate_identifier(name: &str) -> StoreResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid && name.len() <= 64 {
        Ok(())
    } else {
        Err(StoreError::InvalidIdentifier(name.to_string()))
    }
}
