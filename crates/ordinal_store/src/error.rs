//! Error types for store operations.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while talking to a position store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed row does not exist.
    #[error("row {id} not found in table {table}")]
    RowNotFound {
        /// Table that was searched.
        table: String,
        /// Id that was not found.
        id: String,
    },

    /// A table or column name is not a plain SQL identifier.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A write violated a store constraint (duplicate id, missing column).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The store cannot be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The atomic unit of work aborted because of a concurrent transaction.
    #[error("transaction conflict: {0}")]
    Conflict(String),

    /// A stored row does not have the expected shape.
    #[error("corrupted row in table {table}: {message}")]
    Corrupted {
        /// Table holding the row.
        table: String,
        /// Description of the problem.
        message: String,
    },

    /// SQLite error.
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// JSON encoding or decoding error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a row not found error.
    pub fn row_not_found(table: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RowNotFound {
            table: table.into(),
            id: id.into(),
        }
    }

    /// Creates a corrupted row error.
    pub fn corrupted(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corrupted {
            table: table.into(),
            message: message.into(),
        }
    }

    /// Returns true if retrying the same call later may succeed.
    ///
    /// The engine never retries on its own; callers use this to decide.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::Conflict(_) => true,
            #[cfg(feature = "sqlite")]
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
