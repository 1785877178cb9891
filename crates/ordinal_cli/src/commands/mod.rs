//! CLI command implementations.

pub mod delete;
pub mod init;
pub mod insert;
pub mod list;
pub mod moves;
pub mod next;
pub mod renumber;
pub mod stats;
pub mod validate;

use ordinal_core::{Collection, CoreResult, OrderEngine};
use ordinal_store::SqliteStore;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Result type for commands.
pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// How command output is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Failures reported by commands after the engine itself succeeded.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The engine reported an operation as failed.
    #[error("{0}")]
    Rejected(String),

    /// No row with that id.
    #[error("row {id} not found in {collection}")]
    RowNotFound {
        /// Collection searched.
        collection: Collection,
        /// Missing id.
        id: String,
    },

    /// `--attributes` was not a JSON object.
    #[error("attributes must be a JSON object")]
    AttributesNotObject,

    /// Validation found duplicate positions.
    #[error("duplicate positions found in: {}", .0.join(", "))]
    DuplicatesFound(Vec<String>),
}

/// Opens the database at `path` and makes sure every table exists.
pub fn open_engine(path: &Path) -> CommandResult<OrderEngine> {
    let store = SqliteStore::open(path)?;
    let engine = OrderEngine::new(Arc::new(store));
    engine.prepare()?;
    Ok(engine)
}

/// Resolves an optional collection argument; `None` means all of them.
pub fn resolve(name: Option<&str>) -> CoreResult<Vec<Collection>> {
    match name {
        Some(name) => Ok(vec![name.parse()?]),
        None => Ok(Collection::ALL.to_vec()),
    }
}

/// Prints a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_defaults_to_all() {
        assert_eq!(resolve(None).unwrap().len(), Collection::ALL.len());
        assert_eq!(resolve(Some("Services")).unwrap(), vec![Collection::Services]);
        assert!(resolve(Some("hotels")).is_err());
    }

    #[test]
    fn duplicates_message_lists_collections() {
        let err = CommandError::DuplicatesFound(vec!["places".into(), "services".into()]);
        assert_eq!(err.to_string(), "duplicate positions found in: places, services");
    }

    #[test]
    fn open_engine_prepares_tables() {
        let dir = tempfile::TempDir::new().unwrap();
        let engine = open_engine(&dir.path().join("catalog.db")).unwrap();
        for collection in Collection::ALL {
            assert_eq!(engine.next_position(collection).unwrap(), 1);
        }
    }
}
