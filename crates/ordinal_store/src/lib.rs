//! # Ordinal Store
//!
//! Position store trait and backends for Ordinal.
//!
//! A position store holds ordered tables: rows with an id, an integer
//! position and arbitrary business attributes. The store is the only place
//! rows are mutated, and it exposes the four ordering procedures as atomic
//! units of work:
//!
//! - `get_next_order_position` - append position for a table
//! - `swap_order_position` - move one row, displacing whoever holds the slot
//! - `compact_order_positions` - renumber to `1..=N` after deletions
//! - `reorder_positions` - the same renumbering, used as a repair action
//!
//! The decision logic lives in [`plan`] so every backend resolves
//! collisions the same way.
//!
//! ## Available Backends
//!
//! - [`InMemoryStore`] - For testing and ephemeral catalogs
//! - `SqliteStore` - SQLite-backed store (feature `sqlite`, on by default)
//!
//! ## Example
//!
//! ```rust
//! use ordinal_store::{InMemoryStore, PositionStore, Row};
//! use serde_json::json;
//!
//! let store = InMemoryStore::new();
//! store.ensure_table("places", "id", "position").unwrap();
//! for (id, position) in [("a", 1), ("b", 2)] {
//!     let mut row = Row::new();
//!     row.insert("id".into(), json!(id));
//!     row.insert("position".into(), json!(position));
//!     store.insert("places", "id", row).unwrap();
//! }
//!
//! let outcome = store
//!     .swap_order_position("places", "b", 1, "id", "position")
//!     .unwrap();
//! assert_eq!(outcome.displaced[0].id, "a");
//! assert_eq!(outcome.displaced[0].to, 2);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod clock;
mod error;
mod memory;
pub mod plan;
mod row;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use backend::PositionStore;
pub use clock::CreationClock;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use plan::{Displacement, SwapOutcome};
pub use row::{slots_of, validate_identifier, Row, Slot, CREATED_AT_COLUMN};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteStore, ATTRIBUTES_COLUMN};
