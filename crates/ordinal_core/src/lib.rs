//! # Ordinal Core
//!
//! Positional ordering engine for Ordinal.
//!
//! This crate provides:
//! - A closed registry of ordered collections
//! - The order engine: next position, move with collision resolution,
//!   compaction, repair, duplicate detection and batch moves
//! - A per-collection client facade returning displayable results
//! - Operation counters and per-collection order statistics
//!
//! ## Example
//!
//! ```rust
//! use ordinal_core::{Collection, OrderEngine};
//! use ordinal_store::{InMemoryStore, Row};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let engine = OrderEngine::new(Arc::new(InMemoryStore::new()));
//! engine.prepare().unwrap();
//!
//! for title in ["Caves", "Glacier", "Lagoon"] {
//!     let mut row = Row::new();
//!     row.insert("title".into(), json!(title));
//!     engine.append(Collection::Excursions, row).unwrap();
//! }
//!
//! let excursions = engine.client(Collection::Excursions);
//! let lagoon = excursions.get_ordered_items::<serde_json::Value>().unwrap()[2]["id"]
//!     .as_str()
//!     .unwrap()
//!     .to_string();
//!
//! let result = excursions.swap_position(&lagoon, 1);
//! assert!(result.success);
//! assert!(excursions.validate_no_duplicates().unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod collection;
mod config;
mod engine;
mod entity;
mod error;
mod position;
mod report;
mod stats;

pub use client::CollectionClient;
pub use collection::{Collection, CollectionDescriptor};
pub use config::EngineConfig;
pub use engine::OrderEngine;
pub use entity::OrderedEntity;
pub use error::{CoreError, CoreResult};
pub use position::Position;
pub use report::{BatchOutcome, MoveOutcome, MoveRequest, OrderResult};
pub use stats::{DuplicateGroup, EngineStats, EngineStatsSnapshot, OrderStats};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
