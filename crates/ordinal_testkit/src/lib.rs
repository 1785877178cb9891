//! # Ordinal Testkit
//!
//! Test utilities for Ordinal.
//!
//! This crate provides:
//! - Engine fixtures over the in-memory and SQLite stores
//! - Property-based test generators using proptest
//! - A fault-injecting store wrapper
//! - Concurrent stress drivers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ordinal_testkit::prelude::*;
//!
//! #[test]
//! fn test_with_engine() {
//!     with_memory_engine(|engine| {
//!         let ids = scenarios::seed(engine, Collection::Places, 3);
//!         engine.move_to(Collection::Places, &ids[2], 1).unwrap();
//!     });
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
    pub use ordinal_core::{Collection, CoreError, MoveRequest, OrderEngine};
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
pub use stress::*;
