//! Test fixtures and engine helpers.
//!
//! Provides convenience functions for setting up engines over either
//! backend and seeding common ordering scenarios.

use ordinal_core::{Collection, OrderEngine};
use ordinal_store::{InMemoryStore, PositionStore, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Which backend a fixture runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// [`InMemoryStore`].
    Memory,
    /// [`SqliteStore`] on a temporary file.
    Sqlite,
}

impl Backend {
    /// Both backends, for tests that must hold on each.
    pub const ALL: [Backend; 2] = [Backend::Memory, Backend::Sqlite];
}

/// A prepared engine with automatic cleanup.
pub struct TestEngine {
    /// The engine instance.
    pub engine: OrderEngine,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestEngine {
    /// Creates an engine over a fresh in-memory store.
    pub fn memory() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()), None)
    }

    /// Creates an engine over a SQLite file in a temporary directory.
    pub fn sqlite() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SqliteStore::open(temp_dir.path().join("test.db"))
            .expect("Failed to open SQLite store");
        Self::with_store(Arc::new(store), Some(temp_dir))
    }

    /// Creates an engine on `backend`.
    pub fn on(backend: Backend) -> Self {
        match backend {
            Backend::Memory => Self::memory(),
            Backend::Sqlite => Self::sqlite(),
        }
    }

    /// Creates an engine over a caller-supplied store.
    pub fn with_store(store: Arc<dyn PositionStore>, temp_dir: Option<TempDir>) -> Self {
        let engine = OrderEngine::new(store);
        engine.prepare().expect("Failed to prepare tables");
        Self {
            engine,
            _temp_dir: temp_dir,
        }
    }

    /// Returns the database path if file-based, None if in-memory.
    pub fn path(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join("test.db"))
    }
}

impl std::ops::Deref for TestEngine {
    type Target = OrderEngine;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}

/// Runs a test with an engine over a fresh in-memory store.
///
/// # Example
///
/// ```rust
/// use ordinal_core::Collection;
/// use ordinal_testkit::with_memory_engine;
///
/// with_memory_engine(|engine| {
///     assert_eq!(engine.next_position(Collection::Places).unwrap(), 1);
/// });
/// ```
pub fn with_memory_engine<F, R>(f: F) -> R
where
    F: FnOnce(&OrderEngine) -> R,
{
    let test_engine = TestEngine::memory();
    f(&test_engine.engine)
}

/// Runs a test with an engine over a temporary SQLite file.
pub fn with_sqlite_engine<F, R>(f: F) -> R
where
    F: FnOnce(&OrderEngine) -> R,
{
    let test_engine = TestEngine::sqlite();
    f(&test_engine.engine)
}

/// Runs a test once on every backend.
pub fn on_each_backend<F>(mut f: F)
where
    F: FnMut(Backend, &OrderEngine),
{
    for backend in Backend::ALL {
        let test_engine = TestEngine::on(backend);
        f(backend, &test_engine.engine);
    }
}

/// Returns `(id, position)` pairs of `collection` in display order.
pub fn positions(engine: &OrderEngine, collection: Collection) -> Vec<(String, i64)> {
    engine
        .get_ordered_entities(collection)
        .expect("Failed to read collection")
        .into_iter()
        .map(|e| (e.id, e.position))
        .collect()
}

/// Returns the position of `id`.
pub fn position_of(engine: &OrderEngine, collection: Collection, id: &str) -> Option<i64> {
    positions(engine, collection)
        .into_iter()
        .find(|(row, _)| row == id)
        .map(|(_, position)| position)
}

/// Builds an expected `(id, position)` list from literals.
pub fn expected(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
    pairs
        .iter()
        .map(|(id, position)| (id.to_string(), *position))
        .collect()
}

/// Scenario helpers.
pub mod scenarios {
    use super::*;
    use ordinal_store::Row;
    use serde_json::json;

    /// Appends `count` rows to `collection` and returns their ids in order.
    pub fn seed(engine: &OrderEngine, collection: Collection, count: usize) -> Vec<String> {
        (0..count)
            .map(|i| {
                let mut row = Row::new();
                row.insert("label".into(), json!(format!("row {i}")));
                engine.append(collection, row).expect("Failed to append row")
            })
            .collect()
    }

    /// Inserts rows with fixed ids and positions, bypassing the engine.
    ///
    /// Positions are written as given, so this can build gapped or
    /// duplicated states. Rows are created in slice order.
    pub fn seed_exact(engine: &OrderEngine, collection: Collection, rows: &[(&str, i64)]) {
        let d = collection.descriptor();
        for (id, position) in rows {
            let mut row = Row::new();
            row.insert(d.id_field.into(), json!(id));
            row.insert(d.position_field.into(), json!(position));
            engine
                .store()
                .insert(d.table, d.id_field, row)
                .expect("Failed to insert row");
        }
    }
}
