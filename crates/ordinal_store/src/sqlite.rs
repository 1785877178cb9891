//! SQLite-backed position store.

use crate::backend::PositionStore;
use crate::clock::CreationClock;
use crate::error::{StoreError, StoreResult};
use crate::plan::{self, SwapOutcome};
use crate::row::{validate_identifier, Row, Slot, CREATED_AT_COLUMN};
use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Column holding business attributes as a JSON object.
pub const ATTRIBUTES_COLUMN: &str = "attributes";

/// Configuration for opening a SQLite store.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// How long a procedure waits for a competing writer before failing.
    pub busy_timeout: Duration,

    /// Whether to switch file databases to WAL journaling.
    pub wal_journal: bool,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            busy_timeout: Duration::from_secs(5),
            wal_journal: true,
        }
    }
}

impl SqliteConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the busy timeout.
    #[must_use]
    pub const fn busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether to use WAL journaling.
    #[must_use]
    pub const fn wal_journal(mut self, value: bool) -> Self {
        self.wal_journal = value;
        self
    }
}

/// A position store backed by one SQLite connection.
///
/// Every procedure runs in an `IMMEDIATE` transaction, so two processes
/// sharing the file serialize their writes and each procedure re-reads the
/// table after acquiring the write lock. Table and column names are checked
/// with [`validate_identifier`] before they reach SQL text.
///
/// Tables created by [`PositionStore::ensure_table`] have the shape
/// `(<id> TEXT PRIMARY KEY, <position> INTEGER, created_at INTEGER,
/// attributes TEXT)`. Row keys that are not physical columns are folded into
/// the `attributes` JSON object on insert and unfolded on read.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    clock: CreationClock,
}

impl SqliteStore {
    /// Opens or creates a store at `path` with default configuration.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_config(path, SqliteConfig::default())
    }

    /// Opens or creates a store at `path`.
    pub fn open_with_config(path: impl AsRef<Path>, config: SqliteConfig) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        if config.wal_journal {
            let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
            debug!(path = ?path.as_ref(), mode = %mode, "opened sqlite store");
        }
        Self::from_connection(conn, &config)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?, &SqliteConfig::default())
    }

    fn from_connection(conn: Connection, config: &SqliteConfig) -> StoreResult<Self> {
        conn.busy_timeout(config.busy_timeout)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock: CreationClock::new(),
        })
    }

    /// Runs `f` inside one immediate transaction.
    ///
    /// The transaction rolls back when `f` fails.
    fn atomic<T>(&self, f: impl FnOnce(&Transaction<'_>) -> StoreResult<T>) -> StoreResult<T> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish_non_exhaustive()
    }
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    Ok(conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?
        .is_some())
}

/// Returns `(name, is_primary_key)` for every column of `table`.
fn columns_of(conn: &Connection, table: &str) -> StoreResult<Vec<(String, bool)>> {
    validate_identifier(table)?;
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| Ok((row.get::<_, String>(1)?, row.get::<_, i64>(5)? > 0)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

fn primary_key_of(conn: &Connection, table: &str) -> StoreResult<String> {
    columns_of(conn, table)?
        .into_iter()
        .find_map(|(name, pk)| pk.then_some(name))
        .ok_or_else(|| StoreError::corrupted(table, "table has no primary key column"))
}

fn read_slots(
    conn: &Connection,
    table: &str,
    id_column: &str,
    order_column: &str,
) -> StoreResult<Vec<Slot>> {
    validate_identifier(table)?;
    validate_identifier(id_column)?;
    validate_identifier(order_column)?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {id_column}, {order_column}, {CREATED_AT_COLUMN} FROM {table}"
    ))?;
    let slots = stmt
        .query_map([], |row| {
            Ok(Slot {
                id: row.get(0)?,
                position: row.get(1)?,
                created_at: row.get::<_, Option<i64>>(2)?.unwrap_or(0),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(slots)
}

fn write_positions<'a>(
    tx: &Transaction<'_>,
    table: &str,
    id_column: &str,
    order_column: &str,
    writes: impl IntoIterator<Item = (&'a str, i64)>,
) -> StoreResult<usize> {
    let mut stmt = tx.prepare(&format!(
        "UPDATE {table} SET {order_column} = ?1 WHERE {id_column} = ?2"
    ))?;
    let mut written = 0;
    for (id, position) in writes {
        written += stmt.execute(params![position, id])?;
    }
    Ok(written)
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or(0.0)),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => Value::from(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
    }
}

fn renumber(tx: &Transaction<'_>, table: &str, id_column: &str, order_column: &str) -> StoreResult<usize> {
    if !table_exists(tx, table)? {
        return Ok(0);
    }
    let slots = read_slots(tx, table, id_column, order_column)?;
    let plan = plan::plan_compaction(&slots);
    write_positions(
        tx,
        table,
        id_column,
        order_column,
        plan.iter().map(|(id, position)| (id.as_str(), *position)),
    )?;
    Ok(plan.len())
}

impl PositionStore for SqliteStore {
    fn ensure_table(&self, table: &str, id_column: &str, order_column: &str) -> StoreResult<()> {
        validate_identifier(table)?;
        validate_identifier(id_column)?;
        validate_identifier(order_column)?;
        self.atomic(|tx| {
            tx.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    {id_column} TEXT PRIMARY KEY NOT NULL,
                    {order_column} INTEGER NOT NULL,
                    {CREATED_AT_COLUMN} INTEGER NOT NULL,
                    {ATTRIBUTES_COLUMN} TEXT NOT NULL DEFAULT '{{}}'
                );
                CREATE INDEX IF NOT EXISTS {table}_{order_column}_idx
                    ON {table} ({order_column}, {CREATED_AT_COLUMN});"
            ))?;
            let newest: Option<i64> = tx.query_row(
                &format!("SELECT MAX({CREATED_AT_COLUMN}) FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            if let Some(newest) = newest {
                self.clock.observe(newest);
            }
            Ok(())
        })
    }

    fn list(&self, table: &str) -> StoreResult<Vec<Row>> {
        validate_identifier(table)?;
        let conn = self.conn.lock();
        if !table_exists(&conn, table)? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare(&format!("SELECT * FROM {table} ORDER BY rowid"))?;
        let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.query([])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            let mut attributes = None;
            for (index, name) in names.iter().enumerate() {
                let value = from_sql(row.get_ref(index)?);
                if name == ATTRIBUTES_COLUMN {
                    attributes = Some(value);
                } else {
                    record.insert(name.clone(), value);
                }
            }
            if let Some(Value::String(text)) = attributes {
                let parsed: Row = serde_json::from_str(&text)?;
                for (key, value) in parsed {
                    record.entry(key).or_insert(value);
                }
            }
            out.push(record);
        }
        Ok(out)
    }

    fn count(&self, table: &str) -> StoreResult<u64> {
        validate_identifier(table)?;
        let conn = self.conn.lock();
        if !table_exists(&conn, table)? {
            return Ok(0);
        }
        let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
            row.get(0)
        })?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn insert(&self, table: &str, id_column: &str, mut row: Row) -> StoreResult<String> {
        validate_identifier(id_column)?;
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

        self.atomic(|tx| {
            let physical: Vec<String> = columns_of(tx, table)?
                .into_iter()
                .map(|(name, _)| name)
                .collect();
            if physical.is_empty() {
                return Err(StoreError::Constraint(format!("table {table} does not exist")));
            }

            let mut names = Vec::new();
            let mut values = Vec::new();
            let mut attributes = Row::new();
            for (key, value) in &row {
                if key != ATTRIBUTES_COLUMN && physical.iter().any(|c| c == key) {
                    names.push(key.as_str());
                    values.push(to_sql(value));
                } else {
                    attributes.insert(key.clone(), value.clone());
                }
            }
            if physical.iter().any(|c| c == ATTRIBUTES_COLUMN) {
                names.push(ATTRIBUTES_COLUMN);
                values.push(SqlValue::Text(serde_json::to_string(&attributes)?));
            }

            let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{i}")).collect();
            let sql = format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            );
            match tx.execute(&sql, rusqlite::params_from_iter(values.iter())) {
                Ok(_) => Ok(id.clone()),
                Err(rusqlite::Error::SqliteFailure(err, message))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::Constraint(
                        message.unwrap_or_else(|| format!("duplicate id {id} in table {table}")),
                    ))
                }
                Err(e) => Err(StoreError::Sqlite(e)),
            }
        })
    }

    fn delete(&self, table: &str, id_column: &str, id: &str) -> StoreResult<bool> {
        validate_identifier(table)?;
        validate_identifier(id_column)?;
        self.atomic(|tx| {
            if !table_exists(tx, table)? {
                return Ok(false);
            }
            let removed = tx.execute(
                &format!("DELETE FROM {table} WHERE {id_column} = ?1"),
                params![id],
            )?;
            Ok(removed > 0)
        })
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
        self.atomic(|tx| {
            if !table_exists(tx, table)? {
                return Err(StoreError::row_not_found(table, id));
            }
            let slots = read_slots(tx, table, id_column, order_column)?;
            let outcome = plan::plan_swap(table, &slots, id, new_position)?;
            write_positions(tx, table, id_column, order_column, outcome.writes())?;
            Ok(outcome)
        })
    }

    fn compact_order_positions(&self, table: &str, column: &str) -> StoreResult<usize> {
        validate_identifier(table)?;
        self.atomic(|tx| {
            if !table_exists(tx, table)? {
                return Ok(0);
            }
            let id_column = primary_key_of(tx, table)?;
            renumber(tx, table, &id_column, column)
        })
    }

    fn reorder_positions(
        &self,
        table: &str,
        id_column: &str,
        order_column: &str,
    ) -> StoreResult<usize> {
        validate_identifier(table)?;
        self.atomic(|tx| renumber(tx, table, id_column, order_column))
    }
}
