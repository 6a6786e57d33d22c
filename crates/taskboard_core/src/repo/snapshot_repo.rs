//! Raw snapshot storage media.
//!
//! # Responsibility
//! - Define the key-value medium contract the persistence gateway talks to.
//! - Provide SQLite, JSON-file and in-memory implementations.
//!
//! # Invariants
//! - Media store opaque JSON text; they never interpret it.
//! - A write is atomic from the caller's view: readers observe either the
//!   previous or the new value, never a partial one.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Key under which the snapshot JSON lives in the key-value table.
pub const SNAPSHOT_STORAGE_KEY: &str = "trello_clone_data_v1";

const KV_TABLE: &str = "kv_store";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage medium failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Io(std::io::Error),
    /// Snapshot could not be encoded as JSON.
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "snapshot file i/o failed: {err}"),
            Self::Encode(err) => write!(f, "snapshot encoding failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Raw key-value medium holding one serialized snapshot.
pub trait SnapshotStore {
    /// Short medium name used in log events.
    fn kind(&self) -> &'static str;
    /// Returns the stored JSON text, or `None` when nothing was stored yet.
    fn read_raw(&self) -> StoreResult<Option<String>>;
    /// Replaces the stored JSON text.
    fn write_raw(&self, raw: &str) -> StoreResult<()>;
}

/// SQLite-backed medium using the `kv_store` table.
pub struct SqliteSnapshotStore {
    conn: Connection,
    key: String,
}

impl SqliteSnapshotStore {
    /// Opens (and migrates) a database file.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `DbError::MissingTable` when the connection skipped migrations.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [KV_TABLE],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(DbError::MissingTable(KV_TABLE).into());
        }
        Ok(Self {
            conn,
            key: SNAPSHOT_STORAGE_KEY.to_string(),
        })
    }

    /// Uses a different storage key, e.g. to keep several stores in one
    /// database.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn read_raw(&self) -> StoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_raw(&self, raw: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), raw],
        )?;
        Ok(())
    }
}

/// Plain JSON file medium.
///
/// Writes go to a sibling temp file which is fsynced and renamed over the
/// target.
pub struct JsonFileSnapshotStore {
    path: PathBuf,
}

impl JsonFileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileSnapshotStore {
    fn kind(&self) -> &'static str {
        "json_file"
    }

    fn read_raw(&self) -> StoreResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_raw(&self, raw: &str) -> StoreResult<()> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(raw.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

/// Volatile medium for tests and previews.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    value: RefCell<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(raw.into())),
        }
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn kind(&self) -> &'static str {
        "memory"
    }

    fn read_raw(&self) -> StoreResult<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn write_raw(&self, raw: &str) -> StoreResult<()> {
        *self.value.borrow_mut() = Some(raw.to_string());
        Ok(())
    }
}
