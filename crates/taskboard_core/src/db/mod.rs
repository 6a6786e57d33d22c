//! SQLite backing for the snapshot key-value medium.
//!
//! The database holds a single `kv_store(key, value, updated_at)` table;
//! the whole board state lives as one JSON text value under a fixed key.
//!
//! # Responsibility
//! - Open connections configured for a single-writer desktop app.
//! - Bring the `kv_store` schema up to date before first use.
//!
//! # Invariants
//! - Schema version is mirrored in `PRAGMA user_version`.
//! - A file written by a newer build is refused, never downgraded.
//! - No snapshot blob is read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or prepare the key-value medium.
#[derive(Debug)]
pub enum DbError {
    /// Driver error while opening, configuring or migrating.
    Sqlite(rusqlite::Error),
    /// The file carries a `kv_store` schema newer than this build knows.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Connection was handed over without `kv_store`; it must come from
    /// [`open_db`] or [`open_db_in_memory`].
    MissingTable(&'static str),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "kv_store schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::MissingTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
