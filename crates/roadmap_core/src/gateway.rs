//! Key/value blob persistence.
//!
//! # Responsibility
//! - Define the only storage contract the core depends on.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Blobs are opaque text; encoding is owned by the caller.
//! - `set` replaces any previous value under the same key.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::rc::Rc;

/// Errors raised by a gateway backend.
#[derive(Debug)]
pub enum GatewayError {
    /// SQLite transport or bootstrap failure.
    Db(DbError),
    /// Backend refused the operation for a non-database reason.
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous key/value blob store.
pub trait PersistenceGateway {
    /// Returns the blob stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError>;
    /// Stores `blob` under `key`.
    fn set(&self, key: &str, blob: &str) -> Result<(), GatewayError>;
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for &G {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), GatewayError> {
        (**self).set(key, blob)
    }
}

impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Rc<G> {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), GatewayError> {
        (**self).set(key, blob)
    }
}

/// Process-local gateway; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds one entry, e.g. a blob left by an earlier session.
    pub fn with_entry(self, key: impl Into<String>, blob: impl Into<String>) -> Self {
        self.entries.borrow_mut().insert(key.into(), blob.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl PersistenceGateway for MemoryGateway {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), GatewayError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }
}

/// Gateway backed by the `kv_store` table of a migrated SQLite connection.
pub struct SqliteGateway {
    conn: Connection,
}

impl SqliteGateway {
    /// Opens (or creates) a database file.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(|conn| Self { conn })
    }

    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(|conn| Self { conn })
    }

    /// Wraps a connection already returned by `db::open_db*`.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl PersistenceGateway for SqliteGateway {
    fn get(&self, key: &str) -> Result<Option<String>, GatewayError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, blob: &str) -> Result<(), GatewayError> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, blob],
        )?;
        Ok(())
    }
}
