//! Database layer for carepoint.
//!
//! SQLite stands in for browser local storage: a flat key/value table for
//! entity lists plus the tables backing the page asset cache.

mod schema;
mod storage;
mod asset_cache;

pub use schema::*;
pub use storage::*;
pub use asset_cache::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Default storage allowance (5 MiB), the usual browser local-storage quota.
pub const DEFAULT_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage quota exceeded: need {needed} bytes, quota is {quota}")]
    QuotaExceeded { needed: u64, quota: u64 },

    #[error("Record not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
    quota_bytes: u64,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn,
            quota_bytes: DEFAULT_QUOTA_BYTES,
        };
        db.initialize()?;
        Ok(db)
    }

    /// Set the local-storage quota.
    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}
