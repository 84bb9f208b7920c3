//! Key/value local storage operations.

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{Database, DbError, DbResult};

/// Bytes used against the quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageUsage {
    pub used: u64,
    pub available: u64,
}

impl Database {
    /// Get the raw value stored under a key.
    pub fn get_item(&self, key: &str) -> DbResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Store a value, replacing any previous one. Fails when the write would
    /// exceed the quota; the previous value is left in place.
    pub fn set_item(&self, key: &str, value: &str) -> DbResult<()> {
        let existing: u64 = self
            .conn
            .query_row(
                "SELECT LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))
                 FROM local_storage WHERE key = ?",
                [key],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .unwrap_or(0) as u64;

        let needed = self.usage_bytes()? - existing + (key.len() + value.len()) as u64;
        if needed > self.quota_bytes {
            return Err(DbError::QuotaExceeded {
                needed,
                quota: self.quota_bytes,
            });
        }

        self.conn.execute(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key. Returns whether it existed.
    pub fn remove_item(&self, key: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?", [key])?;
        Ok(rows_affected > 0)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM local_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Total key + value bytes currently stored.
    pub fn usage_bytes(&self) -> DbResult<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM local_storage",
            [],
            |row| row.get(0),
        )?;
        Ok(used as u64)
    }

    /// Usage against the quota.
    pub fn storage_usage(&self) -> DbResult<StorageUsage> {
        Ok(StorageUsage {
            used: self.usage_bytes()?,
            available: self.quota_bytes,
        })
    }

    /// Read and decode a JSON value.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get_item(key)? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Encode and store a JSON value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let text = serde_json::to_string(value)?;
        self.set_item(key, &text)
    }

    /// Run several storage calls as one unit; nothing is written if any fails.
    pub fn atomically<T>(&self, f: impl FnOnce(&Self) -> DbResult<T>) -> DbResult<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }
}
