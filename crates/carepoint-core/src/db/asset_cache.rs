//! Asset cache partition and entry operations.

use rusqlite::{params, OptionalExtension, Row};
use sha2::{Digest, Sha256};

use super::{Database, DbResult};
use crate::cache::{AssetResponse, ResponseType};

/// A cached response as stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedEntry {
    pub partition: String,
    pub url: String,
    pub response: AssetResponse,
    /// SHA-256 of the body when it was stored
    pub digest: String,
}

impl CachedEntry {
    /// Whether the body still matches the digest recorded at store time.
    pub fn is_intact(&self) -> bool {
        body_digest(&self.response.body) == self.digest
    }
}

/// Hex SHA-256 of a response body.
pub fn body_digest(body: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(body);
    hex::encode(hasher.finalize())
}

impl Database {
    /// Create a partition if missing. Returns true when newly created.
    pub fn open_partition(&self, name: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            r#"
            INSERT OR IGNORE INTO cache_partitions (name, seq)
            VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM cache_partitions))
            "#,
            [name],
        )?;
        Ok(rows_affected > 0)
    }

    /// Partition names in creation order.
    pub fn partition_names(&self) -> DbResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM cache_partitions ORDER BY seq")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// Delete a partition and all its entries.
    pub fn delete_partition(&self, name: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM cache_partitions WHERE name = ?", [name])?;
        Ok(rows_affected > 0)
    }

    /// Store (or replace) a response in a partition, creating the partition if needed.
    pub fn put_cache_entry(&self, partition: &str, url: &str, response: &AssetResponse) -> DbResult<()> {
        self.open_partition(partition)?;
        let headers_json = serde_json::to_string(&response.headers)?;

        self.conn.execute(
            r#"
            INSERT INTO cache_entries (
                partition, url, status, response_type, headers, body, digest, stored_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))
            ON CONFLICT(partition, url) DO UPDATE SET
                status = excluded.status,
                response_type = excluded.response_type,
                headers = excluded.headers,
                body = excluded.body,
                digest = excluded.digest,
                stored_at = excluded.stored_at
            "#,
            params![
                partition,
                url,
                response.status,
                response.response_type.as_str(),
                headers_json,
                response.body,
                body_digest(&response.body),
            ],
        )?;
        Ok(())
    }

    /// Look a URL up across all partitions, oldest partition first.
    pub fn match_cache_entry(&self, url: &str) -> DbResult<Option<CachedEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT e.partition, e.url, e.status, e.response_type, e.headers, e.body, e.digest
                FROM cache_entries e
                JOIN cache_partitions p ON p.name = e.partition
                WHERE e.url = ?
                ORDER BY p.seq
                LIMIT 1
                "#,
                [url],
                entry_from_row,
            )
            .optional()?
            .map(EntryRow::into_entry)
            .transpose()
    }

    /// Look a URL up in one partition.
    pub fn match_in_partition(&self, partition: &str, url: &str) -> DbResult<Option<CachedEntry>> {
        self.conn
            .query_row(
                r#"
                SELECT partition, url, status, response_type, headers, body, digest
                FROM cache_entries
                WHERE partition = ?1 AND url = ?2
                "#,
                params![partition, url],
                entry_from_row,
            )
            .optional()?
            .map(EntryRow::into_entry)
            .transpose()
    }

    /// Remove one entry.
    pub fn delete_cache_entry(&self, partition: &str, url: &str) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "DELETE FROM cache_entries WHERE partition = ?1 AND url = ?2",
            params![partition, url],
        )?;
        Ok(rows_affected > 0)
    }

    /// Number of entries in a partition.
    pub fn partition_len(&self, partition: &str) -> DbResult<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM cache_entries WHERE partition = ?",
            [partition],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Raw row before JSON decoding.
struct EntryRow {
    partition: String,
    url: String,
    status: u16,
    response_type: String,
    headers: String,
    body: Vec<u8>,
    digest: String,
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<EntryRow> {
    Ok(EntryRow {
        partition: row.get(0)?,
        url: row.get(1)?,
        status: row.get(2)?,
        response_type: row.get(3)?,
        headers: row.get(4)?,
        body: row.get(5)?,
        digest: row.get(6)?,
    })
}

impl EntryRow {
    fn into_entry(self) -> DbResult<CachedEntry> {
        Ok(CachedEntry {
            partition: self.partition,
            url: self.url,
            response: AssetResponse {
                status: self.status,
                response_type: ResponseType::parse(&self.response_type),
                headers: serde_json::from_str(&self.headers)?,
                body: self.body,
            },
            digest: self.digest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn ok(body: &str) -> AssetResponse {
        AssetResponse::ok(body.as_bytes().to_vec())
    }

    #[test]
    fn test_partitions_in_creation_order() {
        let db = setup_db();
        assert!(db.open_partition("static-v2").unwrap());
        assert!(db.open_partition("dynamic-v2").unwrap());
        assert!(!db.open_partition("static-v2").unwrap());

        assert_eq!(db.partition_names().unwrap(), vec!["static-v2", "dynamic-v2"]);
    }

    #[test]
    fn test_put_and_match() {
        let db = setup_db();
        db.put_cache_entry("static-v2", "/index.html", &ok("<html>")).unwrap();

        let entry = db.match_cache_entry("/index.html").unwrap().unwrap();
        assert_eq!(entry.partition, "static-v2");
        assert_eq!(entry.response.body, b"<html>".to_vec());
        assert_eq!(entry.response.response_type, ResponseType::Basic);
        assert!(entry.is_intact());

        assert!(db.match_cache_entry("/missing.js").unwrap().is_none());
    }

    #[test]
    fn test_match_prefers_oldest_partition() {
        let db = setup_db();
        db.put_cache_entry("static-v2", "/app.js", &ok("old")).unwrap();
        db.put_cache_entry("dynamic-v2", "/app.js", &ok("new")).unwrap();

        let entry = db.match_cache_entry("/app.js").unwrap().unwrap();
        assert_eq!(entry.partition, "static-v2");

        let dynamic = db.match_in_partition("dynamic-v2", "/app.js").unwrap().unwrap();
        assert_eq!(dynamic.response.body, b"new".to_vec());
    }

    #[test]
    fn test_delete_partition_removes_entries() {
        let db = setup_db();
        db.put_cache_entry("static-v1", "/", &ok("a")).unwrap();
        db.put_cache_entry("static-v1", "/index.html", &ok("b")).unwrap();
        assert_eq!(db.partition_len("static-v1").unwrap(), 2);

        assert!(db.delete_partition("static-v1").unwrap());
        assert!(db.match_cache_entry("/").unwrap().is_none());
        assert_eq!(db.partition_len("static-v1").unwrap(), 0);
        assert!(db.partition_names().unwrap().is_empty());
    }

    #[test]
    fn test_tampered_body_detected() {
        let db = setup_db();
        db.put_cache_entry("static-v2", "/", &ok("original")).unwrap();
        db.conn()
            .execute("UPDATE cache_entries SET body = x'00' WHERE url = '/'", [])
            .unwrap();

        let entry = db.match_cache_entry("/").unwrap().unwrap();
        assert!(!entry.is_intact());
    }
}
