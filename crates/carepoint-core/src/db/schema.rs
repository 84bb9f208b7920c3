//! SQLite schema definition.

/// Complete database schema for carepoint.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Local Storage (key -> JSON text)
-- ============================================================================

CREATE TABLE IF NOT EXISTS local_storage (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                         -- JSON array, or object for snapshots
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ============================================================================
-- Page Asset Cache
-- ============================================================================

CREATE TABLE IF NOT EXISTS cache_partitions (
    name TEXT PRIMARY KEY,                       -- e.g. static-v2, dynamic-v2
    seq INTEGER NOT NULL,                        -- creation order, searched in this order
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS cache_entries (
    partition TEXT NOT NULL REFERENCES cache_partitions(name) ON DELETE CASCADE,
    url TEXT NOT NULL,
    status INTEGER NOT NULL,
    response_type TEXT NOT NULL,                 -- basic, cors, opaque, error
    headers TEXT NOT NULL DEFAULT '[]',          -- JSON array of [name, value]
    body BLOB NOT NULL,
    digest TEXT NOT NULL,                        -- SHA-256 of body, hex
    stored_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (partition, url)
);

CREATE INDEX IF NOT EXISTS idx_cache_entries_url ON cache_entries(url);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_valid() {
        let conn = Connection::open_in_memory().unwrap();
        let result = conn.execute_batch(SCHEMA);
        assert!(result.is_ok(), "Schema should be valid SQL: {:?}", result);
    }

    #[test]
    fn test_schema_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        assert!(conn.execute_batch(SCHEMA).is_ok());
    }

    #[test]
    fn test_partition_delete_cascades() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        conn.execute(
            "INSERT INTO cache_partitions (name, seq) VALUES ('static-v1', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO cache_entries (partition, url, status, response_type, body, digest)
             VALUES ('static-v1', '/index.html', 200, 'basic', x'00', 'abc')",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM cache_partitions WHERE name = 'static-v1'", [])
            .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_entry_requires_partition() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        let result = conn.execute(
            "INSERT INTO cache_entries (partition, url, status, response_type, body, digest)
             VALUES ('missing', '/', 200, 'basic', x'00', 'abc')",
            [],
        );
        assert!(result.is_err());
    }
}
