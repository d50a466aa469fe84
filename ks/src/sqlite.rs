//! SQLite backend - a single `kv` table

use std::fs;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::{debug, trace};

use crate::{KvResult, KvStore, now_ms, validate_key};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// SQLite-backed store
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`
    pub fn open(path: impl AsRef<Path>) -> KvResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        debug!(?path, "Opened sqlite store");
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> KvResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        trace!(key, "SqliteStore::get: called");
        validate_key(key)?;
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        trace!(key, bytes = value.len(), "SqliteStore::set: called");
        validate_key(key)?;
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now_ms()],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<()> {
        trace!(key, "SqliteStore::remove: called");
        validate_key(key)?;
        self.conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_upsert() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        let rows: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM kv WHERE updated_at > 0", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_missing_and_remove() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("absent").unwrap(), None);

        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_persists_across_connections() {
        let temp = TempDir::new().unwrap();
        let db = temp.path().join("data").join("tasklist.db");
        {
            let mut store = SqliteStore::open(&db).unwrap();
            store.set("k", r#"{"version":1}"#).unwrap();
        }
        let store = SqliteStore::open(&db).unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some(r#"{"version":1}"#));
    }
}
