use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use super::{KeyValueStore, StoreError};

/// SQLite-backed key-value table
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and create the table if needed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS session_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
            [],
        )?;
        Ok(SqliteStore { conn })
    }
}

impl KeyValueStore for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM session_state WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            r#"
            INSERT INTO session_state (key, value) VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM session_state WHERE key = ?1", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn upsert_overwrites_value() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save("k", "first").unwrap();
        store.save("k", "second").unwrap();
        assert_eq!(store.load("k").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn remove_then_load_is_none() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.save("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.load("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.db");
        {
            let mut store = SqliteStore::open(&path).unwrap();
            store.save("charades_game_state", "{}").unwrap();
        }
        let store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.load("charades_game_state").unwrap().as_deref(),
            Some("{}")
        );
    }
}
