use rusqlite::{params, Connection, OptionalExtension};

use crate::db::port::{PersistencePort, StoreError};

// ─── Key/value repo ──────────────────────────────────────────────────────────

pub struct KvRepo;

impl KvRepo {
    pub fn get(conn: &Connection, key: &str) -> rusqlite::Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(conn: &Connection, key: &str) -> rusqlite::Result<()> {
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ─── SQLite-backed persistence port ──────────────────────────────────────────

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap a connection whose migrations have already run.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl PersistencePort for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(KvRepo::get(&self.conn, key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(KvRepo::set(&self.conn, key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Ok(KvRepo::remove(&self.conn, key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn store() -> SqliteStore {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        SqliteStore::new(conn)
    }

    #[test]
    fn set_overwrites_existing_value() {
        let store = store();
        assert!(store.get("gold").unwrap().is_none());

        store.set("gold", "10").unwrap();
        store.set("gold", "25").unwrap();
        assert_eq!(store.get("gold").unwrap().as_deref(), Some("25"));
    }

    #[test]
    fn remove_deletes_the_row() {
        let store = store();
        store.set("daily_buff", "{}").unwrap();
        store.remove("daily_buff").unwrap();
        assert!(store.get("daily_buff").unwrap().is_none());

        // removing an absent key is fine
        store.remove("daily_buff").unwrap();
    }

    #[test]
    fn values_survive_reopening_the_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("habitquest.db");

        {
            let conn = Connection::open(&path).unwrap();
            run_migrations(&conn).unwrap();
            SqliteStore::new(conn).set("habits", "[]").unwrap();
        }

        let conn = Connection::open(&path).unwrap();
        run_migrations(&conn).unwrap();
        let store = SqliteStore::new(conn);
        assert_eq!(store.get("habits").unwrap().as_deref(), Some("[]"));
    }
}
