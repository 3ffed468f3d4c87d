//! SQLite-backed persistence
//!
//! Each aggregate is one row of a key/value table. `save_all` writes every
//! row inside a single transaction, so a crash can lose the latest command but
//! never leave the collections out of step with each other.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use wayfarer_domain::traits::{PersistenceBackend, StorageKey};

const UPSERT: &str = "INSERT INTO place_data (key, value, updated_at) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// SQLite implementation of [`PersistenceBackend`]
///
/// # Thread Safety
///
/// SQLite connections are not shared between threads. Move the backend into
/// the one task that owns the store.
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use wayfarer_store::SqliteBackend;
    ///
    /// let backend = SqliteBackend::open("wayfarer.db").unwrap();
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn })
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        Self::open(":memory:")
    }
}

impl PersistenceBackend for SqliteBackend {
    type Error = rusqlite::Error;

    fn load(&self, key: StorageKey) -> Result<Option<String>, Self::Error> {
        self.conn
            .query_row(
                "SELECT value FROM place_data WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
    }

    fn save(&mut self, key: StorageKey, value: &str) -> Result<(), Self::Error> {
        self.conn
            .execute(UPSERT, params![key.as_str(), value, Utc::now().to_rfc3339()])?;
        Ok(())
    }

    fn save_all(&mut self, entries: &[(StorageKey, String)]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        for (key, value) in entries {
            tx.execute(UPSERT, params![key.as_str(), value, now])?;
        }
        tx.commit()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.conn.execute("DELETE FROM place_data", [])?;
        Ok(())
    }
}
