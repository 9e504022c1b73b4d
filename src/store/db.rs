//! SQLite ledger store and schema management
//!
//! Manages the `~/.questlog/ledger.db` database. Ledger documents carry their
//! own version and are upgraded on load (see `record`), so the table layout
//! itself has a single version.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::record::{decode, encode};
use super::{LedgerMutation, LedgerStore, SessionStore};
use crate::domain::Ledger;
use crate::progress::{ProgressResult, StoreError};

/// Ledger store backed by a single SQLite connection
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create the ledger database at a specific path
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        // Wait for other writers instead of failing immediately
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        Self::from_connection(conn)
    }

    /// Database that lives only as long as this store
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(())
    }

    fn write(conn: &Connection, identity: &str, ledger: &Ledger) -> Result<(), StoreError> {
        let record = encode(ledger)?;
        let now = Utc::now().timestamp_millis();
        conn.execute(
            r#"
            INSERT INTO users (email, username, username_key, xp, record, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            ON CONFLICT(email) DO UPDATE SET
                username = ?2, username_key = ?3, xp = ?4, record = ?5, updated_at = ?6
            "#,
            params![
                identity,
                ledger.username,
                ledger.username.to_lowercase(),
                ledger.xp as i64,
                record,
                now,
            ],
        )?;
        Ok(())
    }

    fn read(conn: &Connection, identity: &str) -> Result<Option<Ledger>, StoreError> {
        let record: Option<String> = conn
            .query_row(
                "SELECT record FROM users WHERE email = ?1",
                params![identity],
                |r| r.get(0),
            )
            .optional()?;

        record.map(|json| decode(identity, &json)).transpose()
    }

    /// Number of registered identities
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(count as usize)
    }
}

impl LedgerStore for SqliteStore {
    fn get(&self, identity: &str) -> Result<Option<Ledger>, StoreError> {
        let conn = self.conn()?;
        Self::read(&conn, identity)
    }

    fn put(&self, identity: &str, ledger: &Ledger) -> Result<(), StoreError> {
        let conn = self.conn()?;
        Self::write(&conn, identity, ledger)
    }

    fn insert_new(&self, identity: &str, ledger: &Ledger) -> Result<bool, StoreError> {
        let record = encode(ledger)?;
        let now = Utc::now().timestamp_millis();
        let conn = self.conn()?;
        let inserted = conn.execute(
            r#"
            INSERT OR IGNORE INTO users (email, username, username_key, xp, record, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
            "#,
            params![
                identity,
                ledger.username,
                ledger.username.to_lowercase(),
                ledger.xp as i64,
                record,
                now,
            ],
        )?;
        Ok(inserted == 1)
    }

    fn list_all(&self) -> Result<Vec<Ledger>, StoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT email, record FROM users ORDER BY rowid")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        rows.iter()
            .map(|(email, json)| decode(email, json))
            .collect()
    }

    fn update(&self, identity: &str, mutate: LedgerMutation<'_>) -> ProgressResult<Option<Ledger>> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;

        let Some(mut ledger) = Self::read(&tx, identity)? else {
            return Ok(None);
        };

        // Dropping the transaction on error rolls it back
        mutate(&mut ledger)?;
        Self::write(&tx, identity, &ledger)?;
        tx.commit().map_err(StoreError::from)?;

        Ok(Some(ledger))
    }
}

impl SessionStore for SqliteStore {
    fn active_identity(&self) -> Result<Option<String>, StoreError> {
        let conn = self.conn()?;
        let active: Option<String> =
            conn.query_row("SELECT active_email FROM session WHERE id = 1", [], |r| r.get(0))?;
        Ok(active)
    }

    fn set_active_identity(&self, identity: Option<&str>) -> Result<(), StoreError> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE session SET active_email = ?1, updated_at = ?2 WHERE id = 1",
            params![identity, Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}

/// SQL schema for the ledger database
const SCHEMA_SQL: &str = r#"
-- One row per identity; `record` holds the full ledger document
-- `username_key` is the lowercased username for case-insensitive lookups
CREATE TABLE IF NOT EXISTS users (
    email TEXT PRIMARY KEY,
    username TEXT NOT NULL,
    username_key TEXT NOT NULL,
    xp INTEGER NOT NULL DEFAULT 0,
    record TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_users_xp ON users(xp);
CREATE INDEX IF NOT EXISTS idx_users_username_key ON users(username_key);

-- Signed-in identity (singleton)
CREATE TABLE IF NOT EXISTS session (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    active_email TEXT,
    updated_at INTEGER
);
INSERT OR IGNORE INTO session (id) VALUES (1);
"#;
