use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use crate::clock::Clock;

use super::error::StorageError;
use super::schema::init_database;
use super::{ttl_millis, TransientStore, TRANSIENT_DB_FILENAME};

/// Transient store persisted in a single SQLite file under the data dir.
pub struct SqliteTransientStore {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteTransientStore {
    pub fn new(data_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join(TRANSIENT_DB_FILENAME);
        let conn = Connection::open(&db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        init_database(&conn)?;

        debug!(path = %db_path.display(), "opened transient store");

        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::ConnectionPoisoned)
    }

    fn now_millis(&self) -> i64 {
        self.clock.now().timestamp_millis()
    }
}

impl TransientStore for SqliteTransientStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn()?;
        let now = self.now_millis();

        let row = conn
            .query_row(
                r#"
                SELECT value, expires_at
                FROM transients
                WHERE key = ?1
                "#,
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<i64>>(1)?)),
            )
            .optional()?;

        match row {
            Some((value, expires_at)) if expires_at.map_or(true, |at| at > now) => Ok(Some(value)),
            Some(_) => {
                conn.execute(
                    "DELETE FROM transients WHERE key = ?1 AND expires_at <= ?2",
                    params![key, now],
                )?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let conn = self.conn()?;
        let now = self.clock.now();
        let expires_at = ttl.map(|ttl| now.timestamp_millis().saturating_add(ttl_millis(ttl)));

        conn.execute(
            r#"
            INSERT INTO transients (key, value, expires_at, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at
            "#,
            params![key, value, expires_at, now.to_rfc3339()],
        )?;

        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let removed = conn.execute(
            r#"
            DELETE FROM transients
            WHERE key = ?1 AND (expires_at IS NULL OR expires_at > ?2)
            "#,
            params![key, self.now_millis()],
        )?;
        // Whatever is left under the key is already dead.
        conn.execute("DELETE FROM transients WHERE key = ?1", params![key])?;
        Ok(removed > 0)
    }

    fn purge_expired(&self) -> Result<usize, StorageError> {
        let conn = self.conn()?;
        let purged = conn.execute(
            "DELETE FROM transients WHERE expires_at IS NOT NULL AND expires_at <= ?1",
            params![self.now_millis()],
        )?;
        Ok(purged)
    }
}
