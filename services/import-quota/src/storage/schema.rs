use anyhow::Result;
use rusqlite::Connection;

pub const TRANSIENTS_TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS transients (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    expires_at INTEGER,
    updated_at TEXT NOT NULL
);
"#;

pub const TRANSIENTS_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_transients_expires_at ON transients(expires_at);
"#;

pub fn init_database(conn: &Connection) -> Result<()> {
    conn.execute_batch(TRANSIENTS_TABLE_SCHEMA)?;
    conn.execute_batch(TRANSIENTS_INDEXES)?;
    Ok(())
}
