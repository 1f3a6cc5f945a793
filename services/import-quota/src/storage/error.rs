use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("connection poisoned")]
    ConnectionPoisoned,
    #[error("invalid transient value: {0}")]
    InvalidValue(String),
}
