use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum OriginsError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("origins cache is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("duplicate origin id {0}")]
    DuplicateOrigin(String),
}
