use std::time::Duration;

pub mod database;
pub mod error;
pub mod memory;
pub mod schema;

pub use database::SqliteTransientStore;
pub use error::StorageError;
pub use memory::MemoryTransientStore;

pub const TRANSIENT_DB_FILENAME: &str = "transients.db";

/// Key-value store whose entries may carry an expiry.
///
/// An entry past its expiry is indistinguishable from a missing one. Writes
/// replace the value and the expiry together.
pub trait TransientStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`. `None` ttl means the entry never expires.
    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError>;

    /// Returns whether a live entry was removed.
    fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// Drops every expired entry, returning how many were removed.
    fn purge_expired(&self) -> Result<usize, StorageError>;
}

pub(crate) fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}
