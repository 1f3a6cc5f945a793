use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::clock::Clock;

use super::error::StorageError;
use super::{ttl_millis, TransientStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Process-local transient store. Nothing survives a restart.
pub struct MemoryTransientStore {
    entries: Arc<DashMap<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryTransientStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TransientStore for MemoryTransientStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let now = self.clock.now();
        if let Some(entry) = self.entries.get(key) {
            if entry.is_live(now) {
                return Ok(Some(entry.value.clone()));
            }
        }
        self.entries.remove_if(key, |_, entry| !entry.is_live(now));
        Ok(None)
    }

    fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), StorageError> {
        let expires_at = match ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::milliseconds(ttl_millis(ttl));
                let at = self
                    .clock
                    .now()
                    .checked_add_signed(ttl)
                    .ok_or_else(|| StorageError::InvalidValue(format!("ttl out of range for {key}")))?;
                Some(at)
            }
            None => None,
        };

        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        let now = self.clock.now();
        Ok(self
            .entries
            .remove(key)
            .map_or(false, |(_, entry)| entry.is_live(now)))
    }

    fn purge_expired(&self) -> Result<usize, StorageError> {
        let now = self.clock.now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now));
        Ok(before.saturating_sub(self.entries.len()))
    }
}
