use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::ImportQuotaConfig;
use crate::storage::TransientStore;

use super::error::OriginsError;
use super::{Origin, OriginLimits, LICENSE_KEY_OPTION};

/// Origins list cached in the transient store under `{cache_group}_origins`.
#[derive(Clone)]
pub struct OriginRegistry {
    store: Arc<dyn TransientStore>,
    cache_group: String,
    cache_ttl: Duration,
}

impl OriginRegistry {
    pub fn new(store: Arc<dyn TransientStore>, config: &ImportQuotaConfig) -> Self {
        Self {
            store,
            cache_group: config.origins_cache_group.clone(),
            cache_ttl: Duration::from_secs(config.origins_cache_ttl_secs),
        }
    }

    pub fn cache_key(&self) -> String {
        format!("{}_origins", self.cache_group)
    }

    pub fn list(&self) -> Result<Vec<Origin>, OriginsError> {
        match self.store.get(&self.cache_key())? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn get(&self, origin_id: &str) -> Result<Option<Origin>, OriginsError> {
        Ok(self.list()?.into_iter().find(|origin| origin.id == origin_id))
    }

    pub fn replace(&self, origins: &[Origin]) -> Result<(), OriginsError> {
        let mut seen = HashSet::new();
        for origin in origins {
            if !seen.insert(origin.id.as_str()) {
                return Err(OriginsError::DuplicateOrigin(origin.id.clone()));
            }
        }

        let payload = serde_json::to_string(origins)?;
        self.store
            .set(&self.cache_key(), &payload, Some(self.cache_ttl))?;

        info!(count = origins.len(), "cached origins replaced");
        Ok(())
    }

    pub fn purge(&self) -> Result<bool, OriginsError> {
        Ok(self.store.delete(&self.cache_key())?)
    }

    /// Reacts to a settings change. Only the license key invalidates the
    /// origins cache; returns whether a cached entry was dropped.
    pub fn handle_option_updated(&self, option: &str) -> bool {
        if option != LICENSE_KEY_OPTION {
            return false;
        }

        match self.purge() {
            Ok(purged) => {
                debug!(option, purged, "license changed, origins cache purged");
                purged
            }
            Err(err) => {
                warn!(option, error = %err, "failed to purge origins cache");
                false
            }
        }
    }

    fn list_or_empty(&self) -> Vec<Origin> {
        self.list().unwrap_or_else(|err| {
            warn!(error = %err, "failed to read cached origins");
            Vec::new()
        })
    }
}

impl OriginLimits for OriginRegistry {
    fn get_limit(&self, kind: &str) -> Option<u64> {
        // The service reports the account-wide limit on each origin.
        self.list_or_empty()
            .iter()
            .filter_map(|origin| origin.limit(kind))
            .max()
    }

    fn is_oauth_enabled(&self, origin_id: &str) -> bool {
        self.list_or_empty()
            .iter()
            .any(|origin| origin.id == origin_id && origin.oauth_enabled)
    }
}
