use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::config::ImportQuotaConfig;
use crate::notices::{oauth_feedback_notice, token_expiry_notice, Notice, OAUTH_PROVIDER};
use crate::origins::{OriginLimits, OriginRegistry};
use crate::storage::{StorageError, TransientStore};
use crate::tracker::DailyQuota;

pub const OPTION_PREFIX: &str = "option_";
pub const TOKEN_EXPIRES_OPTION: &str = "fb_token_expires";

/// Wires the transient store, origins cache, quota tracker and notices
/// together. Build one per process and share it by reference.
pub struct Aggregator {
    store: Arc<dyn TransientStore>,
    clock: Arc<dyn Clock>,
    origins: Arc<OriginRegistry>,
    quota: DailyQuota,
    token_notice_boundary: chrono::Duration,
    is_loaded: bool,
}

impl Aggregator {
    pub fn new(
        config: &ImportQuotaConfig,
        store: Arc<dyn TransientStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let origins = Arc::new(OriginRegistry::new(Arc::clone(&store), config));
        let quota = DailyQuota::new(
            Arc::clone(&store),
            Arc::clone(&origins) as Arc<dyn OriginLimits>,
            Arc::clone(&clock),
            config,
        );
        let token_notice_boundary = config.token_notice_boundary().unwrap_or_else(|| {
            warn!(
                boundary_secs = config.token_notice_boundary_secs,
                "token notice boundary out of range, using the default"
            );
            chrono::Duration::days(4)
        });

        if !config.should_load {
            info!("aggregator disabled by configuration, staying unloaded");
        }

        Self {
            store,
            clock,
            origins,
            quota,
            token_notice_boundary,
            is_loaded: config.should_load,
        }
    }

    /// Whether the aggregator finished loading. Every quota operation is
    /// refused by the API while this is false.
    pub fn is_active(&self) -> bool {
        self.is_loaded
    }

    pub fn quota(&self) -> &DailyQuota {
        &self.quota
    }

    pub fn origins(&self) -> &OriginRegistry {
        &self.origins
    }

    pub fn option(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.store.get(&option_key(name))
    }

    /// Persists an option and runs the update hooks. Returns whether the
    /// origins cache was purged as a result.
    pub fn set_option(&self, name: &str, value: &str) -> Result<bool, StorageError> {
        if name.trim().is_empty() {
            return Err(StorageError::InvalidValue("option name cannot be empty".into()));
        }

        self.store.set(&option_key(name), value, None)?;
        let purged = self.origins.handle_option_updated(name);
        debug!(option = name, purged, "option updated");
        Ok(purged)
    }

    /// Notices that apply right now. Nothing is shown unless the OAuth
    /// origin is enabled.
    pub fn notices(&self, auth_param: Option<&str>) -> Vec<Notice> {
        if !self.origins.is_oauth_enabled(OAUTH_PROVIDER) {
            return Vec::new();
        }

        let mut notices = Vec::new();
        if let Some(token) =
            token_expiry_notice(self.token_expires_at(), self.clock.now(), self.token_notice_boundary)
        {
            notices.push(Notice::from(token));
        }
        if let Some(feedback) = oauth_feedback_notice(auth_param) {
            notices.push(feedback);
        }
        notices
    }

    pub fn purge_expired(&self) -> Result<usize, StorageError> {
        self.store.purge_expired()
    }

    pub fn start_maintenance_task(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let aggregator = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                match aggregator.purge_expired() {
                    Ok(count) if count > 0 => {
                        debug!(purged = count, "purged expired transients");
                    }
                    Ok(_) => {
                        debug!("no expired transients to purge");
                    }
                    Err(err) => {
                        error!(error = %err, "failed to purge expired transients");
                    }
                }
            }
        })
    }

    fn token_expires_at(&self) -> Option<DateTime<Utc>> {
        let raw = match self.option(TOKEN_EXPIRES_OPTION) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "failed to read token expiry");
                return None;
            }
        };

        match raw.trim().parse::<i64>() {
            Ok(0) => None,
            Ok(secs) => DateTime::<Utc>::from_timestamp(secs, 0),
            Err(_) => {
                warn!(value = %raw, "token expiry is not a unix timestamp");
                None
            }
        }
    }
}

fn option_key(name: &str) -> String {
    format!("{OPTION_PREFIX}{name}")
}
