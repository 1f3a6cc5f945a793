use std::sync::Arc;
use std::time::Duration;

use chrono::{FixedOffset, NaiveDate};
use tracing::{debug, error, warn};

use crate::clock::{local_date, Clock};
use crate::config::ImportQuotaConfig;
use crate::origins::OriginLimits;
use crate::storage::TransientStore;

use super::amount::ReduceAmount;
use super::error::QuotaError;
use super::state::QuotaState;
use super::{IMPORT_LIMIT_KIND, QUOTA_KEY_PREFIX};

/// Remaining import operations for the current calendar day.
///
/// The counter lives in the transient store under a date-stamped key and
/// expires a day after its last write. Reads never write: a missing record
/// simply means the full ceiling is available. `reduce` is a plain
/// read-modify-write, so concurrent reducers may lose updates.
#[derive(Clone)]
pub struct DailyQuota {
    store: Arc<dyn TransientStore>,
    origins: Arc<dyn OriginLimits>,
    clock: Arc<dyn Clock>,
    default_limit: u64,
    utc_offset: FixedOffset,
    record_ttl: Duration,
}

impl DailyQuota {
    pub fn new(
        store: Arc<dyn TransientStore>,
        origins: Arc<dyn OriginLimits>,
        clock: Arc<dyn Clock>,
        config: &ImportQuotaConfig,
    ) -> Self {
        Self {
            store,
            origins,
            clock,
            default_limit: config.default_daily_limit,
            utc_offset: config.utc_offset(),
            record_ttl: Duration::from_secs(config.quota_ttl_secs),
        }
    }

    /// Daily ceiling: the origin-reported import limit if there is one,
    /// else the configured default.
    pub fn ceiling(&self) -> u64 {
        match self.origins.get_limit(IMPORT_LIMIT_KIND) {
            Some(limit) if limit > 0 => limit,
            _ => self.default_limit,
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining_within(self.ceiling())
    }

    pub fn has_capacity(&self, amount: u64) -> bool {
        self.remaining() >= amount
    }

    pub fn snapshot(&self) -> QuotaState {
        let ceiling = self.ceiling();
        QuotaState {
            date: self.today(),
            remaining: self.remaining_within(ceiling),
            ceiling,
        }
    }

    /// Takes `amount` off today's remaining count, flooring at zero.
    ///
    /// Negative amounts are accepted and ignored. Returns whether the new
    /// value was written.
    pub fn reduce(&self, amount: i64) -> bool {
        if amount < 0 {
            debug!(amount, "ignoring negative quota reduction");
            return true;
        }

        let before = self.remaining();
        let after = before.saturating_sub(amount.unsigned_abs());
        let key = self.today_key();

        match self
            .store
            .set(&key, &after.to_string(), Some(self.record_ttl))
        {
            Ok(()) => {
                debug!(key = %key, amount, before, after, "reduced daily import quota");
                true
            }
            Err(err) => {
                error!(key = %key, amount, error = %err, "failed to persist daily import quota");
                false
            }
        }
    }

    /// Like [`DailyQuota::reduce`] for loosely typed input. Non-numeric
    /// amounts are rejected before anything is read or written.
    pub fn try_reduce(&self, raw: &str) -> Result<bool, QuotaError> {
        let amount: ReduceAmount = raw.parse()?;
        Ok(self.reduce(amount.get()))
    }

    /// Drops today's record so the next read sees the full ceiling.
    pub fn reset(&self) -> bool {
        let key = self.today_key();
        match self.store.delete(&key) {
            Ok(removed) => {
                debug!(key = %key, removed, "reset daily import quota");
                true
            }
            Err(err) => {
                error!(key = %key, error = %err, "failed to reset daily import quota");
                false
            }
        }
    }

    pub fn today(&self) -> NaiveDate {
        local_date(self.clock.now(), self.utc_offset)
    }

    pub fn key_for(date: NaiveDate) -> String {
        format!("{QUOTA_KEY_PREFIX}{}", date.format("%Y-%m-%d"))
    }

    fn today_key(&self) -> String {
        Self::key_for(self.today())
    }

    fn remaining_within(&self, ceiling: u64) -> u64 {
        match self.stored_remaining() {
            Some(stored) => stored.min(ceiling),
            None => ceiling,
        }
    }

    fn stored_remaining(&self) -> Option<u64> {
        let key = self.today_key();
        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to read daily import quota");
                return None;
            }
        };

        let trimmed = raw.trim();
        match trimmed.parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) if is_negative_integer(trimmed) => {
                debug!(key = %key, value = %raw, "negative daily import quota, treating as exhausted");
                Some(0)
            }
            Err(_) => {
                warn!(key = %key, value = %raw, "unreadable daily import quota, treating as exhausted");
                Some(0)
            }
        }
    }
}

fn is_negative_integer(value: &str) -> bool {
    value
        .strip_prefix('-')
        .map_or(false, |digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}
