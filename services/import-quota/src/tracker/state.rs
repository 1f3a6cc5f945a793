use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Point-in-time view of the import quota for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaState {
    pub date: NaiveDate,
    pub remaining: u64,
    pub ceiling: u64,
}

impl QuotaState {
    pub fn used(&self) -> u64 {
        self.ceiling.saturating_sub(self.remaining)
    }

    pub fn usage_percentage(&self) -> f64 {
        if self.ceiling == 0 {
            return 0.0;
        }
        (self.used() as f64 / self.ceiling as f64) * 100.0
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}
