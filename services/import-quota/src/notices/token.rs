use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::human_time::human_time_diff;

/// Where an OAuth token stands relative to its warning window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TokenNotice {
    Expiring {
        expires_at: DateTime<Utc>,
        relative: String,
    },
    Expired {
        expires_at: DateTime<Utc>,
        relative: String,
    },
}

impl TokenNotice {
    pub fn expires_at(&self) -> DateTime<Utc> {
        match self {
            TokenNotice::Expiring { expires_at, .. } | TokenNotice::Expired { expires_at, .. } => {
                *expires_at
            }
        }
    }

    pub fn message(&self) -> String {
        match self {
            TokenNotice::Expiring { relative, .. } => {
                format!("Your Event Aggregator Facebook token will expire in about {relative}.")
            }
            TokenNotice::Expired { relative, .. } => {
                format!("Your Event Aggregator Facebook token has expired about {relative} ago.")
            }
        }
    }
}

/// Warns once `now` has entered the `boundary` window before `expires_at`.
///
/// The relative time is measured from `now` to the start of that window,
/// not to the expiry itself.
pub fn token_expiry_notice(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    boundary: Duration,
) -> Option<TokenNotice> {
    let expires_at = expires_at?;
    // A window reaching past the earliest representable instant has opened.
    let window_start = expires_at
        .checked_sub_signed(boundary)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    if now < window_start {
        return None;
    }

    let relative = human_time_diff(now, window_start);
    if now > expires_at {
        Some(TokenNotice::Expired {
            expires_at,
            relative,
        })
    } else {
        Some(TokenNotice::Expiring {
            expires_at,
            relative,
        })
    }
}
