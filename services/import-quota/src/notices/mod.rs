use serde::Serialize;

pub mod human_time;
pub mod token;

pub use human_time::human_time_diff;
pub use token::{token_expiry_notice, TokenNotice};

pub const TOKEN_EXPIRED_NOTICE: &str = "aggregator-facebook-token-expired";
pub const OAUTH_FEEDBACK_NOTICE: &str = "aggregator-facebook-oauth-feedback";
pub const OAUTH_PROVIDER: &str = "facebook";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Error,
    Success,
}

/// Admin-facing message ready to be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: &'static str,
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
}

impl From<TokenNotice> for Notice {
    fn from(token: TokenNotice) -> Self {
        Self {
            id: TOKEN_EXPIRED_NOTICE,
            kind: NoticeKind::Error,
            message: token.message(),
            action: Some("Renew your Event Aggregator Facebook token".to_string()),
        }
    }
}

/// Confirms a finished OAuth round trip, signalled by `ea-auth=facebook`.
pub fn oauth_feedback_notice(auth_param: Option<&str>) -> Option<Notice> {
    match auth_param {
        Some(OAUTH_PROVIDER) => Some(Notice {
            id: OAUTH_FEEDBACK_NOTICE,
            kind: NoticeKind::Success,
            message: "Successfully saved Event Aggregator Facebook token".to_string(),
            action: None,
        }),
        _ => None,
    }
}
