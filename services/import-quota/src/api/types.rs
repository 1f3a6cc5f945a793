use serde::{Deserialize, Serialize};

use crate::notices::Notice;
use crate::origins::Origin;
use crate::tracker::QuotaState;

#[derive(Debug, Clone, Serialize)]
pub struct GetQuotaResponse {
    pub quota: QuotaState,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReduceQuotaRequest {
    /// Number, numeric string or absent (meaning one).
    #[serde(default)]
    pub amount: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReduceQuotaResponse {
    pub success: bool,
    pub remaining: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetQuotaResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OriginsPayload {
    pub origins: Vec<Origin>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOptionRequest {
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetOptionResponse {
    pub success: bool,
    pub purged: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticesQuery {
    #[serde(rename = "ea-auth")]
    pub ea_auth: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticesResponse {
    pub notices: Vec<Notice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub details: Option<serde_json::Value>,
}
