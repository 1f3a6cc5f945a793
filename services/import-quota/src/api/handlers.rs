use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::{debug, error, info, warn};

use crate::origins::OriginsError;
use crate::tracker::ReduceAmount;

use super::types::{
    ErrorResponse, GetQuotaResponse, NoticesQuery, NoticesResponse, OriginsPayload,
    ReduceQuotaRequest, ReduceQuotaResponse, ResetQuotaResponse, SetOptionRequest,
    SetOptionResponse,
};
use super::ApiState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

pub async fn get_quota(State(state): State<Arc<ApiState>>) -> ApiResult<GetQuotaResponse> {
    ensure_active(&state)?;
    Ok(Json(GetQuotaResponse {
        quota: state.aggregator.quota().snapshot(),
    }))
}

pub async fn reduce_quota(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<ReduceQuotaRequest>,
) -> ApiResult<ReduceQuotaResponse> {
    ensure_active(&state)?;

    let amount = ReduceAmount::try_from(&request.amount)
        .map_err(|err| bad_request("invalid_amount", &err.to_string()))?;

    let quota = state.aggregator.quota();
    let success = quota.reduce(amount.get());
    if !success {
        warn!(amount = amount.get(), "daily import quota reduction was not persisted");
    }

    Ok(Json(ReduceQuotaResponse {
        success,
        remaining: quota.remaining(),
    }))
}

pub async fn reset_quota(State(state): State<Arc<ApiState>>) -> ApiResult<ResetQuotaResponse> {
    ensure_active(&state)?;
    let success = state.aggregator.quota().reset();
    info!(success, "daily import quota reset requested");
    Ok(Json(ResetQuotaResponse { success }))
}

pub async fn list_origins(State(state): State<Arc<ApiState>>) -> ApiResult<OriginsPayload> {
    let origins = state.aggregator.origins().list().map_err(internal_error)?;
    Ok(Json(OriginsPayload { origins }))
}

pub async fn replace_origins(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<OriginsPayload>,
) -> ApiResult<OriginsPayload> {
    if payload.origins.iter().any(|origin| origin.id.trim().is_empty()) {
        return Err(bad_request("invalid_origin", "origin id cannot be empty"));
    }

    state
        .aggregator
        .origins()
        .replace(&payload.origins)
        .map_err(|err| match err {
            OriginsError::DuplicateOrigin(id) => {
                bad_request("duplicate_origin", &format!("duplicate origin id {id}"))
            }
            other => internal_error(other),
        })?;

    Ok(Json(payload))
}

pub async fn set_option(
    State(state): State<Arc<ApiState>>,
    Path(name): Path<String>,
    Json(request): Json<SetOptionRequest>,
) -> ApiResult<SetOptionResponse> {
    if name.trim().is_empty() {
        return Err(bad_request("invalid_option", "option name cannot be empty"));
    }

    let value = match request.value {
        serde_json::Value::String(value) => value,
        other => other.to_string(),
    };

    let purged = state
        .aggregator
        .set_option(&name, &value)
        .map_err(internal_error)?;

    Ok(Json(SetOptionResponse {
        success: true,
        purged,
    }))
}

pub async fn list_notices(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<NoticesQuery>,
) -> ApiResult<NoticesResponse> {
    let notices = state.aggregator.notices(query.ea_auth.as_deref());
    Ok(Json(NoticesResponse { notices }))
}

/// Catch-all for `/event-aggregator/:action` requests. No action has a
/// handler in this service, so every one gets a JSON 404.
pub async fn endpoint_action(Path(action): Path<String>) -> (StatusCode, Json<ErrorResponse>) {
    debug!(action = %action, "no handler registered for aggregator action");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "no handler for aggregator action".to_string(),
            code: "unhandled_action".to_string(),
            details: Some(serde_json::json!({ "action": action })),
        }),
    )
}

pub async fn health_check(State(state): State<Arc<ApiState>>) -> ApiResult<serde_json::Value> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "service": "import-quota",
        "active": state.aggregator.is_active(),
        "default_daily_limit": state.config.default_daily_limit,
    })))
}

fn ensure_active(state: &ApiState) -> Result<(), (StatusCode, Json<ErrorResponse>)> {
    if state.aggregator.is_active() {
        return Ok(());
    }
    Err((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "aggregator is not loaded".to_string(),
            code: "aggregator_inactive".to_string(),
            details: None,
        }),
    ))
}

fn bad_request(code: &str, message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
            code: code.to_string(),
            details: None,
        }),
    )
}

fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, Json<ErrorResponse>) {
    error!(error = %err, "import quota API internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "internal server error".to_string(),
            code: "internal_error".to_string(),
            details: Some(serde_json::json!({ "message": err.to_string() })),
        }),
    )
}
