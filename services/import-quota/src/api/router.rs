use std::sync::Arc;
use std::time::Duration;

use axum::{
    routing::{any, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::handlers;
use super::ApiState;

pub fn create_router(state: Arc<ApiState>) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)));

    Router::new()
        .route("/api/quota", get(handlers::get_quota))
        .route("/api/quota/reduce", post(handlers::reduce_quota))
        .route("/api/quota/reset", post(handlers::reset_quota))
        .route(
            "/api/origins",
            get(handlers::list_origins).put(handlers::replace_origins),
        )
        .route("/api/options/:name", put(handlers::set_option))
        .route("/api/notices", get(handlers::list_notices))
        .route("/event-aggregator/:action", any(handlers::endpoint_action))
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(middleware)
}
