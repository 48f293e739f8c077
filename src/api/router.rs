use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::ask;
use super::health;
use super::state::AppState;
use crate::config::CorsConfig;
use crate::domain::DomainError;

/// Create the router with application state
///
/// Fails when the configured CORS origin is not a valid header value.
pub fn create_router(state: AppState, cors: &CorsConfig) -> Result<Router, DomainError> {
    Ok(Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        .route("/ask", post(ask::ask))
        .with_state(state)
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}

fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer, DomainError> {
    let origin = cors.allowed_origin.parse::<HeaderValue>().map_err(|e| {
        DomainError::configuration(format!(
            "Invalid CORS origin '{}': {}",
            cors.allowed_origin, e
        ))
    })?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}
