//! Health check handlers.

use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::api::AppState;

/// Create health routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(readiness_check))
}

/// Liveness probe; never touches storage.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Readiness probe - verifies the repository is reachable.
pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, &'static str) {
    match state.repo.ping().await {
        Ok(()) => (StatusCode::OK, "Ready"),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Not Ready")
        }
    }
}
