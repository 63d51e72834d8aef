//! Health and readiness handlers.

use axum::{extract::State, http::StatusCode};
use tracing::instrument;

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check: pings the storage backend.
#[instrument(skip(state))]
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match state.storage.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
