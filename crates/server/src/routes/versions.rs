//! Site version route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use alto_core::VersionId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{NewVersion, SiteVersion};
use crate::state::AppState;

/// List all site versions.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<SiteVersion>>> {
    let versions = state.storage.list_versions().await?;
    Ok(Json(versions))
}

/// The active version. Public: the client fetches this at startup to decide
/// between the general catalog and focus layouts.
#[instrument(skip(state))]
pub async fn active(State(state): State<AppState>) -> Result<Json<SiteVersion>> {
    let version = state.storage.active_version().await?;
    Ok(Json(version))
}

/// Create a (non-active) site version.
#[instrument(skip(state, _admin, input))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<NewVersion>,
) -> Result<(StatusCode, Json<SiteVersion>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let version = state.storage.create_version(input).await?;
    Ok((StatusCode::CREATED, Json(version)))
}

/// Activate a version, deactivating all others.
#[instrument(skip(state, _admin))]
pub async fn activate(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<VersionId>,
) -> Result<Json<SiteVersion>> {
    let version = state.storage.activate_version(id).await?;

    tracing::info!(version_id = %id, name = %version.name, "site version activated");

    Ok(Json(version))
}
