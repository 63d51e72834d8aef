//! Admin authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::AuthService;
use crate::state::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login with username and password; sets the session cookie.
#[instrument(skip(state, session, payload), fields(username = %payload.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<CurrentAdmin>> {
    let auth = AuthService::new(state.storage.as_ref());
    let user = auth.login(&payload.username, &payload.password).await?;

    // Rotate the session id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    let admin = CurrentAdmin::from(&user);
    set_current_admin(&session, &admin)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "admin logged in");

    Ok(Json(admin))
}

/// Logout: clears the admin from the session.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in admin, or 401.
#[instrument(skip(admin))]
pub async fn me(RequireAdmin(admin): RequireAdmin) -> Json<CurrentAdmin> {
    Json(admin)
}
