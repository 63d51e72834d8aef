//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; responses carry a small JSON body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::storage::StorageError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin session missing or expired.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Internal(_)
                | Self::Storage(StorageError::Database(_) | StorageError::DataCorruption(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Storage(err) => match err {
                StorageError::NotFound => StatusCode::NOT_FOUND,
                StorageError::Conflict(_) | StorageError::InsufficientStock(_) => {
                    StatusCode::CONFLICT
                }
                StorageError::Database(_) | StorageError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UsernameTaken => StatusCode::CONFLICT,
                AuthError::WeakPassword(_) => StatusCode::BAD_REQUEST,
                AuthError::Storage(_) | AuthError::Hash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_)
            | Self::Storage(StorageError::Database(_) | StorageError::DataCorruption(_))
            | Self::Auth(AuthError::Storage(_) | AuthError::Hash(_)) => {
                "Internal server error".to_string()
            }
            Self::Storage(StorageError::NotFound) => "Not found".to_string(),
            Self::Storage(StorageError::Conflict(msg)) => msg.clone(),
            Self::Storage(StorageError::InsufficientStock(what)) => {
                format!("Insufficient stock for {what}")
            }
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::UsernameTaken) => "Username already taken".to_string(),
            Self::Auth(AuthError::WeakPassword(msg)) => msg.clone(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            status_of(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_mapping() {
        assert_eq!(
            status_of(AppError::Storage(StorageError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AppError::Storage(StorageError::Conflict(
                "username already exists".to_string()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::Storage(StorageError::InsufficientStock(
                "Lampe Dune".to_string()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        assert_eq!(
            status_of(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(AppError::Auth(AuthError::UsernameTaken)),
            StatusCode::CONFLICT
        );
    }
}
