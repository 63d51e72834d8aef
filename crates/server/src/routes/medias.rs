//! Media upload route handlers (admin only).
//!
//! Files land on disk under the configured upload directory with a UUID name
//! and are served back at `/uploads/{filename}`.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use alto_core::MediaId;

use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Media, NewMedia};
use crate::state::AppState;

/// Public URL prefix uploaded files are served under.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// List uploads newest-first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<Vec<Media>>> {
    let media = state.storage.list_media().await?;
    Ok(Json(media))
}

/// Multipart upload. Expects a single `file` field holding an image.
#[instrument(skip(state, _admin, multipart))]
pub async fn upload(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Media>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field
            .file_name()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::BadRequest("file field is missing a filename".into()))?;
        let mime_type = field
            .content_type()
            .map(ToOwned::to_owned)
            .ok_or_else(|| AppError::BadRequest("file field is missing a content type".into()))?;
        if !mime_type.starts_with("image/") {
            return Err(AppError::BadRequest(format!(
                "unsupported content type: {mime_type}"
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("uploaded file is empty".into()));
        }

        let filename = disk_filename(&original_name);
        let path = state.config.upload_dir.join(&filename);
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write {}: {e}", path.display())))?;

        let media = state
            .storage
            .create_media(NewMedia {
                filename: filename.clone(),
                original_name,
                mime_type,
                size_bytes: bytes.len() as i64,
                url: format!("{UPLOADS_PREFIX}/{filename}"),
            })
            .await?;

        tracing::info!(media_id = %media.id, filename = %media.filename, "media uploaded");

        return Ok((StatusCode::CREATED, Json(media)));
    }

    Err(AppError::BadRequest("missing file field".into()))
}

/// Delete an upload: removes the database row, then the file.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<MediaId>,
) -> Result<StatusCode> {
    let media = state.storage.delete_media(id).await?;

    let path = state.config.upload_dir.join(&media.filename);
    if let Err(e) = tokio::fs::remove_file(&path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove media file");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// Build the on-disk name: a fresh UUID plus the original extension.
///
/// The original name never reaches the filesystem, so traversal in uploaded
/// filenames is inert.
fn disk_filename(original_name: &str) -> String {
    let extension = std::path::Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()) && e.len() <= 8);

    let id = Uuid::new_v4();
    match extension {
        Some(ext) => format!("{id}.{}", ext.to_ascii_lowercase()),
        None => id.to_string(),
    }
}
