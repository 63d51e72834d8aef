//! Uploaded media metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use alto_core::MediaId;

/// Metadata for an uploaded file. The bytes live on disk under the upload
/// directory; `url` is the public path the client uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Media {
    pub id: MediaId,
    /// Name on disk (UUID + original extension).
    pub filename: String,
    /// Name the file was uploaded with.
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Public URL, e.g. `/uploads/6f7c....jpg`.
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a file that has just been written to disk.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
}
