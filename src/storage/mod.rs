//! Blob storage for uploaded images.
//!
//! [`BlobStore`] uploads a file and returns its public URL. Two backends:
//! [`gcs::CloudStorage`] writes to a Google Cloud Storage bucket through the
//! JSON media-upload API, [`local::LocalStorage`] writes to a directory the
//! app serves under `/media`.
//!
//! Object names are derived from the client filename by [`object_name`]:
//! sanitized, extension checked, and suffixed with a UTC timestamp so
//! repeated uploads of `room.png` land under distinct names.

pub mod gcs;
pub mod local;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::config::{AppConfig, StorageBackend};
use crate::error::AppError;

pub use gcs::CloudStorage;
pub use local::LocalStorage;

/// File extensions accepted for upload (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// A file attached to a submitted form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied filename.
    pub filename: String,
    /// Client-supplied MIME type.
    pub content_type: String,
    /// File content.
    pub content: Bytes,
}

/// Uploads binary content and returns a publicly reachable URL.
#[async_trait]
pub trait BlobStore: Send + Sync + fmt::Debug {
    /// Stores `content` under a name derived from `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUpload`] if `filename` is empty or has a
    /// disallowed extension, or [`AppError::Upload`] if the store rejects
    /// the write.
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, AppError>;
}

/// Builds the blob store selected by `config`.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the HTTP client cannot be built.
pub fn from_config(config: &AppConfig) -> Result<Arc<dyn BlobStore>, AppError> {
    let store: Arc<dyn BlobStore> = match &config.storage_backend {
        StorageBackend::Gcs {
            bucket,
            token,
            endpoint,
        } => Arc::new(CloudStorage::new(
            bucket.clone(),
            token.clone(),
            endpoint.clone(),
            config.storage_public_base_url.clone(),
        )?),
        StorageBackend::Local { dir } => Arc::new(LocalStorage::new(
            dir.clone(),
            config.storage_public_base_url.clone(),
        )),
    };
    Ok(store)
}

/// Derives the stored object name from a client filename.
///
/// `Grand Hotel.PNG` uploaded at 2024-05-01 12:30:00 UTC becomes
/// `Grand_Hotel-2024-05-01-123000.PNG`.
///
/// # Errors
///
/// Returns [`AppError::InvalidUpload`] if the filename is empty, has no
/// basename, or its extension is not in [`ALLOWED_EXTENSIONS`].
pub fn object_name(filename: &str, now: DateTime<Utc>) -> Result<String, AppError> {
    let safe = sanitize_filename(filename);
    if safe.is_empty() {
        return Err(AppError::InvalidUpload("filename is empty".to_string()));
    }

    let Some((basename, extension)) = safe.rsplit_once('.') else {
        return Err(AppError::InvalidUpload(format!(
            "{filename} has an invalid name or extension"
        )));
    };
    let allowed = ALLOWED_EXTENSIONS
        .iter()
        .any(|ext| ext.eq_ignore_ascii_case(extension));
    if basename.is_empty() || !allowed {
        return Err(AppError::InvalidUpload(format!(
            "{filename} has an invalid name or extension"
        )));
    }

    let stamp = now.format("%Y-%m-%d-%H%M%S");
    Ok(format!("{basename}-{stamp}.{extension}"))
}

/// Keeps the last path segment and replaces anything outside
/// `[A-Za-z0-9._-]` with `_`. Leading dots are dropped.
fn sanitize_filename(filename: &str) -> String {
    let last = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}
