//! Directory-backed blob store.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;

use super::{BlobStore, object_name};
use crate::error::AppError;

/// Writes uploads into a local directory.
///
/// The returned URL is `{public_base_url}/{object}`; the app serves the
/// directory under `/media` when this backend is active.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    /// Creates a store writing into `dir`.
    #[must_use]
    pub fn new(dir: PathBuf, public_base_url: String) -> Self {
        Self {
            dir,
            public_base_url,
        }
    }

    /// Returns the directory uploads are written to.
    #[must_use]
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl BlobStore for LocalStorage {
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        let name = object_name(filename, Utc::now())?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::Upload(format!("{}: {e}", self.dir.display())))?;
        let path = self.dir.join(&name);
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| AppError::Upload(format!("{}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), content_type, bytes = content.len(), "blob written");
        Ok(format!(
            "{}/{name}",
            self.public_base_url.trim_end_matches('/')
        ))
    }
}
