//! Google Cloud Storage blob store.
//!
//! Uses the JSON API simple media upload:
//! `POST {endpoint}/upload/storage/v1/b/{bucket}/o?uploadType=media&name=...`
//! with `predefinedAcl=publicRead` so the object is readable at
//! `{public_base_url}/{bucket}/{name}`.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;

use super::{BlobStore, object_name};
use crate::error::AppError;

/// Subset of the object resource returned by a successful upload.
#[derive(Debug, Deserialize)]
struct ObjectResource {
    name: String,
}

/// Bucket-backed blob store.
#[derive(Debug, Clone)]
pub struct CloudStorage {
    client: reqwest::Client,
    bucket: String,
    token: Option<String>,
    endpoint: String,
    public_base_url: String,
}

impl CloudStorage {
    /// Creates a store uploading into `bucket`.
    ///
    /// `token` is sent as an OAuth bearer token when present.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the HTTP client cannot be built.
    pub fn new(
        bucket: String,
        token: Option<String>,
        endpoint: String,
        public_base_url: String,
    ) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("http client: {e}")))?;
        Ok(Self {
            client,
            bucket,
            token,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn upload_url(&self, name: &str) -> Result<Url, AppError> {
        Url::parse_with_params(
            &format!("{}/upload/storage/v1/b/{}/o", self.endpoint, self.bucket),
            &[
                ("uploadType", "media"),
                ("name", name),
                ("predefinedAcl", "publicRead"),
            ],
        )
        .map_err(|e| AppError::Internal(format!("upload url: {e}")))
    }

    /// Public URL of a stored object.
    #[must_use]
    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}/{name}", self.public_base_url, self.bucket)
    }
}

#[async_trait]
impl BlobStore for CloudStorage {
    async fn upload(
        &self,
        content: Bytes,
        filename: &str,
        content_type: &str,
    ) -> Result<String, AppError> {
        let name = object_name(filename, Utc::now())?;
        let url = self.upload_url(&name)?;

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .body(content);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upload(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Upload(e.to_string()))?;
        let object: ObjectResource = response
            .json()
            .await
            .map_err(|e| AppError::Upload(format!("unexpected response: {e}")))?;

        Ok(self.public_url(&object.name))
    }
}
