//! Submitted form extraction.
//!
//! [`SubmittedForm`] accepts `multipart/form-data` (the add/edit pages) and
//! `application/x-www-form-urlencoded` bodies and flattens them into a
//! [`FormFields`] map plus an optional `image` file. On duplicate field
//! names the first value wins.

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Form;

use crate::domain::FormFields;
use crate::error::AppError;
use crate::storage::ImageUpload;

/// Name of the optional file field on add/edit forms.
pub const IMAGE_FIELD: &str = "image";

/// A flattened form submission.
#[derive(Debug, Default)]
pub struct SubmittedForm {
    /// Text fields by name.
    pub fields: FormFields,
    /// The attached `image`, if a file was chosen.
    pub image: Option<ImageUpload>,
}

impl SubmittedForm {
    fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (name, value) in pairs {
            if name != IMAGE_FIELD {
                form.fields.entry(name).or_insert(value);
            }
        }
        form
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
                // Browsers send an empty part when no file was chosen.
                if filename.is_empty() && content.is_empty() {
                    continue;
                }
                form.image.get_or_insert(ImageUpload {
                    filename,
                    content_type,
                    content,
                });
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
                form.fields.entry(name).or_insert(value);
            }
        }
        Ok(form)
    }
}

impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::InvalidRequest(e.body_text()))?;
            Ok(Self::from_pairs(pairs))
        }
    }
}
