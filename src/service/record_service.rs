//! Record service: validates submitted forms, uploads attached images, and
//! forwards to the record store.

use std::sync::Arc;

use crate::domain::page::MAX_PAGE_SIZE;
use crate::domain::{FormFields, Page, PageCursor, Record, RecordId};
use crate::error::AppError;
use crate::persistence::RecordStore;
use crate::storage::{BlobStore, ImageUpload};

/// Orchestration layer for one record type.
///
/// Every write follows the same order: validate the form against the
/// column allow-list → upload the image, if any → one store call. A form
/// that fails validation never reaches the blob store.
#[derive(Debug)]
pub struct RecordService<R: Record> {
    store: Arc<dyn RecordStore<R>>,
    blobs: Arc<dyn BlobStore>,
    page_size: u32,
}

impl<R: Record> RecordService<R> {
    /// Creates a new `RecordService`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore<R>>, blobs: Arc<dyn BlobStore>, page_size: u32) -> Self {
        Self {
            store,
            blobs,
            page_size,
        }
    }

    /// Lists one page of records starting at the opaque `page_token`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidRequest`] for a malformed token, or a
    /// store error.
    pub async fn list(&self, page_token: Option<&str>) -> Result<Page<R>, AppError> {
        let cursor = PageCursor::parse(page_token)?;
        self.store.list(self.page_size, cursor).await
    }

    /// Walks every page and returns all records in listing order.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn list_all(&self) -> Result<Vec<R>, AppError> {
        let mut records = Vec::new();
        let mut cursor = PageCursor::START;
        loop {
            let page = self.store.list(MAX_PAGE_SIZE, cursor).await?;
            records.extend(page.items);
            match page.next_cursor {
                Some(next) => cursor = next,
                None => return Ok(records),
            }
        }
    }

    /// Fetches a record by primary key; `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn find(&self, id: RecordId) -> Result<Option<R>, AppError> {
        self.store.read(id).await
    }

    /// Fetches a record that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RecordNotFound`] when absent, or a store error.
    pub async fn get(&self, id: RecordId) -> Result<R, AppError> {
        self.find(id)
            .await?
            .ok_or(AppError::RecordNotFound { kind: R::KIND, id })
    }

    /// Creates a record from a submitted form and optional image.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] or [`AppError::InvalidUpload`] for
    /// rejected input, [`AppError::Upload`] if the blob store fails, or a
    /// store error.
    pub async fn create(
        &self,
        form: FormFields,
        image: Option<ImageUpload>,
    ) -> Result<R, AppError> {
        let fields = self.prepare(form, image).await?;
        let record = self.store.create(fields).await?;
        tracing::info!(kind = R::KIND, id = %record.id(), "record created");
        Ok(record)
    }

    /// Overwrites the submitted columns of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RecordNotFound`] if the record does not exist,
    /// plus everything [`RecordService::create`] can return.
    pub async fn update(
        &self,
        id: RecordId,
        form: FormFields,
        image: Option<ImageUpload>,
    ) -> Result<R, AppError> {
        let fields = R::parse_fields(form)?;
        let fields = match image {
            Some(image) => {
                // No upload for a missing record.
                self.get(id).await?;
                self.attach(fields, image).await?
            }
            None => fields,
        };
        let record = self.store.update(id, fields).await?;
        tracing::info!(kind = R::KIND, %id, "record updated");
        Ok(record)
    }

    /// Deletes a record. Deleting a missing record succeeds.
    ///
    /// # Errors
    ///
    /// Returns a store error.
    pub async fn delete(&self, id: RecordId) -> Result<(), AppError> {
        self.store.delete(id).await?;
        tracing::info!(kind = R::KIND, %id, "record deleted");
        Ok(())
    }

    async fn prepare(
        &self,
        form: FormFields,
        image: Option<ImageUpload>,
    ) -> Result<R::Fields, AppError> {
        let fields = R::parse_fields(form)?;
        match image {
            Some(image) => self.attach(fields, image).await,
            None => Ok(fields),
        }
    }

    async fn attach(
        &self,
        mut fields: R::Fields,
        image: ImageUpload,
    ) -> Result<R::Fields, AppError> {
        if !R::ACCEPTS_IMAGE {
            return Err(AppError::InvalidUpload(format!(
                "{} records do not take an image",
                R::KIND
            )));
        }
        let url = self
            .blobs
            .upload(image.content, &image.filename, &image.content_type)
            .await?;
        tracing::info!(filename = %image.filename, %url, "uploaded file");
        R::attach_image(&mut fields, url)?;
        Ok(fields)
    }
}
