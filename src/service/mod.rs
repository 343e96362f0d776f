//! Service layer: business logic orchestration.
//!
//! [`RecordService`] validates submitted forms, uploads attached images
//! through the [`crate::storage::BlobStore`], and forwards to the
//! [`crate::persistence::RecordStore`].

pub mod record_service;

pub use record_service::RecordService;
