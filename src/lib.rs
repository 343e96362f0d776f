//! # hotel-crud
//!
//! Web CRUD service for hotels and customers, backed by PostgreSQL, with
//! optional image uploads to a blob store.
//!
//! Each record kind gets HTML list/view/add/edit/delete pages; a separate
//! read-only JSON surface lists every record of a kind.
//!
//! ## Architecture
//!
//! ```text
//! Browser / API clients
//!     │
//!     ├── HTML CRUD handlers (api/handlers/records)
//!     ├── JSON query handlers (api/handlers/schema → schema)
//!     │
//!     ├── RecordService (service/)
//!     │     ├── BlobStore (storage/): Cloud Storage or local directory
//!     │     └── RecordStore (persistence/)
//!     │
//!     └── PostgreSQL (or in-memory store)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod render;
pub mod schema;
pub mod service;
pub mod storage;
