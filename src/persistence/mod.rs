//! Persistence layer: the [`RecordStore`] contract and its backends.
//!
//! [`postgres::PostgresPersistence`] stores records in the `hotels` and
//! `customers` tables through `sqlx::PgPool`. [`memory::MemoryStore`] keeps
//! them in process and is used by tests and database-less runs.

pub mod memory;
pub mod postgres;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::domain::{Page, PageCursor, Record, RecordId};
use crate::error::AppError;

pub use memory::MemoryStore;
pub use postgres::PostgresPersistence;

/// List/read/create/update/delete for one record type.
///
/// Every operation is a single statement; there are no multi-row
/// transactions and no concurrency control beyond the database's own
/// per-statement atomicity.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync + fmt::Debug {
    /// Returns up to `limit` records in listing order, skipping the rows
    /// before `cursor`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    async fn list(&self, limit: u32, cursor: PageCursor) -> Result<Page<R>, AppError>;

    /// Fetches a record by primary key. A missing record is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    async fn read(&self, id: RecordId) -> Result<Option<R>, AppError>;

    /// Inserts a record and returns it with its generated key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    async fn create(&self, fields: R::Fields) -> Result<R, AppError>;

    /// Overwrites every submitted column of an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::RecordNotFound`] if no record has this key, or
    /// [`AppError::Persistence`] on database failure.
    async fn update(&self, id: RecordId, fields: R::Fields) -> Result<R, AppError>;

    /// Deletes a record. Deleting a missing key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on database failure.
    async fn delete(&self, id: RecordId) -> Result<(), AppError>;
}

/// Opens the PostgreSQL connection pool described by `config`.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] if the database is unreachable.
pub async fn connect(config: &AppConfig) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;
    tracing::info!(
        max_connections = config.database_max_connections,
        "database pool ready"
    );
    Ok(pool)
}

/// Creates the `hotels` and `customers` tables if they do not exist.
///
/// # Errors
///
/// Returns [`AppError::Persistence`] if a migration fails.
pub async fn create_tables(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Persistence(e.to_string()))?;
    tracing::info!("all tables created");
    Ok(())
}
