//! hotel-crud server entry point.
//!
//! Starts the Axum HTTP server with the HTML CRUD pages and JSON query
//! endpoints.

use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::EnvFilter;

use hotel_crud::api;
use hotel_crud::app_state::AppState;
use hotel_crud::config::{AppConfig, StorageBackend};
use hotel_crud::domain::{Customer, Hotel};
use hotel_crud::persistence::{self, PostgresPersistence, RecordStore};
use hotel_crud::storage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, storage = ?config.storage_backend, "starting hotel-crud");

    // Build persistence and storage
    let blobs = storage::from_config(&config)?;
    let state = if config.persistence_enabled {
        let pool = persistence::connect(&config).await?;
        persistence::create_tables(&pool).await?;
        let pg = Arc::new(PostgresPersistence::new(pool));
        let hotels: Arc<dyn RecordStore<Hotel>> = Arc::clone(&pg) as _;
        let customers: Arc<dyn RecordStore<Customer>> = pg;
        AppState::new(hotels, customers, blobs, config.page_size)
    } else {
        tracing::warn!("persistence disabled; records are kept in memory");
        AppState::in_memory(blobs, config.page_size)
    };

    // Build router
    let mut app = api::build_app(state, config.max_upload_bytes);
    if let StorageBackend::Local { dir } = &config.storage_backend {
        app = app.nest_service("/media", ServeDir::new(dir));
    }
    let app = app
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
