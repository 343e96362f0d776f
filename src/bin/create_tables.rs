//! Creates the `hotels` and `customers` tables if they do not exist.
//!
//! Reads `DATABASE_URL` and the pool settings from the environment, runs
//! the embedded migrations, and exits.

use tracing_subscriber::EnvFilter;

use hotel_crud::config::AppConfig;
use hotel_crud::persistence;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    let pool = persistence::connect(&config).await?;
    persistence::create_tables(&pool).await?;
    pool.close().await;

    Ok(())
}
