//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! orchard-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use orchard_commerce::config::CommerceConfig;
use orchard_commerce::db::create_pool;

/// Errors that can occur while running migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("configuration error: {0}")]
    Config(#[from] orchard_commerce::config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the commerce database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if configuration, connection, or a migration
/// step fails.
pub async fn run() -> Result<(), MigrationError> {
    dotenvy::dotenv().ok();

    let config = CommerceConfig::from_env()?;

    tracing::info!("Connecting to commerce database...");
    let pool = create_pool(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../commerce/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
