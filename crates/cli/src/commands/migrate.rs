//! Database migration commands.
//!
//! # Usage
//!
//! ```bash
//! printfuse migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string (falls back to
//!   `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Catalog migrations live in `crates/storefront/migrations/` and are
//! embedded at compile time.

use thiserror::Error;

use printfuse_storefront::config::{ConfigError, StorefrontConfig};
use printfuse_storefront::db;

/// Errors from running migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run catalog database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if no database URL is configured, the database
/// is unreachable, or a migration fails.
pub async fn catalog() -> Result<(), MigrationError> {
    let config = StorefrontConfig::from_env()?;
    let database_url = config.require_database_url()?;

    tracing::info!("Connecting to catalog database...");
    let pool = db::create_pool(database_url).await?;

    tracing::info!("Running catalog migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
