//! # Signflow DB
//!
//! Database pool and the Postgres-backed menu catalog.
//!
//! # Example
//!
//! ```ignore
//! use signflow_config::DatabaseConfig;
//! use signflow_db::{PgMenuCatalog, init_db_pool};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! let catalog = PgMenuCatalog::new(pool.clone());
//! ```

pub mod catalog;

use signflow_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Initializes a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and should be passed to the
/// application state for use in request handlers.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;

    info!(
        max_connections = config.max_connections,
        "Database pool initialized"
    );
    Ok(pool)
}

pub use catalog::PgMenuCatalog;

// Re-export PgPool for convenience
pub use sqlx::PgPool;
