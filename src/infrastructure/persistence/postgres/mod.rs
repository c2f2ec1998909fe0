//! # PostgreSQL Repositories
//!
//! PostgreSQL implementations of repository traits using sqlx.
//!
//! Schema lives in `migrations/postgres/` and is applied with [`run_migrations`].

pub mod order_book_repository;


pub use order_book_repository::{DEPTH_ORDER_TYPE, PostgresOrderBookRepository};

use crate::config::DatabaseConfig;
use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Opens a connection pool using `config`.
///
/// # Errors
///
/// Returns [`RepositoryError::Connection`] if the options are invalid or
/// the first connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<PgPool> {
    let options = config
        .connect_options()
        .map_err(|e| RepositoryError::connection(e.to_string()))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.connect_timeout())
        .idle_timeout(config.idle_timeout())
        .connect_with(options)
        .await
        .map_err(|e| RepositoryError::connection(e.to_string()))?;

    info!(
        max_connections = config.max_connections,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Applies pending schema migrations.
///
/// # Errors
///
/// Returns [`RepositoryError::Query`] if a migration fails.
pub async fn run_migrations(pool: &PgPool) -> RepositoryResult<()> {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .map_err(|e| RepositoryError::query(format!("migration failed: {e}")))?;
    info!("Database migrations applied");
    Ok(())
}
