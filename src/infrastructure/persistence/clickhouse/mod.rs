//! # ClickHouse Repositories
//!
//! ClickHouse implementation of the order history store.
//!
//! The table definition lives in `migrations/clickhouse/` and is applied
//! with [`run_migrations`].

pub mod history_order_repository;

#[cfg(test)]
mod tests;

pub use history_order_repository::ClickHouseHistoryOrderRepository;

use crate::config::ClickHouseConfig;
use crate::infrastructure::persistence::traits::{RepositoryError, RepositoryResult};
use ::clickhouse::Client;
use tracing::info;

const HISTORY_ORDERS_DDL: &str =
    include_str!("../../../../migrations/clickhouse/history_orders.sql");

/// Builds a client from `config` and checks that the server answers.
///
/// # Errors
///
/// Returns [`RepositoryError::Connection`] if the server cannot be reached.
pub async fn connect(config: &ClickHouseConfig) -> RepositoryResult<Client> {
    let client = Client::default()
        .with_url(&config.url)
        .with_database(&config.database)
        .with_user(&config.username)
        .with_password(&config.password);

    client
        .query("SELECT 1")
        .execute()
        .await
        .map_err(|e| RepositoryError::connection(e.to_string()))?;

    info!(url = %config.url, database = %config.database, "Connected to ClickHouse");
    Ok(client)
}

/// Creates the history table if it does not exist.
///
/// # Errors
///
/// Returns [`RepositoryError::Query`] if the statement fails.
pub async fn run_migrations(client: &Client) -> RepositoryResult<()> {
    client
        .query(HISTORY_ORDERS_DDL)
        .execute()
        .await
        .map_err(|e| RepositoryError::query(format!("migration failed: {e}")))?;
    info!("ClickHouse migrations applied");
    Ok(())
}
