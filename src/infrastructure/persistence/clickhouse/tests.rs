//! # ClickHouse Repository Integration Tests
//!
//! Integration tests for the ClickHouse history repository against a live
//! server.
//!
//! # Note
//!
//! These tests require a ClickHouse server reachable through
//! `TEST_CLICKHOUSE_URL`. They are marked with `#[ignore]` by default and
//! can be run with:
//! ```bash
//! cargo test --lib clickhouse::tests -- --ignored
//! ```

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use crate::config::ClickHouseConfig;
use crate::domain::entities::history_order::tests::sample_order;
use crate::domain::value_objects::Client;
use crate::infrastructure::persistence::clickhouse::{
    ClickHouseHistoryOrderRepository, connect, run_migrations,
};
use crate::infrastructure::persistence::traits::HistoryOrderRepository;

// ============================================================================
// Test Helpers
// ============================================================================

/// Connects to the test server with the history table in place.
async fn create_test_client() -> Option<::clickhouse::Client> {
    let url = std::env::var("TEST_CLICKHOUSE_URL").ok()?;
    let config = ClickHouseConfig {
        url,
        database: std::env::var("TEST_CLICKHOUSE_DATABASE")
            .unwrap_or_else(|_| "default".to_string()),
        ..ClickHouseConfig::default()
    };
    let client = connect(&config).await.ok()?;
    run_migrations(&client).await.ok()?;
    Some(client)
}

/// Removes rows written under the given exchange.
async fn cleanup(
    client: &::clickhouse::Client,
    exchange: &str,
) -> Result<(), ::clickhouse::error::Error> {
    client
        .query("DELETE FROM history_orders WHERE exchange_name = ?")
        .bind(exchange)
        .execute()
        .await
}

// ============================================================================
// History Order Repository Tests
// ============================================================================

#[tokio::test]
#[ignore = "requires ClickHouse server"]
async fn history_order_save_and_find() {
    let client = match create_test_client().await {
        Some(c) => c,
        None => {
            eprintln!("Skipping test: TEST_CLICKHOUSE_URL not set");
            return;
        }
    };
    let exchange = "test-history";
    cleanup(&client, exchange).await.unwrap();

    let repo = ClickHouseHistoryOrderRepository::new(client.clone());
    let owner = Client::new("John Doe", exchange, "My Order", "BTCUSDT");
    let other = Client::new("Jane Doe", exchange, "My Order", "BTCUSDT");

    let mut later = sample_order(&owner, "sell");
    later.time_placed += chrono::Duration::minutes(5);
    repo.save(&later).await.unwrap();
    repo.save(&sample_order(&owner, "buy")).await.unwrap();
    repo.save(&sample_order(&other, "buy")).await.unwrap();

    let orders = repo.find_by_client(&owner).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].side, "buy");
    assert_eq!(orders[1], later);
    assert!(orders.iter().all(|o| o.belongs_to(&owner)));

    cleanup(&client, exchange).await.unwrap();
}

#[tokio::test]
#[ignore = "requires ClickHouse server"]
async fn history_order_unknown_client_is_empty() {
    let client = match create_test_client().await {
        Some(c) => c,
        None => return,
    };

    let repo = ClickHouseHistoryOrderRepository::new(client);
    let nobody = Client::new("Nobody", "test-nobody", "none", "NONE");
    assert!(repo.find_by_client(&nobody).await.unwrap().is_empty());
}
