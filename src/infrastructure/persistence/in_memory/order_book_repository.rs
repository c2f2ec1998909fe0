//! # In-Memory Order Book Repository
//!
//! In-memory implementation of [`OrderBookRepository`] for testing.
//!
//! Snapshots are kept as the same array text literals Postgres returns, so
//! reads go through the codec exactly like the PostgreSQL repository.
//!
//! # Examples
//!
//! ```
//! use market_info_storage::infrastructure::persistence::in_memory::InMemoryOrderBookRepository;
//!
//! let repo = InMemoryOrderBookRepository::new();
//! assert!(repo.is_empty());
//! ```

use crate::domain::value_objects::{DepthOrder, OrderBook};
use crate::infrastructure::persistence::codec;
use crate::infrastructure::persistence::traits::{
    OrderBookRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Stored form of one snapshot.
#[derive(Debug, Clone)]
struct StoredOrderBook {
    bids: String,
    asks: String,
}

/// In-memory implementation of [`OrderBookRepository`].
///
/// # Thread Safety
///
/// This implementation uses `Arc<RwLock<HashMap>>` for thread-safe access.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderBookRepository {
    storage: Arc<RwLock<HashMap<(String, String), StoredOrderBook>>>,
}

impl InMemoryOrderBookRepository {
    /// Creates a new empty in-memory order book repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if no snapshot is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrites the raw literals stored for `(exchange, pair)`.
    ///
    /// Lets tests seed data that the codec will reject on read.
    pub async fn insert_raw(
        &self,
        exchange: &str,
        pair: &str,
        bids: impl Into<String>,
        asks: impl Into<String>,
    ) {
        let mut storage = self.storage.write().await;
        storage.insert(
            (exchange.to_string(), pair.to_string()),
            StoredOrderBook {
                bids: bids.into(),
                asks: asks.into(),
            },
        );
    }

    /// Clears all snapshots.
    pub async fn clear(&self) {
        self.storage.write().await.clear();
    }
}

#[async_trait]
impl OrderBookRepository for InMemoryOrderBookRepository {
    async fn save(
        &self,
        exchange: &str,
        pair: &str,
        bids: &[DepthOrder],
        asks: &[DepthOrder],
    ) -> RepositoryResult<()> {
        self.insert_raw(
            exchange,
            pair,
            codec::encode_literal(bids),
            codec::encode_literal(asks),
        )
        .await;
        Ok(())
    }

    async fn get(&self, exchange: &str, pair: &str) -> RepositoryResult<OrderBook> {
        let storage = self.storage.read().await;
        let stored = storage
            .get(&(exchange.to_string(), pair.to_string()))
            .ok_or_else(|| RepositoryError::not_found("order book", format!("{exchange}/{pair}")))?;

        let bids = codec::decode(&stored.bids)
            .map_err(|e| RepositoryError::format(format!("decode bids: {e}")))?;
        let asks = codec::decode(&stored.asks)
            .map_err(|e| RepositoryError::format(format!("decode asks: {e}")))?;
        Ok(OrderBook::new(bids, asks))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryOrderBookRepository::new();
        let bids = vec![DepthOrder::new(0.53, 1.5)];
        let asks = vec![DepthOrder::new(0.54, 1.1)];

        repo.save("bybit", "MATIC_USDT", &bids, &asks).await.unwrap();

        let book = repo.get("bybit", "MATIC_USDT").await.unwrap();
        assert_eq!(book.bids(), bids.as_slice());
        assert_eq!(book.asks(), asks.as_slice());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn second_save_replaces_first() {
        let repo = InMemoryOrderBookRepository::new();
        let first = vec![DepthOrder::new(1.0, 1.0), DepthOrder::new(0.9, 1.0)];
        let second = vec![DepthOrder::new(2.0, 3.0)];

        repo.save("bybit", "SOL_USDT", &first, &first).await.unwrap();
        repo.save("bybit", "SOL_USDT", &second, &[]).await.unwrap();

        let book = repo.get("bybit", "SOL_USDT").await.unwrap();
        assert_eq!(book.bids(), second.as_slice());
        assert!(book.asks().is_empty());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let repo = InMemoryOrderBookRepository::new();
        repo.save("bybit", "SOL_USDT", &[DepthOrder::new(1.0, 1.0)], &[])
            .await
            .unwrap();

        assert!(repo.get("binance", "SOL_USDT").await.unwrap_err().is_not_found());
        assert!(repo.get("bybit", "BTC_USDT").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn corrupt_literal_is_format_error() {
        let repo = InMemoryOrderBookRepository::new();
        repo.insert_raw("bybit", "SOL_USDT", "{}", r#"{"(1.0,abc)"}"#)
            .await;

        let err = repo.get("bybit", "SOL_USDT").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Format(ref msg) if msg.starts_with("decode asks")));
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let repo = InMemoryOrderBookRepository::new();
        repo.save("bybit", "SOL_USDT", &[], &[]).await.unwrap();
        repo.clear().await;
        assert!(repo.is_empty());
    }
}
