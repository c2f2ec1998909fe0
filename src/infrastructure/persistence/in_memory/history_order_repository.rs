//! # In-Memory History Order Repository
//!
//! In-memory implementation of [`HistoryOrderRepository`] for testing.

use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::Client;
use crate::infrastructure::persistence::traits::{HistoryOrderRepository, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`HistoryOrderRepository`].
///
/// Orders are kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryOrderRepository {
    storage: Arc<RwLock<Vec<HistoryOrder>>>,
}

impl InMemoryHistoryOrderRepository {
    /// Creates a new empty in-memory history order repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if no order is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryOrderRepository for InMemoryHistoryOrderRepository {
    async fn save(&self, order: &HistoryOrder) -> RepositoryResult<()> {
        self.storage.write().await.push(order.clone());
        Ok(())
    }

    async fn find_by_client(&self, client: &Client) -> RepositoryResult<Vec<HistoryOrder>> {
        let storage = self.storage.read().await;
        let mut orders: Vec<HistoryOrder> = storage
            .iter()
            .filter(|order| order.belongs_to(client))
            .cloned()
            .collect();
        orders.sort_by_key(|order| order.time_placed);
        Ok(orders)
    }
}
