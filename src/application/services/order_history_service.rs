//! # Order History Service
//!
//! Appends history orders and lists them per client.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::Client;
use crate::infrastructure::persistence::traits::HistoryOrderRepository;
use std::sync::Arc;
use tracing::{error, instrument};

const SAVE_CONTEXT: &str = "save order";
const GET_CONTEXT: &str = "get order history";

/// Service for client order history.
#[derive(Debug, Clone)]
pub struct OrderHistoryService {
    repository: Arc<dyn HistoryOrderRepository>,
}

impl OrderHistoryService {
    /// Creates a new order history service.
    #[must_use]
    pub fn new(repository: Arc<dyn HistoryOrderRepository>) -> Self {
        Self { repository }
    }

    /// Appends `order` to the history.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Validation`] if a client field is empty.
    /// - [`ApplicationError::Execution`] if the repository fails.
    #[instrument(skip(self, order), fields(client = %order.client()))]
    pub async fn save_history_order(&self, order: &HistoryOrder) -> ApplicationResult<()> {
        order.client().validate()?;

        self.repository.save(order).await.map_err(|e| {
            let err = ApplicationError::from_repository(SAVE_CONTEXT, e);
            error!(error = %err, "Failed to save history order");
            err
        })
    }

    /// Returns every order placed by `client`, oldest first.
    ///
    /// An unknown client yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Validation`] if a client field is empty.
    /// - [`ApplicationError::Execution`] if the repository fails.
    #[instrument(skip(self), fields(client = %client))]
    pub async fn get_history_orders_by_client(
        &self,
        client: &Client,
    ) -> ApplicationResult<Vec<HistoryOrder>> {
        client.validate()?;

        self.repository.find_by_client(client).await.map_err(|e| {
            let err = ApplicationError::from_repository(GET_CONTEXT, e);
            error!(error = %err, "Failed to get order history");
            err
        })
    }
}
