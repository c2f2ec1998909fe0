//! # Order Book Service
//!
//! Stores and loads order books given as one combined list.
//!
//! Callers exchange a single sequence whose first half holds the bids and
//! whose second half holds the asks. The service splits it before storage
//! and concatenates the halves again on read.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::{DepthOrder, OrderBook};
use crate::infrastructure::persistence::traits::OrderBookRepository;
use std::sync::Arc;
use tracing::{debug, error, instrument};

const SAVE_CONTEXT: &str = "save order book";
const GET_CONTEXT: &str = "get order book";

/// Service for order-book snapshots.
#[derive(Debug, Clone)]
pub struct OrderBookService {
    repository: Arc<dyn OrderBookRepository>,
}

impl OrderBookService {
    /// Creates a new order book service.
    #[must_use]
    pub fn new(repository: Arc<dyn OrderBookRepository>) -> Self {
        Self { repository }
    }

    /// Stores the combined order book for `(exchange, pair)`.
    ///
    /// Any previous snapshot for the key is replaced.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Validation`] if `orders` has odd length or more
    ///   than [`OrderBook::MAX_LEVELS`] levels; the repository is not called.
    /// - [`ApplicationError::Format`] or [`ApplicationError::Execution`] if
    ///   the repository fails.
    #[instrument(skip(self, orders), fields(levels = orders.len()))]
    pub async fn save_order_book(
        &self,
        exchange: &str,
        pair: &str,
        orders: Vec<DepthOrder>,
    ) -> ApplicationResult<()> {
        let book = OrderBook::from_combined(orders).map_err(|e| {
            error!(error = %e, context = SAVE_CONTEXT, "Rejected order book");
            ApplicationError::from(e)
        })?;

        self.repository
            .save(exchange, pair, book.bids(), book.asks())
            .await
            .map_err(|e| {
                let err = ApplicationError::from_repository(SAVE_CONTEXT, e);
                error!(error = %err, "Failed to save order book");
                err
            })?;

        debug!("Order book saved");
        Ok(())
    }

    /// Loads the combined order book for `(exchange, pair)`.
    ///
    /// Returns bids followed by asks.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::NotFound`] if no snapshot exists for the key.
    /// - [`ApplicationError::Format`] or [`ApplicationError::Execution`] if
    ///   the repository fails.
    #[instrument(skip(self))]
    pub async fn get_order_book(
        &self,
        exchange: &str,
        pair: &str,
    ) -> ApplicationResult<Vec<DepthOrder>> {
        match self.repository.get(exchange, pair).await {
            Ok(book) => Ok(book.into_combined()),
            Err(e) if e.is_not_found() => Err(ApplicationError::from_repository(GET_CONTEXT, e)),
            Err(e) => {
                let err = ApplicationError::from_repository(GET_CONTEXT, e);
                error!(error = %err, "Failed to get order book");
                Err(err)
            }
        }
    }
}
