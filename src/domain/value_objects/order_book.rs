//! # Order Book Value Object
//!
//! Bid/ask halves of an order-book snapshot.
//!
//! Clients exchange order books as one combined sequence of depth orders:
//! the first half holds the bids and the second half the asks. [`OrderBook`]
//! owns the conversion between that combined form and the two halves stored
//! per `(exchange, pair)`.
//!
//! # Examples
//!
//! ```
//! use market_info_storage::domain::value_objects::{DepthOrder, OrderBook};
//!
//! let combined = vec![
//!     DepthOrder::new(0.53, 1.5),
//!     DepthOrder::new(0.54, 1.1),
//! ];
//!
//! let book = OrderBook::from_combined(combined.clone()).unwrap();
//! assert_eq!(book.bids(), &combined[..1]);
//! assert_eq!(book.asks(), &combined[1..]);
//! assert_eq!(book.into_combined(), combined);
//! ```

use super::depth_order::DepthOrder;
use crate::domain::errors::{DomainError, DomainResult};

/// An order-book snapshot split into bids and asks.
///
/// # Invariants
///
/// - When built from a combined sequence, `bids().len() == asks().len()`
/// - Order within each half is preserved exactly
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderBook {
    bids: Vec<DepthOrder>,
    asks: Vec<DepthOrder>,
}

impl OrderBook {
    /// Largest number of levels (bids and asks together) one snapshot holds.
    ///
    /// PostgreSQL caps a statement at 65535 bind parameters. A save binds
    /// the two key columns plus a price and a quantity per level.
    pub const MAX_LEVELS: usize = (u16::MAX as usize - 2) / 2;

    /// Creates an order book from already separated halves.
    #[must_use]
    pub fn new(bids: Vec<DepthOrder>, asks: Vec<DepthOrder>) -> Self {
        Self { bids, asks }
    }

    /// Splits a combined sequence into bids (first half) and asks (second half).
    ///
    /// # Errors
    ///
    /// - [`DomainError::OddOrderBookLength`] if the sequence length is odd.
    /// - [`DomainError::OrderBookTooLarge`] if it exceeds [`Self::MAX_LEVELS`].
    pub fn from_combined(mut orders: Vec<DepthOrder>) -> DomainResult<Self> {
        if orders.len() > Self::MAX_LEVELS {
            return Err(DomainError::OrderBookTooLarge {
                len: orders.len(),
                max: Self::MAX_LEVELS,
            });
        }
        if orders.len() % 2 != 0 {
            return Err(DomainError::OddOrderBookLength(orders.len()));
        }

        let asks = orders.split_off(orders.len() / 2);
        Ok(Self { bids: orders, asks })
    }

    /// Returns the bid levels.
    #[inline]
    #[must_use]
    pub fn bids(&self) -> &[DepthOrder] {
        &self.bids
    }

    /// Returns the ask levels.
    #[inline]
    #[must_use]
    pub fn asks(&self) -> &[DepthOrder] {
        &self.asks
    }

    /// Total number of levels on both sides.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bids.len() + self.asks.len()
    }

    /// Returns true if neither side holds a level.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    /// Consumes the book, returning `(bids, asks)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<DepthOrder>, Vec<DepthOrder>) {
        (self.bids, self.asks)
    }

    /// Consumes the book, returning bids followed by asks.
    ///
    /// This is the exact inverse of [`OrderBook::from_combined`].
    #[must_use]
    pub fn into_combined(self) -> Vec<DepthOrder> {
        let mut combined = self.bids;
        combined.extend(self.asks);
        combined
    }
}
