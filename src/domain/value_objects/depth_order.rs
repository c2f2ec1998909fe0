//! # Depth Order Value Object
//!
//! A single price level of an order book.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// One price level: a price and the base-asset quantity resting at it.
///
/// A depth order carries no identity of its own; its meaning within an
/// order book comes from its position in the combined sequence.
///
/// # Examples
///
/// ```
/// use market_info_storage::domain::value_objects::DepthOrder;
///
/// let level = DepthOrder::new(0.53, 1.5);
/// assert_eq!(level.price, 0.53);
/// assert_eq!(level.base_qty, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepthOrder {
    /// Price of the level, in quote currency.
    pub price: f64,
    /// Quantity available at this price, in base currency.
    pub base_qty: f64,
}

impl DepthOrder {
    /// Creates a new depth order.
    #[inline]
    #[must_use]
    pub const fn new(price: f64, base_qty: f64) -> Self {
        Self { price, base_qty }
    }
}

impl fmt::Display for DepthOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.base_qty, self.price)
    }
}
