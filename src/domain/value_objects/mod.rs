//! # Value Objects
//!
//! Immutable types with domain semantics.
//!
//! ## Market Data
//!
//! - [`DepthOrder`]: A single price level
//! - [`OrderBook`]: Bid/ask halves of an order-book snapshot
//!
//! ## Identity Types
//!
//! - [`Client`]: Owner of history orders

pub mod client;
pub mod depth_order;
pub mod order_book;


pub use client::Client;
pub use depth_order::DepthOrder;
pub use order_book::OrderBook;
