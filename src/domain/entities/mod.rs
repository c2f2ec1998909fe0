//! # Domain Entities
//!
//! Records with a lifecycle of their own.
//!
//! - [`HistoryOrder`]: An order placed by a client's algorithm

pub mod history_order;

pub use history_order::HistoryOrder;
