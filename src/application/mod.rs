//! # Application Layer
//!
//! Application services coordinating domain rules and repositories.
//!
//! ## Services
//!
//! - [`OrderBookService`]: Split/merge of combined order books around storage
//! - [`OrderHistoryService`]: Append and query client order history

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{OrderBookService, OrderHistoryService};
