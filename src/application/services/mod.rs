//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! Services are the only layer that logs failures. Each failure is logged
//! once with the operation it interrupted, except [`NotFound`] which is an
//! expected outcome and flows back to the caller silently.
//!
//! [`NotFound`]: crate::application::ApplicationError::NotFound

pub mod order_book_service;
pub mod order_history_service;


pub use order_book_service::OrderBookService;
pub use order_history_service::OrderHistoryService;
