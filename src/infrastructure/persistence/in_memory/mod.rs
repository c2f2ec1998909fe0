//! # In-Memory Repositories
//!
//! In-memory implementations of repository traits for testing and local
//! development.
//!
//! These implementations use thread-safe `HashMap` storage and are
//! suitable for unit tests without database dependencies.

pub mod history_order_repository;
pub mod order_book_repository;

pub use history_order_repository::InMemoryHistoryOrderRepository;
pub use order_book_repository::InMemoryOrderBookRepository;
