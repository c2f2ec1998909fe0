//! # Infrastructure Layer
//!
//! External adapters and implementations of domain ports.
//!
//! ## Persistence
//!
//! Repository implementations:
//! - PostgreSQL order-book repository over the `depth_order` composite type
//! - ClickHouse history order repository
//! - In-memory repositories for testing
//! - The array literal codec shared by both

pub mod persistence;

pub use persistence as repos;
