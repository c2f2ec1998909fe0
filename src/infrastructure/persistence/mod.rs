//! # Persistence Layer
//!
//! Repository ports and the `depth_order[]` codec.
//!
//! Order books live in PostgreSQL and history orders in ClickHouse. Both
//! ports also have in-memory implementations.

pub mod clickhouse;
pub mod codec;
pub mod in_memory;
pub mod postgres;
pub mod traits;

pub use traits::{
    HistoryOrderRepository, OrderBookRepository, RepositoryError, RepositoryResult,
};
