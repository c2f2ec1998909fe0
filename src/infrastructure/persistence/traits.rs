//! # Repository Traits
//!
//! Port definitions for order-book and order-history persistence.
//!
//! Implementations return errors without logging them; the application
//! services are the single place where failures are logged.
//!
//! # Examples
//!
//! ```ignore
//! use market_info_storage::infrastructure::persistence::traits::OrderBookRepository;
//!
//! repository.save("bybit", "MATIC_USDT", &bids, &asks).await?;
//! let book = repository.get("bybit", "MATIC_USDT").await?;
//! ```

use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::{Client, DepthOrder, OrderBook};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Error type for repository operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// No record exists for the requested key.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Entity type name.
        entity: &'static str,
        /// Lookup key.
        key: String,
    },

    /// The store returned data that could not be decoded.
    #[error("format error: {0}")]
    Format(String),

    /// Statement build or execution failure.
    #[error("query error: {0}")]
    Query(String),

    /// The store could not be reached.
    #[error("connection error: {0}")]
    Connection(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Creates a format error.
    #[must_use]
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Returns true if no record exists for the requested key.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::connection(err.to_string()),
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::format(err.to_string())
            }
            _ => Self::query(err.to_string()),
        }
    }
}

impl From<clickhouse::error::Error> for RepositoryError {
    fn from(err: clickhouse::error::Error) -> Self {
        use clickhouse::error::Error;
        match err {
            Error::Network(_) | Error::TimedOut => Self::connection(err.to_string()),
            Error::NotEnoughData
            | Error::InvalidUtf8Encoding(_)
            | Error::InvalidTagEncoding(_) => Self::format(err.to_string()),
            _ => Self::query(err.to_string()),
        }
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ============================================================================
// Order Book Repository
// ============================================================================

/// Repository for order-book snapshots keyed by `(exchange, pair)`.
#[async_trait]
pub trait OrderBookRepository: Send + Sync + fmt::Debug {
    /// Stores the snapshot for `(exchange, pair)`, fully replacing any
    /// previous bids and asks.
    ///
    /// Callers keep `bids.len() + asks.len()` within
    /// [`OrderBook::MAX_LEVELS`]; the PostgreSQL statement binds two
    /// parameters per level and cannot carry more.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    async fn save(
        &self,
        exchange: &str,
        pair: &str,
        bids: &[DepthOrder],
        asks: &[DepthOrder],
    ) -> RepositoryResult<()>;

    /// Loads the snapshot for `(exchange, pair)`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if no snapshot exists,
    /// [`RepositoryError::Format`] if stored levels cannot be decoded.
    async fn get(&self, exchange: &str, pair: &str) -> RepositoryResult<OrderBook>;
}

// ============================================================================
// History Order Repository
// ============================================================================

/// Repository for append-only history orders.
#[async_trait]
pub trait HistoryOrderRepository: Send + Sync + fmt::Debug {
    /// Appends a history order.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    async fn save(&self, order: &HistoryOrder) -> RepositoryResult<()>;

    /// Returns every order of `client`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn find_by_client(&self, client: &Client) -> RepositoryResult<Vec<HistoryOrder>>;
}
