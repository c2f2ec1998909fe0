//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! Every [`DomainError`] describes input that breaks a domain rule; the
//! application layer reports all of them as validation failures.
//!
//! # Examples
//!
//! ```
//! use market_info_storage::domain::errors::DomainError;
//!
//! let error = DomainError::OddOrderBookLength(5);
//! assert_eq!(
//!     error.to_string(),
//!     "order book should have even number of entries, got 5"
//! );
//! ```

use thiserror::Error;

/// Domain-level validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A combined order book must hold as many bids as asks.
    #[error("order book should have even number of entries, got {0}")]
    OddOrderBookLength(usize),

    /// A combined order book holds more levels than one snapshot can store.
    #[error("order book has {len} entries, at most {max} are allowed")]
    OrderBookTooLarge {
        /// Number of levels supplied.
        len: usize,
        /// Largest accepted number of levels.
        max: usize,
    },

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
