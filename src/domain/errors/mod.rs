//! # Domain Errors
//!
//! Typed error types for domain operations.
//!
//! # Examples
//!
//! ```
//! use market_info_storage::domain::errors::{DomainError, DomainResult};
//!
//! fn check_levels(len: usize) -> DomainResult<usize> {
//!     if len % 2 != 0 {
//!         return Err(DomainError::OddOrderBookLength(len));
//!     }
//!     Ok(len / 2)
//! }
//!
//! assert_eq!(check_levels(4), Ok(2));
//! assert!(check_levels(5).is_err());
//! ```

pub mod domain_error;

pub use domain_error::{DomainError, DomainResult};
