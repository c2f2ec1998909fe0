//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Services translate repository and domain failures into these kinds,
//! attaching the operation they were performing. [`ApplicationError::NotFound`]
//! is kept distinct so callers can match on it.

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::traits::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    /// The requested record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input violated a precondition.
    #[error("validation error: {0}")]
    Validation(String),

    /// Stored data could not be decoded.
    #[error("{context}: format error: {message}")]
    Format {
        /// Operation being performed.
        context: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// The store failed to execute the operation.
    #[error("{context}: {message}")]
    Execution {
        /// Operation being performed.
        context: &'static str,
        /// Underlying error message.
        message: String,
    },
}

impl ApplicationError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Wraps a repository error with the operation it interrupted.
    ///
    /// [`RepositoryError::NotFound`] becomes [`ApplicationError::NotFound`]
    /// without context.
    #[must_use]
    pub fn from_repository(context: &'static str, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { .. } => Self::NotFound(err.to_string()),
            RepositoryError::Format(message) => Self::Format { context, message },
            RepositoryError::Query(_) | RepositoryError::Connection(_) => Self::Execution {
                context,
                message: err.to_string(),
            },
        }
    }

    /// Returns true if the requested record does not exist.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if the caller supplied invalid input.
    #[inline]
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
