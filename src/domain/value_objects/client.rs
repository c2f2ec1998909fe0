//! # Client Value Object
//!
//! Identifies the owner of history orders.

use crate::domain::errors::{DomainError, DomainResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A trading client on one exchange pair, under a label.
///
/// All four fields are required; history queries match every one of
/// them exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Client {
    /// Client name.
    pub client_name: String,
    /// Exchange name.
    pub exchange_name: String,
    /// Free-form label chosen by the client.
    pub label: String,
    /// Currency pair.
    pub pair: String,
}

impl Client {
    /// Creates a new client filter.
    #[must_use]
    pub fn new(
        client_name: impl Into<String>,
        exchange_name: impl Into<String>,
        label: impl Into<String>,
        pair: impl Into<String>,
    ) -> Self {
        Self {
            client_name: client_name.into(),
            exchange_name: exchange_name.into(),
            label: label.into(),
            pair: pair.into(),
        }
    }

    /// Validates that every field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] naming the first empty field.
    pub fn validate(&self) -> DomainResult<()> {
        let fields = [
            ("client_name", &self.client_name),
            ("exchange_name", &self.exchange_name),
            ("label", &self.label),
            ("pair", &self.pair),
        ];
        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(DomainError::MissingField(name)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}/{}[{}]",
            self.client_name, self.exchange_name, self.pair, self.label
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_client_is_valid() {
        let client = Client::new("John Doe", "binance", "My Order", "BTCUSDT");
        assert!(client.validate().is_ok());
    }

    #[test]
    fn empty_field_is_reported() {
        let client = Client::new("John Doe", "binance", "", "BTCUSDT");
        assert_eq!(client.validate(), Err(DomainError::MissingField("label")));
    }

    #[test]
    fn display_includes_all_parts() {
        let client = Client::new("alice", "bybit", "grid", "SOL_USDT");
        assert_eq!(client.to_string(), "alice@bybit/SOL_USDT[grid]");
    }
}
