//! # History Order Entity
//!
//! A placed order recorded for later analysis.

use crate::domain::value_objects::Client;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// An order placed by a client's algorithm, as recorded in the history.
///
/// History orders are append-only: they are inserted once and never
/// updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOrder {
    /// Client that placed the order.
    pub client_name: String,
    /// Exchange the order was placed on.
    pub exchange_name: String,
    /// Client label.
    pub label: String,
    /// Currency pair.
    pub pair: String,
    /// Order side (e.g. `buy`, `sell`).
    pub side: String,
    /// Order type (e.g. `market`, `limit`).
    #[serde(rename = "type")]
    pub order_type: String,
    /// Quantity in base currency.
    pub base_qty: f64,
    /// Order price.
    pub price: f64,
    /// Name of the algorithm that placed the order.
    pub algorithm_name_placed: String,
    /// Lowest ask at placement time.
    pub lowest_sell_prc: f64,
    /// Highest bid at placement time.
    pub highest_buy_prc: f64,
    /// Commission paid, in quote currency.
    pub commission_quote_qty: f64,
    /// Placement time.
    pub time_placed: DateTime<Utc>,
}

impl HistoryOrder {
    /// Returns the client this order belongs to.
    #[must_use]
    pub fn client(&self) -> Client {
        Client::new(
            &self.client_name,
            &self.exchange_name,
            &self.label,
            &self.pair,
        )
    }

    /// Returns true if the order belongs to `client`.
    #[must_use]
    pub fn belongs_to(&self, client: &Client) -> bool {
        self.client_name == client.client_name
            && self.exchange_name == client.exchange_name
            && self.label == client.label
            && self.pair == client.pair
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_order(client: &Client, side: &str) -> HistoryOrder {
        HistoryOrder {
            client_name: client.client_name.clone(),
            exchange_name: client.exchange_name.clone(),
            label: client.label.clone(),
            pair: client.pair.clone(),
            side: side.to_string(),
            order_type: "market".to_string(),
            base_qty: 10.0,
            price: 100.0,
            algorithm_name_placed: "MyAlgorithm".to_string(),
            lowest_sell_prc: 99.0,
            highest_buy_prc: 101.0,
            commission_quote_qty: 0.1,
            time_placed: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn json_uses_camel_case_and_type_keyword() {
        let client = Client::new("John Doe", "binance", "My Order", "BTCUSDT");
        let json = serde_json::to_value(sample_order(&client, "buy")).unwrap();

        assert_eq!(json["clientName"], "John Doe");
        assert_eq!(json["type"], "market");
        assert_eq!(json["algorithmNamePlaced"], "MyAlgorithm");
        assert_eq!(json["timePlaced"], "2024-03-01T12:00:00Z");
    }

    #[test]
    fn belongs_to_matches_all_fields() {
        let client = Client::new("John Doe", "binance", "My Order", "BTCUSDT");
        let order = sample_order(&client, "sell");

        assert!(order.belongs_to(&client));
        assert_eq!(order.client(), client);

        let other = Client::new("John Doe", "binance", "Other", "BTCUSDT");
        assert!(!order.belongs_to(&other));
    }
}
