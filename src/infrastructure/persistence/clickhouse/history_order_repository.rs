//! # ClickHouse History Order Repository
//!
//! ClickHouse implementation of [`HistoryOrderRepository`].
//!
//! `time_placed` is stored as `DateTime64(3, 'UTC')`, so timestamps keep
//! millisecond precision.

use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::Client;
use crate::infrastructure::persistence::traits::{
    HistoryOrderRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use chrono::DateTime;
use clickhouse::Row;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Table holding the history orders.
pub const HISTORY_ORDERS_TABLE: &str = "history_orders";

const SELECT_BY_CLIENT: &str = "SELECT ?fields FROM history_orders \
     WHERE client_name = ? AND exchange_name = ? AND label = ? AND pair = ? \
     ORDER BY time_placed ASC";

/// ClickHouse implementation of [`HistoryOrderRepository`].
///
/// The underlying HTTP client pools its connections and is cheap to clone.
#[derive(Clone)]
pub struct ClickHouseHistoryOrderRepository {
    client: clickhouse::Client,
}

impl std::fmt::Debug for ClickHouseHistoryOrderRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseHistoryOrderRepository")
            .finish_non_exhaustive()
    }
}

impl ClickHouseHistoryOrderRepository {
    /// Creates a new repository on `client`.
    #[must_use]
    pub fn new(client: clickhouse::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HistoryOrderRepository for ClickHouseHistoryOrderRepository {
    async fn save(&self, order: &HistoryOrder) -> RepositoryResult<()> {
        let row = HistoryOrderRow::from(order);
        let mut insert = self.client.insert::<HistoryOrderRow>(HISTORY_ORDERS_TABLE)?;
        insert.write(&row).await?;
        insert.end().await?;
        debug!(client_name = %order.client_name, pair = %order.pair, "history order inserted");
        Ok(())
    }

    async fn find_by_client(&self, client: &Client) -> RepositoryResult<Vec<HistoryOrder>> {
        let rows = self
            .client
            .query(SELECT_BY_CLIENT)
            .bind(client.client_name.as_str())
            .bind(client.exchange_name.as_str())
            .bind(client.label.as_str())
            .bind(client.pair.as_str())
            .fetch_all::<HistoryOrderRow>()
            .await?;

        rows.into_iter().map(HistoryOrder::try_from).collect()
    }
}

/// Row layout of the `history_orders` table.
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub(crate) struct HistoryOrderRow {
    client_name: String,
    exchange_name: String,
    label: String,
    pair: String,
    side: String,
    #[serde(rename = "type")]
    order_type: String,
    base_qty: f64,
    price: f64,
    algorithm_name_placed: String,
    lowest_sell_prc: f64,
    highest_buy_prc: f64,
    commission_quote_qty: f64,
    /// Milliseconds since the Unix epoch.
    time_placed: i64,
}

impl From<&HistoryOrder> for HistoryOrderRow {
    fn from(order: &HistoryOrder) -> Self {
        Self {
            client_name: order.client_name.clone(),
            exchange_name: order.exchange_name.clone(),
            label: order.label.clone(),
            pair: order.pair.clone(),
            side: order.side.clone(),
            order_type: order.order_type.clone(),
            base_qty: order.base_qty,
            price: order.price,
            algorithm_name_placed: order.algorithm_name_placed.clone(),
            lowest_sell_prc: order.lowest_sell_prc,
            highest_buy_prc: order.highest_buy_prc,
            commission_quote_qty: order.commission_quote_qty,
            time_placed: order.time_placed.timestamp_millis(),
        }
    }
}

impl TryFrom<HistoryOrderRow> for HistoryOrder {
    type Error = RepositoryError;

    fn try_from(row: HistoryOrderRow) -> Result<Self, Self::Error> {
        let time_placed = DateTime::from_timestamp_millis(row.time_placed).ok_or_else(|| {
            RepositoryError::format(format!(
                "time_placed {} ms is out of range",
                row.time_placed
            ))
        })?;

        Ok(Self {
            client_name: row.client_name,
            exchange_name: row.exchange_name,
            label: row.label,
            pair: row.pair,
            side: row.side,
            order_type: row.order_type,
            base_qty: row.base_qty,
            price: row.price,
            algorithm_name_placed: row.algorithm_name_placed,
            lowest_sell_prc: row.lowest_sell_prc,
            highest_buy_prc: row.highest_buy_prc,
            commission_quote_qty: row.commission_quote_qty,
            time_placed,
        })
    }
}
