//! # PostgreSQL Order Book Repository
//!
//! PostgreSQL implementation of [`OrderBookRepository`] using sqlx.
//!
//! Bids and asks live in two `depth_order[]` columns of the `order_books`
//! table, keyed uniquely by `(exchange, pair)`. A save is a single upsert
//! that replaces both columns; Postgres' statement atomicity is the only
//! transaction involved.

use crate::domain::value_objects::{DepthOrder, OrderBook};
use crate::infrastructure::persistence::codec::{self, push_array_expr};
use crate::infrastructure::persistence::traits::{
    OrderBookRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

/// Name of the composite type holding one price level.
pub const DEPTH_ORDER_TYPE: &str = "depth_order";

/// PostgreSQL implementation of [`OrderBookRepository`].
///
/// Uses connection pooling via `sqlx::PgPool`.
///
/// # Examples
///
/// ```ignore
/// use sqlx::PgPool;
/// use market_info_storage::infrastructure::persistence::postgres::PostgresOrderBookRepository;
///
/// let pool = PgPool::connect("postgres://...").await?;
/// let repo = PostgresOrderBookRepository::new(pool);
/// ```
#[derive(Debug, Clone)]
pub struct PostgresOrderBookRepository {
    pool: PgPool,
}

impl PostgresOrderBookRepository {
    /// Creates a new PostgreSQL order book repository.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Builds the upsert for one snapshot.
///
/// On a key conflict both array columns are overwritten with the new
/// values; individual levels are never merged.
pub(crate) fn build_upsert<'args>(
    exchange: &'args str,
    pair: &'args str,
    bids: &[DepthOrder],
    asks: &[DepthOrder],
) -> QueryBuilder<'args, Postgres> {
    let mut builder =
        QueryBuilder::new("INSERT INTO order_books (exchange, pair, bids, asks) VALUES (");
    builder.push_bind(exchange).push(", ").push_bind(pair).push(", ");
    push_array_expr(&mut builder, DEPTH_ORDER_TYPE, bids);
    builder.push(", ");
    push_array_expr(&mut builder, DEPTH_ORDER_TYPE, asks);
    builder.push(
        ") ON CONFLICT (exchange, pair) DO UPDATE SET bids = EXCLUDED.bids, asks = EXCLUDED.asks",
    );
    builder
}

#[async_trait]
impl OrderBookRepository for PostgresOrderBookRepository {
    async fn save(
        &self,
        exchange: &str,
        pair: &str,
        bids: &[DepthOrder],
        asks: &[DepthOrder],
    ) -> RepositoryResult<()> {
        let mut builder = build_upsert(exchange, pair, bids, asks);
        debug!(sql = builder.sql(), "SQL query");

        builder.build().execute(&self.pool).await?;

        Ok(())
    }

    async fn get(&self, exchange: &str, pair: &str) -> RepositoryResult<OrderBook> {
        let row: Option<OrderBookRow> = sqlx::query_as(
            r#"
            SELECT bids::text AS bids, asks::text AS asks
            FROM order_books
            WHERE exchange = $1 AND pair = $2
            "#,
        )
        .bind(exchange)
        .bind(pair)
        .fetch_optional(&self.pool)
        .await?;

        row.ok_or_else(|| RepositoryError::not_found("order book", format!("{exchange}/{pair}")))?
            .try_into_order_book()
    }
}

/// Row type for order book queries.
///
/// The array columns are selected as text and decoded by [`codec`].
#[derive(Debug, sqlx::FromRow)]
struct OrderBookRow {
    bids: Option<String>,
    asks: Option<String>,
}

impl OrderBookRow {
    /// Decodes both columns into an order book.
    fn try_into_order_book(self) -> RepositoryResult<OrderBook> {
        let bids = codec::decode_column(self.bids.as_deref())
            .map_err(|e| RepositoryError::format(format!("decode bids: {e}")))?;
        let asks = codec::decode_column(self.asks.as_deref())
            .map_err(|e| RepositoryError::format(format!("decode asks: {e}")))?;
        Ok(OrderBook::new(bids, asks))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn upsert_binds_every_value() {
        let bids = [DepthOrder::new(0.53, 1.5)];
        let asks = [DepthOrder::new(0.54, 1.1), DepthOrder::new(0.55, 0.9)];
        let builder = build_upsert("bybit", "MATIC_USDT", &bids, &asks);

        assert_eq!(
            builder.sql(),
            "INSERT INTO order_books (exchange, pair, bids, asks) VALUES ($1, $2, \
             ARRAY[ROW($3, $4)::depth_order]::depth_order[], \
             ARRAY[ROW($5, $6)::depth_order, ROW($7, $8)::depth_order]::depth_order[]) \
             ON CONFLICT (exchange, pair) DO UPDATE SET bids = EXCLUDED.bids, asks = EXCLUDED.asks"
        );
    }

    #[test]
    fn upsert_with_empty_book_keeps_typed_arrays() {
        let builder = build_upsert("bybit", "MATIC_USDT", &[], &[]);
        assert!(
            builder
                .sql()
                .contains("VALUES ($1, $2, ARRAY[]::depth_order[], ARRAY[]::depth_order[])")
        );
    }

    #[test]
    fn row_decodes_both_sides() {
        let row = OrderBookRow {
            bids: Some(r#"{"(0.010782342,24)"}"#.to_string()),
            asks: Some(r#"{"(0.010765101,11.5)"}"#.to_string()),
        };
        let book = row.try_into_order_book().unwrap();
        assert_eq!(book.bids(), &[DepthOrder::new(0.010782342, 24.0)]);
        assert_eq!(book.asks(), &[DepthOrder::new(0.010765101, 11.5)]);
    }

    #[test]
    fn row_with_malformed_column_is_format_error() {
        let row = OrderBookRow {
            bids: Some("{}".to_string()),
            asks: Some(r#"{"(oops,1)"}"#.to_string()),
        };
        let err = row.try_into_order_book().unwrap_err();
        assert!(matches!(err, RepositoryError::Format(ref msg) if msg.starts_with("decode asks")));
    }

    #[test]
    fn row_with_null_column_is_format_error() {
        let row = OrderBookRow {
            bids: None,
            asks: Some("{}".to_string()),
        };
        assert!(matches!(
            row.try_into_order_book(),
            Err(RepositoryError::Format(_))
        ));
    }
}
