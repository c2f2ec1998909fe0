//! End-to-end tests of the HTTP surface over in-memory storage.
//!
//! The full middleware stack from [`AppContext::router`] is exercised.

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use market_info_storage::app::AppContext;
use market_info_storage::config::AppConfig;
use serde_json::{Value, json};
use tower::ServiceExt;

fn router() -> Router {
    AppContext::in_memory(AppConfig::default()).router()
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn book(levels: &[(f64, f64)]) -> Value {
    let orders: Vec<Value> = levels
        .iter()
        .map(|(price, qty)| json!({"price": price, "baseQty": qty}))
        .collect();
    json!({ "order_book": orders })
}

#[tokio::test]
async fn order_book_lifecycle() {
    let router = router();
    let uri = "/api/v1/exchanges/bybit/pairs/MATIC_USDT/order-book";

    let (status, body) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let first = book(&[(0.53, 1.5), (0.52, 2.5), (0.54, 1.25), (0.55, 0.75)]);
    let (status, _) = send(&router, "PUT", uri, Some(first.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, first);

    let second = book(&[(0.6, 3.0), (0.61, 4.0)]);
    let (status, _) = send(&router, "PUT", uri, Some(second.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&router, "GET", uri, None).await;
    assert_eq!(body, second);
}

#[tokio::test]
async fn order_books_are_keyed_by_exchange_and_pair() {
    let router = router();
    let bybit = "/api/v1/exchanges/bybit/pairs/SOL_USDT/order-book";
    let binance = "/api/v1/exchanges/binance/pairs/SOL_USDT/order-book";

    send(&router, "PUT", bybit, Some(book(&[(1.0, 1.0), (2.0, 2.0)]))).await;

    let (status, _) = send(&router, "GET", binance, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn odd_order_book_is_rejected_and_not_stored() {
    let router = router();
    let uri = "/api/v1/exchanges/bybit/pairs/SOL_USDT/order-book";

    let odd = book(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (4.0, 4.0), (5.0, 5.0)]);
    let (status, body) = send(&router, "PUT", uri, Some(odd)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_order_book_is_stored() {
    let router = router();
    let uri = "/api/v1/exchanges/bybit/pairs/SOL_USDT/order-book";

    let (status, _) = send(&router, "PUT", uri, Some(book(&[]))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&router, "GET", uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"order_book": []}));
}

#[tokio::test]
async fn order_history_is_filtered_by_client() {
    let router = router();
    let order = |side: &str, time: &str| {
        json!({
            "historyOrder": {
                "side": side,
                "type": "limit",
                "baseQty": 1.0,
                "price": 42000.0,
                "algorithmNamePlaced": "Grid",
                "lowestSellPrc": 42001.0,
                "highestBuyPrc": 41999.0,
                "commissionQuoteQty": 0.042,
                "timePlaced": time
            }
        })
    };
    let alice = "/api/v1/order-history?client-name=alice&exchange=binance&label=grid&pair=BTCUSDT";
    let bob = "/api/v1/order-history?client-name=bob&exchange=binance&label=grid&pair=BTCUSDT";

    send(&router, "POST", alice, Some(order("sell", "2024-03-01T12:05:00Z"))).await;
    send(&router, "POST", alice, Some(order("buy", "2024-03-01T12:00:00Z"))).await;
    send(&router, "POST", bob, Some(order("buy", "2024-03-01T12:01:00Z"))).await;

    let (status, body) = send(&router, "GET", alice, None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["side"], "buy");
    assert_eq!(orders[1]["side"], "sell");
    assert!(orders.iter().all(|o| o["clientName"] == "alice"));
}

#[tokio::test]
async fn order_history_requires_every_query_parameter() {
    let router = router();

    let (status, body) = send(
        &router,
        "GET",
        "/api/v1/order-history?client-name=alice&label=grid&pair=BTCUSDT",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}
