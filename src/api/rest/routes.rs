//! # REST Routes
//!
//! Route definitions for REST API.
//!
//! # Route Structure
//!
//! ```text
//! /api/v1
//! ├── /health                                          GET  - Health check
//! ├── /exchanges/{exchange}/pairs/{pair}/order-book    PUT  - Save order book
//! │                                                    GET  - Get order book
//! ├── /order-history                                   POST - Save history order
//! │                                                    GET  - List history orders
//! ├── /swagger                                         GET  - Swagger UI
//! └── /openapi.json                                    GET  - OpenAPI document
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use market_info_storage::api::rest::routes::create_router;
//!
//! let router = create_router(state, Duration::from_secs(4));
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, router).await?;
//! ```

use crate::api::rest::handlers::{
    self, AppState, ErrorResponse, HealthResponse, HistoryOrderToSave, OrderBookBody,
    OrderHistoryResponse, SaveHistoryOrderRequest, get_history_orders, get_order_book,
    health_check, save_history_order, save_order_book,
};
use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::DepthOrder;
use axum::http::StatusCode;
use axum::{Router, routing::get, routing::put};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI document of the REST API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::save_order_book,
        handlers::get_order_book,
        handlers::save_history_order,
        handlers::get_history_orders
    ),
    components(schemas(
        DepthOrder,
        OrderBookBody,
        HistoryOrder,
        HistoryOrderToSave,
        SaveHistoryOrderRequest,
        OrderHistoryResponse,
        HealthResponse,
        ErrorResponse
    )),
    tags(
        (name = "order-books", description = "Order book snapshots per exchange pair"),
        (name = "order-history", description = "Client order history"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

fn api_v1() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/exchanges/{exchange}/pairs/{pair}/order-book",
            put(save_order_book).get(get_order_book),
        )
        .route(
            "/order-history",
            get(get_history_orders).post(save_history_order),
        )
}

fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/api/v1/swagger").url("/api/v1/openapi.json", ApiDoc::openapi())
}

fn timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

/// Creates the REST API router with all endpoints.
///
/// # Arguments
///
/// * `state` - Shared application state containing services
/// * `request_timeout` - Upper bound on the duration of one request
#[must_use]
pub fn create_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", api_v1())
        .merge(swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(timeout_layer(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Creates a minimal router for testing without middleware.
#[cfg(test)]
pub fn create_test_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api/v1", api_v1())
        .merge(swagger_ui())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::services::{OrderBookService, OrderHistoryService};
    use crate::infrastructure::persistence::in_memory::{
        InMemoryHistoryOrderRepository, InMemoryOrderBookRepository,
    };
    use axum::body::Body;
    use axum::http::{Request, header};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOOK_URI: &str = "/api/v1/exchanges/bybit/pairs/MATIC_USDT/order-book";
    const HISTORY_URI: &str =
        "/api/v1/order-history?client-name=John%20Doe&exchange=binance&label=My%20Order&pair=BTCUSDT";

    fn test_router() -> Router {
        let state = AppState {
            order_book_service: OrderBookService::new(Arc::new(
                InMemoryOrderBookRepository::new(),
            )),
            order_history_service: OrderHistoryService::new(Arc::new(
                InMemoryHistoryOrderRepository::new(),
            )),
        };
        create_test_router(Arc::new(state))
    }

    fn json_request(method: &str, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn history_body() -> serde_json::Value {
        serde_json::json!({
            "historyOrder": {
                "side": "buy",
                "type": "market",
                "baseQty": 10.0,
                "price": 100.0,
                "algorithmNamePlaced": "MyAlgorithm",
                "lowestSellPrc": 99.0,
                "highestBuyPrc": 101.0,
                "commissionQuoteQty": 0.1,
                "timePlaced": "2024-03-01T12:00:00Z"
            }
        })
    }

    #[tokio::test]
    async fn health_check_endpoint() {
        let response = test_router()
            .oneshot(get_request("/api/v1/health"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_endpoints() {
        let response = test_router()
            .oneshot(get_request("/api/v1/openapi.json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let paths = json["paths"].as_object().unwrap();
        let book = &paths["/api/v1/exchanges/{exchange}/pairs/{pair}/order-book"];
        assert!(book.get("put").is_some());
        assert!(book.get("get").is_some());
        let history = &paths["/api/v1/order-history"];
        assert!(history.get("post").is_some());
        assert!(history.get("get").is_some());
        assert!(json["components"]["schemas"].get("DepthOrder").is_some());
    }

    #[tokio::test]
    async fn slow_request_times_out_with_408() {
        let router = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "done"
                }),
            )
            .layer(timeout_layer(Duration::from_millis(10)));

        let response = router.oneshot(get_request("/slow")).await.unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[tokio::test]
    async fn order_book_put_then_get() {
        let router = test_router();
        let book = serde_json::json!({
            "order_book": [
                {"price": 0.53, "baseQty": 1.5},
                {"price": 0.52, "baseQty": 2.0},
                {"price": 0.54, "baseQty": 1.1},
                {"price": 0.55, "baseQty": 0.9}
            ]
        });

        let response = router
            .clone()
            .oneshot(json_request("PUT", BOOK_URI, &book))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get_request(BOOK_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, book);
    }

    #[tokio::test]
    async fn order_book_odd_length_is_bad_request() {
        let book = serde_json::json!({
            "order_book": [
                {"price": 1.0, "baseQty": 1.0},
                {"price": 2.0, "baseQty": 1.0},
                {"price": 3.0, "baseQty": 1.0}
            ]
        });

        let response = test_router()
            .oneshot(json_request("PUT", BOOK_URI, &book))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn order_book_malformed_body_is_bad_request() {
        let response = test_router()
            .oneshot(json_request(
                "PUT",
                BOOK_URI,
                &serde_json::json!({"orders": []}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn order_book_missing_is_not_found() {
        let response = test_router().oneshot(get_request(BOOK_URI)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn order_history_post_then_get() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(json_request("POST", HISTORY_URI, &history_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(get_request(HISTORY_URI)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let orders = json["orders"].as_array().unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0]["clientName"], "John Doe");
        assert_eq!(orders[0]["label"], "My Order");
        assert_eq!(orders[0]["type"], "market");
    }

    #[tokio::test]
    async fn order_history_empty_is_empty_list() {
        let response = test_router().oneshot(get_request(HISTORY_URI)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"orders": []})
        );
    }

    #[tokio::test]
    async fn order_history_missing_query_parameter_is_bad_request() {
        let response = test_router()
            .oneshot(get_request(
                "/api/v1/order-history?client-name=John&exchange=binance&pair=BTCUSDT",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn order_history_post_missing_field_is_bad_request() {
        let mut body = history_body();
        body["historyOrder"]
            .as_object_mut()
            .unwrap()
            .remove("timePlaced");

        let response = test_router()
            .oneshot(json_request("POST", HISTORY_URI, &body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn order_history_post_empty_query_value_is_bad_request() {
        let response = test_router()
            .oneshot(json_request(
                "POST",
                "/api/v1/order-history?client-name=&exchange=binance&label=x&pair=BTCUSDT",
                &history_body(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
