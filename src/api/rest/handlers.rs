//! # REST Handlers
//!
//! Request handlers for REST endpoints.
//!
//! # Endpoints
//!
//! ## Order Books
//! - `PUT /api/v1/exchanges/{exchange}/pairs/{pair}/order-book` - Save order book
//! - `GET /api/v1/exchanges/{exchange}/pairs/{pair}/order-book` - Get order book
//!
//! ## Order History
//! - `POST /api/v1/order-history` - Save history order
//! - `GET /api/v1/order-history` - List history orders of a client

use crate::application::error::ApplicationError;
use crate::application::services::{OrderBookService, OrderHistoryService};
use crate::domain::entities::HistoryOrder;
use crate::domain::value_objects::{Client, DepthOrder};
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Result type for REST handlers.
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for REST handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Order book service.
    pub order_book_service: OrderBookService,
    /// Order history service.
    pub order_history_service: OrderHistoryService,
}

// ============================================================================
// Error Response
// ============================================================================

/// Standard error response format.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Creates a new error response.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<ApplicationError> for (StatusCode, Json<ErrorResponse>) {
    fn from(err: ApplicationError) -> Self {
        match &err {
            ApplicationError::Validation(_) => validation_error(&err.to_string()),
            ApplicationError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("NOT_FOUND", err.to_string())),
            ),
            ApplicationError::Format { .. } | ApplicationError::Execution { .. } => internal_error(),
        }
    }
}

// ============================================================================
// Order Book DTOs
// ============================================================================

/// Combined order book: bids first, then asks, in equal halves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderBookBody {
    /// Price levels.
    pub order_book: Vec<DepthOrder>,
}

// ============================================================================
// Order History DTOs
// ============================================================================

/// Client filter carried in the query string.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientQuery {
    /// Client name.
    pub client_name: String,
    /// Exchange name.
    pub exchange: String,
    /// Client label.
    pub label: String,
    /// Currency pair.
    pub pair: String,
}

impl From<ClientQuery> for Client {
    fn from(query: ClientQuery) -> Self {
        Self::new(query.client_name, query.exchange, query.label, query.pair)
    }
}

/// Order details of a history order; the client comes from the query.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryOrderToSave {
    /// Order side.
    pub side: String,
    /// Order type.
    #[serde(rename = "type")]
    pub order_type: String,
    /// Quantity in base currency.
    pub base_qty: f64,
    /// Order price.
    pub price: f64,
    /// Algorithm that placed the order.
    pub algorithm_name_placed: String,
    /// Lowest sell price at placement.
    pub lowest_sell_prc: f64,
    /// Highest buy price at placement.
    pub highest_buy_prc: f64,
    /// Commission in quote currency.
    pub commission_quote_qty: f64,
    /// Placement time.
    pub time_placed: DateTime<Utc>,
}

impl HistoryOrderToSave {
    /// Checks that the text fields are non-empty.
    ///
    /// # Errors
    ///
    /// Returns the name of the first empty field.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("side", &self.side),
            ("type", &self.order_type),
            ("algorithmNamePlaced", &self.algorithm_name_placed),
        ];
        match fields.iter().find(|(_, value)| value.is_empty()) {
            Some((name, _)) => Err(format!("{name} is required")),
            None => Ok(()),
        }
    }

    /// Attaches the order to `client`.
    #[must_use]
    pub fn into_history_order(self, client: Client) -> HistoryOrder {
        HistoryOrder {
            client_name: client.client_name,
            exchange_name: client.exchange_name,
            label: client.label,
            pair: client.pair,
            side: self.side,
            order_type: self.order_type,
            base_qty: self.base_qty,
            price: self.price,
            algorithm_name_placed: self.algorithm_name_placed,
            lowest_sell_prc: self.lowest_sell_prc,
            highest_buy_prc: self.highest_buy_prc,
            commission_quote_qty: self.commission_quote_qty,
            time_placed: self.time_placed,
        }
    }
}

/// Request body for saving a history order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SaveHistoryOrderRequest {
    /// The order to save.
    #[serde(rename = "historyOrder")]
    pub history_order: HistoryOrderToSave,
}

/// Response listing a client's history orders.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderHistoryResponse {
    /// Orders, oldest first.
    pub orders: Vec<HistoryOrder>,
}

// ============================================================================
// Order Book Handlers
// ============================================================================

/// Save the order book of an exchange pair.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the body is malformed or has odd length.
/// Returns `INTERNAL_ERROR` if storage fails.
#[utoipa::path(
    put,
    path = "/api/v1/exchanges/{exchange}/pairs/{pair}/order-book",
    tag = "order-books",
    params(
        ("exchange" = String, Path, description = "Exchange name"),
        ("pair" = String, Path, description = "Currency pair")
    ),
    request_body = OrderBookBody,
    responses(
        (status = 200, description = "Order book saved"),
        (status = 400, description = "Invalid order book", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state, payload))]
pub async fn save_order_book(
    State(state): State<Arc<AppState>>,
    Path((exchange, pair)): Path<(String, String)>,
    payload: Result<Json<OrderBookBody>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(body) = payload.map_err(|e| body_error(&e))?;

    if body.order_book.len() % 2 != 0 {
        return Err(validation_error(&format!(
            "order_book must have even length, got {}",
            body.order_book.len()
        )));
    }

    state
        .order_book_service
        .save_order_book(&exchange, &pair, body.order_book)
        .await?;

    Ok(StatusCode::OK)
}

/// Get the order book of an exchange pair.
///
/// # Errors
///
/// Returns `NOT_FOUND` if no order book was saved for the pair.
/// Returns `INTERNAL_ERROR` if storage fails.
#[utoipa::path(
    get,
    path = "/api/v1/exchanges/{exchange}/pairs/{pair}/order-book",
    tag = "order-books",
    params(
        ("exchange" = String, Path, description = "Exchange name"),
        ("pair" = String, Path, description = "Currency pair")
    ),
    responses(
        (status = 200, description = "Stored order book", body = OrderBookBody),
        (status = 404, description = "No order book for the pair", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_order_book(
    State(state): State<Arc<AppState>>,
    Path((exchange, pair)): Path<(String, String)>,
) -> ApiResult<Json<OrderBookBody>> {
    let order_book = state
        .order_book_service
        .get_order_book(&exchange, &pair)
        .await?;

    debug!(levels = order_book.len(), "Order book loaded");
    Ok(Json(OrderBookBody { order_book }))
}

// ============================================================================
// Order History Handlers
// ============================================================================

/// Save a history order for the client named in the query.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the query or body is invalid.
/// Returns `INTERNAL_ERROR` if storage fails.
#[utoipa::path(
    post,
    path = "/api/v1/order-history",
    tag = "order-history",
    params(
        ("client-name" = String, Query, description = "Client name"),
        ("exchange" = String, Query, description = "Exchange name"),
        ("label" = String, Query, description = "Client label"),
        ("pair" = String, Query, description = "Currency pair")
    ),
    request_body = SaveHistoryOrderRequest,
    responses(
        (status = 200, description = "History order saved"),
        (status = 400, description = "Invalid query or body", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn save_history_order(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ClientQuery>, QueryRejection>,
    payload: Result<Json<SaveHistoryOrderRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Query(query) = query.map_err(|e| query_error(&e))?;
    let Json(request) = payload.map_err(|e| body_error(&e))?;
    request
        .history_order
        .validate()
        .map_err(|e| validation_error(&format!("parse and validate json body: {e}")))?;

    let order = request.history_order.into_history_order(query.into());
    state
        .order_history_service
        .save_history_order(&order)
        .await?;

    Ok(StatusCode::OK)
}

/// List the history orders of the client named in the query.
///
/// # Errors
///
/// Returns `VALIDATION_ERROR` if the query is invalid.
/// Returns `INTERNAL_ERROR` if storage fails.
#[utoipa::path(
    get,
    path = "/api/v1/order-history",
    tag = "order-history",
    params(
        ("client-name" = String, Query, description = "Client name"),
        ("exchange" = String, Query, description = "Exchange name"),
        ("label" = String, Query, description = "Client label"),
        ("pair" = String, Query, description = "Currency pair")
    ),
    responses(
        (status = 200, description = "History orders, oldest first", body = OrderHistoryResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
#[instrument(skip_all)]
pub async fn get_history_orders(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ClientQuery>, QueryRejection>,
) -> ApiResult<Json<OrderHistoryResponse>> {
    let Query(query) = query.map_err(|e| query_error(&e))?;
    let client = Client::from(query);

    let orders = state
        .order_history_service
        .get_history_orders_by_client(&client)
        .await?;

    debug!(count = orders.len(), "History orders loaded");
    Ok(Json(OrderHistoryResponse { orders }))
}

// ============================================================================
// Health Check
// ============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Helper Functions
// ============================================================================

fn validation_error(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new("VALIDATION_ERROR", message)),
    )
}

fn body_error(rejection: &JsonRejection) -> ApiError {
    validation_error(&format!(
        "parse and validate json body: {}",
        rejection.body_text()
    ))
}

fn query_error(rejection: &QueryRejection) -> ApiError {
    validation_error(&format!(
        "parse and validate query: {}",
        rejection.body_text()
    ))
}

fn internal_error() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("INTERNAL_ERROR", "internal server error")),
    )
}
