//! # REST API
//!
//! HTTP endpoints for order books and order history, built on axum.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, ErrorResponse};
pub use routes::create_router;
