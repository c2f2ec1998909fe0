//! # Market Info Storage
//!
//! Storage service for exchange order-book snapshots and client order
//! history, backed by PostgreSQL.
//!
//! ## Architecture
//!
//! This crate follows a layered architecture:
//!
//! - **Domain Layer** (`domain`): Depth orders, order books, clients and history orders
//! - **Application Layer** (`application`): Services and error translation
//! - **Infrastructure Layer** (`infrastructure`): Repositories and the `depth_order[]` codec
//! - **API Layer** (`api`): REST interface
//!
//! Configuration lives in [`config`]; [`app`] wires everything together.
//!
//! ## Example
//!
//! ```rust,ignore
//! use market_info_storage::app::AppContext;
//! use market_info_storage::config::AppConfig;
//!
//! let context = AppContext::connect(AppConfig::load()?).await?;
//! let orders = context
//!     .state()
//!     .order_book_service
//!     .get_order_book("bybit", "MATIC_USDT")
//!     .await?;
//! ```

#![warn(missing_docs)]

pub mod api;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
