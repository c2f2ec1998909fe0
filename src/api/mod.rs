//! # API Layer
//!
//! External interfaces for the market info storage service.
//!
//! ## Protocols
//!
//! - **REST**: Order book snapshots and client order history

pub mod rest;

pub use rest as rest_api;
