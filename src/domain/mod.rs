//! # Domain Layer
//!
//! Core business types, free of any storage or transport concern.
//!
//! This layer contains:
//! - **Entities**: History orders
//! - **Value Objects**: Depth orders, order books, clients
//! - **Errors**: Domain-specific error types

pub mod entities;
pub mod errors;
pub mod value_objects;
