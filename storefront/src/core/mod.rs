//! # Core Abstractions
//!
//! Core traits and error types for dependency injection and better testability.
//!
//! ## Modules
//!
//! - **[`error`]**: Application error types (`AppError`, `ErrorKind`, `Result<T>`)
//! - **[`service`]**: Service traits (`ApiService`, `MessageSigner`, `TokenStore`)
//!
//! ## Dependency Injection
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use storefront::core::service::ApiService;
//! use storefront::services::api::ApiClient;
//!
//! let api: Arc<dyn ApiService> = Arc::new(ApiClient::new("http://localhost:3000").unwrap());
//! ```

pub mod error;
pub mod service;

#[cfg(test)]
pub(crate) mod mock;

pub use error::{AppError, ErrorKind, Result};
pub use service::{ApiService, MessageSigner, TokenStore};
