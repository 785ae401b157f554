//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the storefront client and the
//! storefront REST API. All DTOs use JSON serialization via `serde`.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Nonce, wallet verification and profile DTOs
//!   - **[`dto::catalog`]**: Stores, products and categories
//!   - **[`dto::cart`]**: Add-to-cart request
//!   - **[`dto::search`]**: Search results
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format wallet addresses for display
//!   - **[`utils::normalize_upload_path`]**: Canonical `/Uploads/...` image paths
//!
//! ## Wire Format
//!
//! The storefront API is a JavaScript backend, so unlike the default serde
//! behavior the DTOs here use **camelCase** field names and MongoDB-style
//! `_id` identifiers. Most listing endpoints wrap their payload in an
//! [`ApiEnvelope`]:
//!
//! ```text
//! { "success": true, "data": [ ... ] }
//! { "success": false, "error": "Store not found" }
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shared::dto::catalog::Store;
//! use shared::ApiEnvelope;
//!
//! let body = r#"{"success":true,"data":[{"_id":"s1","name":"Kara Shop"}]}"#;
//! let envelope: ApiEnvelope<Vec<Store>> = serde_json::from_str(body).unwrap();
//! assert_eq!(envelope.into_data().len(), 1);
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
