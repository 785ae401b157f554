//! # Data Transfer Objects (DTOs)
//!
//! This module contains all data structures exchanged with the storefront API.
//!
//! ## Module Organization
//!
//! - [`auth`] - Nonce retrieval, wallet verification, user profile
//! - [`catalog`] - Stores, products, categories
//! - [`cart`] - Cart mutations
//! - [`search`] - Search results
//!
//! ## Example JSON Communication
//!
//! ```text
//! POST /user/connect-wallet
//! Content-Type: application/json
//!
//! {
//!   "walletAddress": "0xAbC0000000000000000000000000000000000001",
//!   "signature": "0x5f1c...",
//!   "message": "localhost:5173 wants you to sign in with your Ethereum account:\n..."
//! }
//! ```
//!
//! ```text
//! HTTP/1.1 200 OK
//! Content-Type: application/json
//!
//! { "success": true, "data": { "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9..." } }
//! ```

use serde::{Deserialize, Serialize};

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod search;

pub use auth::*;
pub use cart::*;
pub use catalog::*;
pub use search::*;

/// Standard `{ success, data, error, message }` response wrapper.
///
/// Every field is optional on the wire: a missing `success` reads as `false`
/// and a missing `data` as `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Best available server-provided failure text (`error`, then `message`).
    pub fn failure_reason(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

impl<T: Default> ApiEnvelope<T> {
    /// Payload, or `T::default()` when the server sent none.
    pub fn into_data(self) -> T {
        self.data.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_missing_fields_default() {
        let envelope: ApiEnvelope<Vec<String>> = serde_json::from_str("{}").unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.into_data().is_empty());
    }

    #[test]
    fn test_envelope_failure_reason_prefers_error() {
        let envelope: ApiEnvelope<()> =
            serde_json::from_str(r#"{"success":false,"error":"bad","message":"worse"}"#).unwrap();
        assert_eq!(envelope.failure_reason(), Some("bad"));

        let envelope: ApiEnvelope<()> =
            serde_json::from_str(r#"{"success":false,"message":"worse"}"#).unwrap();
        assert_eq!(envelope.failure_reason(), Some("worse"));
    }
}
