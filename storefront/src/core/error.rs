//! # Common Error Types
//!
//! Consolidated error handling for the storefront client.
//!
//! ## Error Categories
//!
//! - **Authentication**: `Nonce`, `UserRejected`, `SigningUnavailable`, `Verification`
//! - **Transport**: `Http`, `Timeout`, `Network`, `Parse`
//! - **Local**: `Storage`, `Config`, `Validation`
//!
//! Callers never inspect error text to decide what happened. [`AppError::kind`]
//! is the discriminator, and [`AppError::user_message`] maps it to the short
//! string shown to the user after a failed sign-in.
//!
//! ```rust
//! use storefront::core::error::{AppError, ErrorKind};
//!
//! let err = AppError::UserRejected("User rejected request".to_string());
//! assert_eq!(err.kind(), ErrorKind::UserRejected);
//! assert_eq!(err.user_message(), "Signature cancelled. Please approve the signature.");
//! ```

use thiserror::Error;

use crate::services::wallet::WalletError;

pub const MSG_SIGNATURE_CANCELLED: &str = "Signature cancelled. Please approve the signature.";
pub const MSG_WRONG_NETWORK: &str =
    "Wallet signing failed. Please ensure your wallet is on Base Sepolia.";
pub const MSG_PREPARE_FAILED: &str =
    "Error preparing message. Please check your connection and try again.";
pub const MSG_AUTH_FAILED: &str = "Failed to authenticate wallet. Please try again.";

/// Application-wide error type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AppError {
    /// Nonce response was malformed, or the nonce was absent/empty.
    #[error("Nonce error: {0}")]
    Nonce(String),

    /// The wallet owner declined the signature request.
    #[error("User rejected request: {0}")]
    UserRejected(String),

    /// The signing capability could not complete (wrong network, no provider).
    #[error("Signing unavailable: {0}")]
    SigningUnavailable(String),

    /// The backend refused the signed challenge or returned no token.
    #[error("Verification failed: {0}")]
    Verification(String),

    /// Non-success HTTP status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// An attempt exceeded its deadline and was cancelled.
    #[error("Request timed out after {after_ms} ms")]
    Timeout { after_ms: u64 },

    /// Transport-level failure (connection refused, DNS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// Response body was not the JSON we expected.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Durable token storage failed.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error (bad address, empty product id, missing session).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Copyable discriminator for [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Nonce,
    UserRejected,
    SigningUnavailable,
    Verification,
    Http,
    Timeout,
    Network,
    Parse,
    Storage,
    Config,
    Validation,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Nonce(_) => ErrorKind::Nonce,
            AppError::UserRejected(_) => ErrorKind::UserRejected,
            AppError::SigningUnavailable(_) => ErrorKind::SigningUnavailable,
            AppError::Verification(_) => ErrorKind::Verification,
            AppError::Http { .. } => ErrorKind::Http,
            AppError::Timeout { .. } => ErrorKind::Timeout,
            AppError::Network(_) => ErrorKind::Network,
            AppError::Parse(_) => ErrorKind::Parse,
            AppError::Storage(_) => ErrorKind::Storage,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Validation(_) => ErrorKind::Validation,
        }
    }

    /// Short human-readable message for a failed wallet sign-in.
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::UserRejected => MSG_SIGNATURE_CANCELLED,
            ErrorKind::SigningUnavailable => MSG_WRONG_NETWORK,
            ErrorKind::Validation => MSG_PREPARE_FAILED,
            _ => MSG_AUTH_FAILED,
        }
    }
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Parse(err.to_string())
    }
}

impl From<WalletError> for AppError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Rejected(msg) => AppError::UserRejected(msg),
            WalletError::InvalidAddress(msg) => AppError::Validation(msg),
            other => AppError::SigningUnavailable(other.to_string()),
        }
    }
}
