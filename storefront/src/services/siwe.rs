//! # Sign-In Challenge
//!
//! Builds the EIP-4361 ("Sign-In with Ethereum") challenge the wallet signs.
//!
//! The backend re-creates the message from the fields it receives and checks
//! the signature against it, so the canonical string must match byte for byte.
//! Field order and line layout are fixed:
//!
//! ```text
//! localhost:5173 wants you to sign in with your Ethereum account:
//! 0xAbC1230000000000000000000000000000009fE1
//!
//! Allow me connect.
//!
//! URI: http://localhost:5173
//! Version: 1
//! Chain ID: 84532
//! Nonce: n123
//! Issued At: 2024-05-01T12:00:00.000Z
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;

use crate::core::error::{AppError, Result};
use crate::services::wallet::validate_address;

pub const DEFAULT_STATEMENT: &str = "Allow me connect.";
pub const SIWE_VERSION: &str = "1";
/// Base Sepolia
pub const DEFAULT_CHAIN_ID: u64 = 84532;

/// Deployment-level fields shared by every challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeConfig {
    /// Host requesting the sign-in (`host[:port]`)
    pub domain: String,
    /// Origin URI of the requesting site
    pub uri: String,
    pub statement: String,
    pub chain_id: u64,
}

impl Default for ChallengeConfig {
    fn default() -> Self {
        Self {
            domain: "localhost:5173".to_string(),
            uri: "http://localhost:5173".to_string(),
            statement: DEFAULT_STATEMENT.to_string(),
            chain_id: DEFAULT_CHAIN_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeMessage {
    pub domain: String,
    pub address: String,
    pub statement: String,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: DateTime<Utc>,
}

impl ChallengeMessage {
    /// Build a challenge for `address` consuming `nonce`.
    ///
    /// Fails with [`AppError::Validation`] when a field would produce a message
    /// the verifier cannot parse.
    pub fn new(
        config: &ChallengeConfig,
        address: &str,
        nonce: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<Self> {
        validate_address(address).map_err(|e| AppError::Validation(e.to_string()))?;

        if config.domain.is_empty() || config.domain.contains(char::is_whitespace) {
            return Err(AppError::Validation(format!("invalid domain {:?}", config.domain)));
        }
        if config.uri.is_empty() || config.uri.contains(char::is_whitespace) {
            return Err(AppError::Validation(format!("invalid URI {:?}", config.uri)));
        }
        if config.statement.contains('\n') {
            return Err(AppError::Validation("statement must be a single line".to_string()));
        }
        if nonce.is_empty() || !nonce.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(AppError::Validation(format!("invalid nonce {:?}", nonce)));
        }

        Ok(Self {
            domain: config.domain.clone(),
            address: address.to_string(),
            statement: config.statement.clone(),
            uri: config.uri.clone(),
            version: SIWE_VERSION.to_string(),
            chain_id: config.chain_id,
            nonce: nonce.to_string(),
            issued_at,
        })
    }

    /// RFC 3339 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    pub fn issued_at_string(&self) -> String {
        self.issued_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Canonical string that gets signed and sent for verification.
    pub fn to_canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ChallengeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} wants you to sign in with your Ethereum account:", self.domain)?;
        writeln!(f, "{}", self.address)?;
        writeln!(f)?;
        if !self.statement.is_empty() {
            writeln!(f, "{}", self.statement)?;
            writeln!(f)?;
        }
        writeln!(f, "URI: {}", self.uri)?;
        writeln!(f, "Version: {}", self.version)?;
        writeln!(f, "Chain ID: {}", self.chain_id)?;
        writeln!(f, "Nonce: {}", self.nonce)?;
        write!(f, "Issued At: {}", self.issued_at_string())
    }
}
