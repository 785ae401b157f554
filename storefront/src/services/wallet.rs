//! # Wallet Service
//!
//! Tracks the connected wallet and forwards signature requests to the external
//! signing capability.
//!
//! ## Features
//! - Connection status (`Disconnected`, `Connecting`, `Connected`, `Error`)
//! - EVM address validation on connect
//! - Message signing through an injected [`MessageSigner`]
//! - [`PromptSigner`]: a signer that shows the challenge and reads the
//!   signature produced by an external wallet app

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::core::service::MessageSigner;

/// Wallet connection errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The owner declined to sign
    #[error("Signature rejected: {0}")]
    Rejected(String),
    /// Wallet is on a different chain than the one we sign in against
    #[error("Wrong network: expected chain {expected}, wallet is on {actual}")]
    WrongNetwork { expected: u64, actual: u64 },
    /// Signing provider missing or failed
    #[error("Signer unavailable: {0}")]
    Unavailable(String),
    #[error("Wallet not connected")]
    NotConnected,
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),
}

/// Wallet connection status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletStatus {
    /// Not connected
    Disconnected,
    /// Connecting in progress
    Connecting,
    /// Connected with wallet address
    Connected(String),
    /// Error state with message
    Error(String),
}

impl WalletStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletStatus::Connected(_))
    }

    pub fn address(&self) -> Option<&str> {
        match self {
            WalletStatus::Connected(addr) => Some(addr),
            _ => None,
        }
    }
}

/// Check that `address` is a `0x`-prefixed, 20-byte hex address.
pub fn validate_address(address: &str) -> Result<(), WalletError> {
    let hex = address
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::InvalidAddress(format!("{} is missing the 0x prefix", address)))?;

    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(format!(
            "{} is not a 20-byte hex address",
            address
        )));
    }
    Ok(())
}

/// Connected wallet plus its signing capability.
pub struct WalletService {
    signer: Arc<dyn MessageSigner>,
    status: RwLock<WalletStatus>,
}

impl WalletService {
    pub fn new(signer: Arc<dyn MessageSigner>) -> Self {
        Self {
            signer,
            status: RwLock::new(WalletStatus::Disconnected),
        }
    }

    /// Record a connection to `address`.
    pub fn connect(&self, address: &str) -> Result<(), WalletError> {
        *self.status.write() = WalletStatus::Connecting;

        if let Err(e) = validate_address(address) {
            *self.status.write() = WalletStatus::Error(e.to_string());
            return Err(e);
        }

        tracing::info!(address = %shared::truncate_address(address), "Wallet connected");
        *self.status.write() = WalletStatus::Connected(address.to_string());
        Ok(())
    }

    /// Disconnect wallet
    pub fn disconnect(&self) {
        let mut status = self.status.write();
        if *status != WalletStatus::Disconnected {
            tracing::info!("Wallet disconnected");
        }
        *status = WalletStatus::Disconnected;
    }

    /// Get current wallet status
    pub fn status(&self) -> WalletStatus {
        self.status.read().clone()
    }

    pub fn address(&self) -> Option<String> {
        self.status.read().address().map(str::to_string)
    }

    pub fn is_connected(&self) -> bool {
        self.status.read().is_connected()
    }

    /// Ask the external signer to sign `message` with the connected account.
    pub async fn sign_message(&self, message: &str) -> Result<String, WalletError> {
        let address = self.address().ok_or(WalletError::NotConnected)?;
        self.signer.sign_message(&address, message).await
    }
}

/// Signer that prints the challenge and waits for the owner to paste the
/// signature produced by their wallet app. An empty line declines.
pub struct PromptSigner<R> {
    input: Mutex<R>,
}

impl PromptSigner<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R> PromptSigner<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    pub fn new(input: R) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }
}

#[async_trait]
impl<R> MessageSigner for PromptSigner<R>
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn sign_message(&self, address: &str, message: &str) -> Result<String, WalletError> {
        eprintln!("Sign the following message with {} and paste the signature:", address);
        eprintln!("----------------------------------------");
        eprintln!("{}", message);
        eprintln!("----------------------------------------");
        eprintln!("Signature (empty to cancel):");

        let mut line = String::new();
        let read = self
            .input
            .lock()
            .await
            .read_line(&mut line)
            .await
            .map_err(|e| WalletError::Unavailable(format!("Failed to read signature: {}", e)))?;

        let signature = line.trim();
        if read == 0 || signature.is_empty() {
            return Err(WalletError::Rejected("User rejected request".to_string()));
        }
        if !signature.starts_with("0x") {
            return Err(WalletError::Unavailable(
                "Signature must be 0x-prefixed hex".to_string(),
            ));
        }
        Ok(signature.to_string())
    }
}
