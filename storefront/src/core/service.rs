//! # Service Traits
//!
//! Traits for dependency injection, enabling better testability and modularity.

use async_trait::async_trait;
use shared::{ApiEnvelope, Category, ConnectWalletRequest, Product, SearchResult, Store, UserProfile};

use crate::core::error::Result;
use crate::services::wallet::WalletError;

/// Trait for storefront API operations
///
/// Implemented by [`crate::services::api::ApiClient`]; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait ApiService: Send + Sync {
    /// Fetch the single-use sign-in nonce for `address`
    async fn get_nonce(&self, address: &str) -> Result<String>;

    /// Exchange a signed challenge for a bearer token
    async fn connect_wallet(&self, request: ConnectWalletRequest) -> Result<String>;

    /// Profile of the token's owner
    async fn get_profile(&self, token: &str) -> Result<UserProfile>;

    /// Public store list (single attempt; polled by the landing page)
    async fn get_stores(&self, token: Option<&str>) -> Result<ApiEnvelope<Vec<Store>>>;

    /// Latest products (retried with backoff)
    async fn get_latest_products(&self) -> Result<ApiEnvelope<Vec<Product>>>;

    /// Category list (retried with backoff)
    async fn get_categories(&self) -> Result<ApiEnvelope<Vec<Category>>>;

    /// Products of one category (retried with backoff)
    async fn get_products_by_category(&self, category: &str) -> Result<ApiEnvelope<Vec<Product>>>;

    /// Add a product to the token owner's cart, returning the server message
    async fn add_to_cart(&self, token: &str, product_id: &str, quantity: u32) -> Result<String>;

    /// Full-text search over products and stores
    async fn search(&self, query: &str, token: Option<&str>) -> Result<Vec<SearchResult>>;
}

/// External message-signing capability (browser wallet, hardware wallet, ...).
///
/// `sign_message` may suspend indefinitely while the owner decides.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    async fn sign_message(&self, address: &str, message: &str) -> std::result::Result<String, WalletError>;
}

/// Durable key/value storage for the session token.
///
/// Writes are small and local, so the trait is synchronous.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
