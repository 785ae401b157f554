//! # Storefront API Client Module
//!
//! HTTP client for communicating with the storefront REST API.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── mod.rs      - Module exports and ApiService implementation
//! ├── client.rs   - ApiClient struct, request helpers, retried GET
//! ├── auth.rs     - Nonce, wallet verification, profile
//! ├── catalog.rs  - Stores, latest products, categories
//! ├── cart.rs     - Add to cart
//! └── search.rs   - Search
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod client;
pub mod search;

pub use client::ApiClient;

use async_trait::async_trait;
use shared::{ApiEnvelope, Category, ConnectWalletRequest, Product, SearchResult, Store, UserProfile};

use crate::core::error::Result;
use crate::core::service::ApiService;

#[async_trait]
impl ApiService for ApiClient {
    async fn get_nonce(&self, address: &str) -> Result<String> {
        auth::get_nonce(self, address).await
    }

    async fn connect_wallet(&self, request: ConnectWalletRequest) -> Result<String> {
        auth::connect_wallet(self, request).await
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        auth::get_profile(self, token).await
    }

    async fn get_stores(&self, token: Option<&str>) -> Result<ApiEnvelope<Vec<Store>>> {
        catalog::get_stores(self, token).await
    }

    async fn get_latest_products(&self) -> Result<ApiEnvelope<Vec<Product>>> {
        catalog::get_latest_products(self).await
    }

    async fn get_categories(&self) -> Result<ApiEnvelope<Vec<Category>>> {
        catalog::get_categories(self).await
    }

    async fn get_products_by_category(&self, category: &str) -> Result<ApiEnvelope<Vec<Product>>> {
        catalog::get_products_by_category(self, category).await
    }

    async fn add_to_cart(&self, token: &str, product_id: &str, quantity: u32) -> Result<String> {
        cart::add_to_cart(self, token, product_id, quantity).await
    }

    async fn search(&self, query: &str, token: Option<&str>) -> Result<Vec<SearchResult>> {
        search::search(self, query, token).await
    }
}
