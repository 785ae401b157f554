//! In-memory fakes of the service traits for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use shared::{
    ApiEnvelope, Category, ConnectWalletRequest, Product, SearchResult, Store, UserProfile,
};

use crate::core::error::Result;
use crate::core::service::{ApiService, MessageSigner};
use crate::services::wallet::WalletError;

pub(crate) fn ok_envelope<T>(data: T) -> ApiEnvelope<T> {
    ApiEnvelope {
        success: true,
        data: Some(data),
        error: None,
        message: None,
    }
}

pub(crate) fn failed_envelope<T>(error: &str) -> ApiEnvelope<T> {
    ApiEnvelope {
        success: false,
        data: None,
        error: Some(error.to_string()),
        message: None,
    }
}

pub(crate) fn store(id: &str) -> Store {
    Store {
        id: id.to_string(),
        name: format!("Store {}", id),
        ..Default::default()
    }
}

pub(crate) fn product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: format!("Product {}", id),
        ..Default::default()
    }
}

/// Scripted [`ApiService`]; every call is recorded by name.
pub(crate) struct MockApiService {
    pub nonce: Mutex<Result<String>>,
    pub connect: Mutex<Result<String>>,
    pub profile: Mutex<Result<UserProfile>>,
    pub stores: Mutex<Result<ApiEnvelope<Vec<Store>>>>,
    pub latest: Mutex<Result<ApiEnvelope<Vec<Product>>>>,
    pub categories: Mutex<Result<ApiEnvelope<Vec<Category>>>>,
    pub by_category: Mutex<Result<ApiEnvelope<Vec<Product>>>>,
    pub cart: Mutex<Result<String>>,
    pub search: Mutex<Result<Vec<SearchResult>>>,
    pub calls: Mutex<Vec<String>>,
    pub last_connect: Mutex<Option<ConnectWalletRequest>>,
    pub last_token: Mutex<Option<String>>,
}

impl MockApiService {
    pub fn new() -> Self {
        Self {
            nonce: Mutex::new(Ok("n123".to_string())),
            connect: Mutex::new(Ok("token-abc".to_string())),
            profile: Mutex::new(Ok(UserProfile {
                id: Some("user-1".to_string()),
                ..Default::default()
            })),
            stores: Mutex::new(Ok(ok_envelope(Vec::new()))),
            latest: Mutex::new(Ok(ok_envelope(Vec::new()))),
            categories: Mutex::new(Ok(ok_envelope(Vec::new()))),
            by_category: Mutex::new(Ok(ok_envelope(Vec::new()))),
            cart: Mutex::new(Ok("Item added to cart".to_string())),
            search: Mutex::new(Ok(Vec::new())),
            calls: Mutex::new(Vec::new()),
            last_connect: Mutex::new(None),
            last_token: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().iter().filter(|c| *c == name).count()
    }

    fn record(&self, name: &str, token: Option<&str>) {
        self.calls.lock().push(name.to_string());
        *self.last_token.lock() = token.map(str::to_string);
    }
}

#[async_trait]
impl ApiService for MockApiService {
    async fn get_nonce(&self, _address: &str) -> Result<String> {
        self.record("get_nonce", None);
        self.nonce.lock().clone()
    }

    async fn connect_wallet(&self, request: ConnectWalletRequest) -> Result<String> {
        self.record("connect_wallet", None);
        *self.last_connect.lock() = Some(request);
        self.connect.lock().clone()
    }

    async fn get_profile(&self, token: &str) -> Result<UserProfile> {
        self.record("get_profile", Some(token));
        self.profile.lock().clone()
    }

    async fn get_stores(&self, token: Option<&str>) -> Result<ApiEnvelope<Vec<Store>>> {
        self.record("get_stores", token);
        self.stores.lock().clone()
    }

    async fn get_latest_products(&self) -> Result<ApiEnvelope<Vec<Product>>> {
        self.record("get_latest_products", None);
        self.latest.lock().clone()
    }

    async fn get_categories(&self) -> Result<ApiEnvelope<Vec<Category>>> {
        self.record("get_categories", None);
        self.categories.lock().clone()
    }

    async fn get_products_by_category(&self, _category: &str) -> Result<ApiEnvelope<Vec<Product>>> {
        self.record("get_products_by_category", None);
        self.by_category.lock().clone()
    }

    async fn add_to_cart(&self, token: &str, _product_id: &str, _quantity: u32) -> Result<String> {
        self.record("add_to_cart", Some(token));
        self.cart.lock().clone()
    }

    async fn search(&self, _query: &str, token: Option<&str>) -> Result<Vec<SearchResult>> {
        self.record("search", token);
        self.search.lock().clone()
    }
}

/// Scripted [`MessageSigner`] recording every message it was asked to sign.
pub(crate) struct MockSigner {
    response: std::result::Result<String, WalletError>,
    pub messages: Mutex<Vec<String>>,
}

impl MockSigner {
    pub fn approving(signature: &str) -> Self {
        Self {
            response: Ok(signature.to_string()),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: WalletError) -> Self {
        Self {
            response: Err(error),
            messages: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl MessageSigner for MockSigner {
    async fn sign_message(
        &self,
        _address: &str,
        message: &str,
    ) -> std::result::Result<String, WalletError> {
        self.messages.lock().push(message.to_string());
        self.response.clone()
    }
}
