//! # Catalog Endpoints
//!
//! Stores, latest products, categories and per-category product listings.
//!
//! The store list is fetched once per call (the landing page polls it); the
//! other listings go through [`ApiClient::fetch_with_retry`].

use shared::{ApiEnvelope, Category, Product, Store};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};

/// Get the public store list.
#[tracing::instrument(skip(client, token), fields(authenticated = token.is_some()))]
pub async fn get_stores(client: &ApiClient, token: Option<&str>) -> Result<ApiEnvelope<Vec<Store>>> {
    let start = std::time::Instant::now();

    let (status, envelope) = client
        .send_json::<ApiEnvelope<Vec<Store>>>(client.get("/stores/public/all", token))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Stores fetch error");
            e
        })?;

    tracing::debug!(
        status = status.as_u16(),
        success = envelope.success,
        count = envelope.data.as_ref().map(Vec::len).unwrap_or(0),
        duration_ms = start.elapsed().as_millis(),
        "Stores fetched"
    );
    Ok(envelope)
}

/// Get the newest products.
pub async fn get_latest_products(client: &ApiClient) -> Result<ApiEnvelope<Vec<Product>>> {
    client.fetch_with_retry("/products/public/latest").await
}

/// Get all categories.
pub async fn get_categories(client: &ApiClient) -> Result<ApiEnvelope<Vec<Category>>> {
    client.fetch_with_retry("/api/categories").await
}

/// Get products of one category, e.g. `Homes & Gardens`.
pub async fn get_products_by_category(
    client: &ApiClient,
    category: &str,
) -> Result<ApiEnvelope<Vec<Product>>> {
    client.fetch_with_retry(&category_path(category)?).await
}

/// `/products/public?category=<urlencoded>`
pub(crate) fn category_path(category: &str) -> Result<String> {
    let url = reqwest::Url::parse_with_params("http://placeholder/products/public", &[("category", category)])
        .map_err(|e| AppError::Validation(format!("Invalid category {:?}: {}", category, e)))?;
    Ok(format!("{}?{}", url.path(), url.query().unwrap_or_default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::retry::RetryPolicy;
    use httpmock::prelude::*;
    use serde_json::json;
    use std::time::Duration;

    fn quick_retries(server: &MockServer) -> ApiClient {
        ApiClient::new(server.base_url())
            .unwrap()
            .with_retry_policy(RetryPolicy {
                max_retries: 2,
                timeout: Duration::from_secs(5),
                base_delay: Duration::from_millis(10),
            })
    }

    #[test]
    fn test_category_path_is_encoded() {
        assert_eq!(
            category_path("Homes & Gardens").unwrap(),
            "/products/public?category=Homes+%26+Gardens"
        );
        assert_eq!(
            category_path("Electronics").unwrap(),
            "/products/public?category=Electronics"
        );
    }

    #[tokio::test]
    async fn test_get_stores_passes_envelope_through() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/stores/public/all");
                then.status(500)
                    .json_body(json!({"success": false, "error": "db down"}));
            })
            .await;
        let client = quick_retries(&server);

        let envelope = get_stores(&client, None).await.unwrap();
        assert!(!envelope.success);
        assert_eq!(envelope.failure_reason(), Some("db down"));
        mock.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_get_stores_with_owner() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/stores/public/all")
                    .header("authorization", "Bearer tok");
                then.status(200).json_body(json!({
                    "success": true,
                    "data": [{"_id": "s1", "name": "Kara", "owner": {"_id": "u1"}}]
                }));
            })
            .await;
        let client = quick_retries(&server);

        let stores = get_stores(&client, Some("tok")).await.unwrap().into_data();
        assert_eq!(stores[0].owner_id(), Some("u1"));
    }

    #[tokio::test]
    async fn test_listing_fetch_by_category() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/products/public")
                    .query_param("category", "Homes & Gardens");
                then.status(200).json_body(json!({
                    "success": true,
                    "data": [{"_id": "p1", "name": "Rake", "price": 12.5, "paymentToken": "USDC"}]
                }));
            })
            .await;
        let client = quick_retries(&server);

        let products = get_products_by_category(&client, "Homes & Gardens")
            .await
            .unwrap()
            .into_data();
        assert_eq!(products[0].payment_token.as_deref(), Some("USDC"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_listing_fetch_retries_then_fails_with_status() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/categories");
                then.status(503);
            })
            .await;
        let client = quick_retries(&server);

        let err = get_categories(&client).await.unwrap_err();
        assert_eq!(err, AppError::Http { status: 503, message: "HTTP error 503".into() });
        mock.assert_hits_async(2).await;
    }

    #[tokio::test]
    async fn test_listing_fetch_malformed_body() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/products/public/latest");
                then.status(200).body("not json");
            })
            .await;
        let client = quick_retries(&server);

        let err = get_latest_products(&client).await.unwrap_err();
        assert_eq!(err.kind(), crate::core::error::ErrorKind::Parse);
    }
}
