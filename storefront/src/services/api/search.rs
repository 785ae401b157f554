//! # Search Endpoint

use shared::{ApiEnvelope, SearchResult};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};

/// Search products and stores matching `query`.
#[tracing::instrument(skip(client, token), fields(authenticated = token.is_some()))]
pub async fn search(client: &ApiClient, query: &str, token: Option<&str>) -> Result<Vec<SearchResult>> {
    let start = std::time::Instant::now();

    let request = client.get("/search", token).query(&[("q", query)]);
    let (status, body) = client
        .send_json::<ApiEnvelope<Vec<SearchResult>>>(request)
        .await?;

    tracing::debug!(
        status = status.as_u16(),
        duration_ms = start.elapsed().as_millis(),
        "Search response"
    );

    if !status.is_success() {
        return Err(AppError::Http {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| "Failed to fetch search results".to_string()),
        });
    }

    Ok(body.into_data())
}
