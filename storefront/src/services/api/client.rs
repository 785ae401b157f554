//! # API Client
//!
//! Main HTTP client for storefront API communication.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::services::retry::{retry_with_timeout, RetryPolicy};

/// HTTP client for communicating with the storefront API.
///
/// Keeps a cookie store so credentialed endpoints see the same session the
/// bearer token belongs to, and a connection pool shared by all endpoints.
pub struct ApiClient {
    pub(crate) client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Create a new API client for `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .cookie_store(true)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }

    /// Policy used by the retried listing endpoints.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path`, attaching the bearer token when one is given.
    pub(crate) fn get(&self, path: &str, token: Option<&str>) -> RequestBuilder {
        with_bearer(self.client.get(self.url(path)), token)
    }

    /// POST a JSON body to `path`.
    pub(crate) fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        token: Option<&str>,
    ) -> RequestBuilder {
        with_bearer(self.client.post(self.url(path)).json(body), token)
    }

    /// Send the request and decode the body as JSON regardless of status.
    ///
    /// The storefront reports most failures inside a JSON body, so callers get
    /// both the status and the decoded payload.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<(StatusCode, T)> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        match serde_json::from_slice::<T>(&bytes) {
            Ok(body) => Ok((status, body)),
            Err(_) if !status.is_success() => Err(AppError::Http {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("request failed").to_string(),
            }),
            Err(e) => Err(AppError::Parse(e.to_string())),
        }
    }

    /// GET `path` with the configured retry policy.
    ///
    /// Every attempt has its own deadline; a non-success status fails the
    /// attempt with [`AppError::Http`].
    #[tracing::instrument(skip(self), fields(attempts = self.retry.attempts()))]
    pub async fn fetch_with_retry<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        retry_with_timeout(&url, &self.retry, |attempt| {
            let request = self.client.get(&attempt.url);
            async move {
                let response = request
                    .send()
                    .await
                    .map_err(|e| AppError::Network(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(AppError::Http {
                        status: status.as_u16(),
                        message: format!("HTTP error {}", status.as_u16()),
                    });
                }
                response
                    .json::<T>()
                    .await
                    .map_err(|e| AppError::Parse(e.to_string()))
            }
        })
        .await
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:3000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url("/api/categories"), "http://localhost:3000/api/categories");
    }

    #[test]
    fn test_bearer_header_attached() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        let request = client.get("/user/profile", Some("tok")).build().unwrap();
        assert_eq!(
            request.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer tok"
        );

        let anonymous = client.get("/stores/public/all", None).build().unwrap();
        assert!(anonymous.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn test_default_retry_policy() {
        let client = ApiClient::new("http://localhost:3000").unwrap();
        assert_eq!(client.retry_policy(), &RetryPolicy::default());
    }
}
