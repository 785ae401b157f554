//! # Client Configuration
//!
//! Settings loaded from `STOREFRONT_*` environment variables (a `.env` file is
//! honoured by the binary). Every variable has a default; values that are set
//! but unparseable are rejected, and [`StorefrontConfig::validate`] checks the
//! ranges before anything is built from them.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::services::retry::RetryPolicy;
use crate::services::siwe::{ChallengeConfig, DEFAULT_CHAIN_ID, DEFAULT_STATEMENT};

#[derive(Clone, Debug, PartialEq)]
pub struct StorefrontConfig {
    /// Base URL of the storefront REST API
    pub api_url: String,
    /// Host presented as the sign-in domain
    pub domain: String,
    /// Origin presented as the sign-in URI
    pub origin: String,
    pub chain_id: u64,
    /// JSON file holding the persisted session token
    pub token_file: PathBuf,
    /// Attempts per listing fetch
    pub fetch_retries: u32,
    pub fetch_timeout: Duration,
    pub poll_interval: Duration,
    pub carousel_interval: Duration,
    pub log_dir: PathBuf,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:3000".to_string(),
            domain: "localhost:5173".to_string(),
            origin: "http://localhost:5173".to_string(),
            chain_id: DEFAULT_CHAIN_ID,
            token_file: PathBuf::from(".storefront/session.json"),
            fetch_retries: 3,
            fetch_timeout: Duration::from_millis(30_000),
            poll_interval: Duration::from_millis(30_000),
            carousel_interval: Duration::from_millis(5_000),
            log_dir: PathBuf::from("logs"),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str, default: String| lookup(key).unwrap_or(default);
        let path = |key: &str, default: PathBuf| lookup(key).map(PathBuf::from).unwrap_or(default);

        Ok(Self {
            api_url: text("STOREFRONT_API_URL", defaults.api_url)
                .trim_end_matches('/')
                .to_string(),
            domain: text("STOREFRONT_DOMAIN", defaults.domain),
            origin: text("STOREFRONT_ORIGIN", defaults.origin),
            chain_id: parse(&lookup, "STOREFRONT_CHAIN_ID", defaults.chain_id)?,
            token_file: path("STOREFRONT_TOKEN_FILE", defaults.token_file),
            fetch_retries: parse(&lookup, "STOREFRONT_FETCH_RETRIES", defaults.fetch_retries)?,
            fetch_timeout: millis(&lookup, "STOREFRONT_FETCH_TIMEOUT_MS", defaults.fetch_timeout)?,
            poll_interval: millis(&lookup, "STOREFRONT_POLL_INTERVAL_MS", defaults.poll_interval)?,
            carousel_interval: millis(
                &lookup,
                "STOREFRONT_CAROUSEL_INTERVAL_MS",
                defaults.carousel_interval,
            )?,
            log_dir: path("STOREFRONT_LOG_DIR", defaults.log_dir),
        })
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "STOREFRONT_API_URL must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.domain.is_empty() || self.domain.contains(char::is_whitespace) {
            return Err(AppError::Config("STOREFRONT_DOMAIN must be a bare host".to_string()));
        }
        if !self.origin.contains("://") {
            return Err(AppError::Config(format!(
                "STOREFRONT_ORIGIN must be an absolute URI, got {:?}",
                self.origin
            )));
        }
        if self.chain_id == 0 {
            return Err(AppError::Config("STOREFRONT_CHAIN_ID must be non-zero".to_string()));
        }
        if self.fetch_retries == 0 || self.fetch_retries > 10 {
            return Err(AppError::Config(
                "STOREFRONT_FETCH_RETRIES must be between 1 and 10".to_string(),
            ));
        }
        for (key, value) in [
            ("STOREFRONT_FETCH_TIMEOUT_MS", self.fetch_timeout),
            ("STOREFRONT_POLL_INTERVAL_MS", self.poll_interval),
            ("STOREFRONT_CAROUSEL_INTERVAL_MS", self.carousel_interval),
        ] {
            if value.is_zero() {
                return Err(AppError::Config(format!("{} must be greater than 0", key)));
            }
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.fetch_retries, self.fetch_timeout)
    }

    pub fn challenge_config(&self) -> ChallengeConfig {
        ChallengeConfig {
            domain: self.domain.clone(),
            uri: self.origin.clone(),
            statement: DEFAULT_STATEMENT.to_string(),
            chain_id: self.chain_id,
        }
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{} must be a valid number: {}", key, e))),
        None => Ok(default),
    }
}

fn millis<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    let default_ms = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    parse(lookup, key, default_ms).map(Duration::from_millis)
}
