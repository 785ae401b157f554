//! # Authentication Endpoints
//!
//! Nonce retrieval, signed-challenge verification and profile lookup.
//! None of these are retried: a failed sign-in is restarted by the user.

use shared::{ApiEnvelope, ConnectWalletRequest, NonceResponse, TokenData, UserProfile};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};

/// Fetch the sign-in nonce for `address`.
#[tracing::instrument(skip(client), fields(address = %shared::truncate_address(address)))]
pub async fn get_nonce(client: &ApiClient, address: &str) -> Result<String> {
    let start = std::time::Instant::now();

    let response = client
        .get(&format!("/user/nonce/{}", address), None)
        .send()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Nonce network error");
            AppError::Network(e.to_string())
        })?;

    let status = response.status();
    let body = response
        .json::<NonceResponse>()
        .await
        .map_err(|e| {
            tracing::error!(error = %e, status = status.as_u16(), "Nonce response parse error");
            AppError::Nonce(format!("Malformed nonce response: {}", e))
        })?;

    match body.nonce() {
        Some(nonce) => {
            tracing::debug!(duration_ms = start.elapsed().as_millis(), "Nonce retrieved");
            Ok(nonce.to_string())
        }
        None => {
            tracing::warn!(status = status.as_u16(), "Invalid nonce received");
            Err(AppError::Nonce("Invalid nonce received".to_string()))
        }
    }
}

/// Submit the signed challenge and return the issued bearer token.
#[tracing::instrument(skip(client, request), fields(address = %shared::truncate_address(&request.wallet_address)))]
pub async fn connect_wallet(client: &ApiClient, request: ConnectWalletRequest) -> Result<String> {
    tracing::info!("Verifying wallet signature");
    let start = std::time::Instant::now();

    let (status, body) = client
        .send_json::<ApiEnvelope<TokenData>>(client.post_json("/user/connect-wallet", &request, None))
        .await
        .map_err(|e| match e {
            // An unreadable rejection is still a rejection
            AppError::Http { status, message } => {
                AppError::Verification(format!("HTTP {}: {}", status, message))
            }
            other => other,
        })?;

    let duration = start.elapsed();

    if !body.success {
        let reason = body
            .failure_reason()
            .unwrap_or("Failed to authenticate wallet")
            .to_string();
        tracing::warn!(
            status = status.as_u16(),
            error = %reason,
            duration_ms = duration.as_millis(),
            "Wallet verification failed"
        );
        return Err(AppError::Verification(reason));
    }

    match body.data.and_then(|data| data.token).filter(|t| !t.is_empty()) {
        Some(token) => {
            tracing::info!(duration_ms = duration.as_millis(), "Wallet verified");
            Ok(token)
        }
        None => {
            tracing::warn!(duration_ms = duration.as_millis(), "No token in verification response");
            Err(AppError::Verification("No token received from server".to_string()))
        }
    }
}

/// Profile of the token's owner. A response without `_id` is a failure.
pub async fn get_profile(client: &ApiClient, token: &str) -> Result<UserProfile> {
    let (status, profile) = client
        .send_json::<UserProfile>(client.get("/user/profile", Some(token)))
        .await?;

    if status.is_success() && profile.id.is_some() {
        Ok(profile)
    } else {
        Err(AppError::Http {
            status: status.as_u16(),
            message: profile
                .error
                .unwrap_or_else(|| "Failed to fetch user profile".to_string()),
        })
    }
}
