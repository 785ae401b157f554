//! # Cart Endpoints

use shared::{AddToCartRequest, ApiEnvelope};

use super::client::ApiClient;
use crate::core::error::{AppError, Result};

/// Add `quantity` of `product_id` to the token owner's cart.
///
/// Returns the server's confirmation message.
#[tracing::instrument(skip(client, token))]
pub async fn add_to_cart(
    client: &ApiClient,
    token: &str,
    product_id: &str,
    quantity: u32,
) -> Result<String> {
    let request = AddToCartRequest {
        product_id: product_id.to_string(),
        quantity,
    };

    let (status, body) = client
        .send_json::<ApiEnvelope<serde_json::Value>>(client.post_json("/cart/add", &request, Some(token)))
        .await?;

    if !status.is_success() {
        let message = body
            .message
            .clone()
            .or(body.error.clone())
            .unwrap_or_else(|| "Failed to add to cart".to_string());
        tracing::warn!(status = status.as_u16(), error = %message, "Add to cart failed");
        return Err(AppError::Http {
            status: status.as_u16(),
            message,
        });
    }

    tracing::info!("Item added to cart");
    Ok(body.message.unwrap_or_else(|| "Item added to cart!".to_string()))
}
