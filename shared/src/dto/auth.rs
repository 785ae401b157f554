use serde::{Deserialize, Serialize};

/// `GET /user/nonce/{address}` response: `{ "data": { "nonce": "..." } }`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NonceResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<NonceData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NonceData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
}

impl NonceResponse {
    /// The nonce, if present and non-empty.
    pub fn nonce(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.nonce.as_deref())
            .filter(|nonce| !nonce.is_empty())
    }
}

/// `POST /user/connect-wallet` request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConnectWalletRequest {
    pub wallet_address: String,
    pub signature: String,
    /// Canonical challenge message exactly as it was signed
    pub message: String,
}

/// `data` payload of a successful wallet verification
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// `GET /user/profile` response (not enveloped)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
