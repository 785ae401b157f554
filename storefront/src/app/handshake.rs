//! # Wallet Sign-In Handshake
//!
//! Authenticates a connected wallet against the storefront:
//!
//! ```text
//! Idle ─► FetchingNonce ─► AwaitingSignature ─► Verifying ─► Authenticated
//!              │                  │                 │
//!              └──────────────────┴─────────────────┴──────► Failed(kind)
//! ```
//!
//! 1. `GET /user/nonce/{address}`
//! 2. build the [`ChallengeMessage`] and its canonical string
//! 3. ask the wallet to sign it (may wait indefinitely on the owner)
//! 4. `POST /user/connect-wallet` with address, signature and message
//! 5. commit the session and persist the token
//!
//! Any failure disconnects the wallet, leaves the session cleared and records
//! a user-facing message chosen by error kind. Nothing is retried; the user
//! reconnects to try again.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::ConnectWalletRequest;
use std::sync::Arc;
use tracing::Instrument;

use crate::app::session::SessionStore;
use crate::core::error::{AppError, ErrorKind, Result};
use crate::core::service::ApiService;
use crate::services::siwe::{ChallengeConfig, ChallengeMessage};
use crate::services::wallet::WalletService;

/// Source of the challenge's `Issued At` timestamp
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakePhase {
    Idle,
    FetchingNonce,
    AwaitingSignature,
    Verifying,
    Authenticated,
    Failed(ErrorKind),
}

/// Result of a handshake that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandshakeOutcome {
    /// Session was already authenticated; nothing was sent
    AlreadyAuthenticated,
    /// No wallet connected; nothing was sent
    NotConnected,
    Authenticated { wallet_address: String },
}

pub struct WalletAuthenticator {
    api: Arc<dyn ApiService>,
    wallet: Arc<WalletService>,
    session: SessionStore,
    challenge: ChallengeConfig,
    clock: Clock,
    phase: RwLock<HandshakePhase>,
    last_error: RwLock<Option<String>>,
}

impl WalletAuthenticator {
    pub fn new(
        api: Arc<dyn ApiService>,
        wallet: Arc<WalletService>,
        session: SessionStore,
        challenge: ChallengeConfig,
    ) -> Self {
        Self {
            api,
            wallet,
            session,
            challenge,
            clock: Arc::new(Utc::now),
            phase: RwLock::new(HandshakePhase::Idle),
            last_error: RwLock::new(None),
        }
    }

    /// Replace the wall clock (tests, replayable sessions).
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn phase(&self) -> HandshakePhase {
        *self.phase.read()
    }

    /// Message to show for the most recent failure, if any.
    pub fn error_message(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Connect `address` and run the handshake for it.
    pub async fn connect_and_authenticate(&self, address: &str) -> Result<HandshakeOutcome> {
        // A new connection attempt clears the previous failure message
        *self.last_error.write() = None;
        if self.session.is_authenticated() {
            return Ok(HandshakeOutcome::AlreadyAuthenticated);
        }
        if let Err(e) = self.wallet.connect(address) {
            let err = AppError::from(e);
            self.fail(&err);
            return Err(err);
        }
        self.authenticate().await
    }

    /// Authenticate the currently connected wallet.
    ///
    /// No-op when the session is already authenticated or no wallet is connected.
    pub async fn authenticate(&self) -> Result<HandshakeOutcome> {
        if self.session.is_authenticated() {
            tracing::debug!("Session already authenticated; skipping handshake");
            return Ok(HandshakeOutcome::AlreadyAuthenticated);
        }
        let Some(address) = self.wallet.address() else {
            return Ok(HandshakeOutcome::NotConnected);
        };

        let span = tracing::info_span!(
            "wallet_handshake",
            handshake_id = %uuid::Uuid::new_v4(),
            address = %shared::truncate_address(&address),
        );

        async {
            tracing::info!("Authenticating wallet");
            let start = std::time::Instant::now();

            match self.run(&address).await {
                Ok(token) => {
                    self.session.commit_authenticated(token, address.clone());
                    self.set_phase(HandshakePhase::Authenticated);
                    tracing::info!(duration_ms = start.elapsed().as_millis(), "Authentication successful");
                    Ok(HandshakeOutcome::Authenticated {
                        wallet_address: address.clone(),
                    })
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        kind = ?e.kind(),
                        duration_ms = start.elapsed().as_millis(),
                        "Authentication error"
                    );
                    self.fail(&e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Steps 1-4; returns the issued token.
    async fn run(&self, address: &str) -> Result<String> {
        self.set_phase(HandshakePhase::FetchingNonce);
        let nonce = self.api.get_nonce(address).await?;
        tracing::debug!("Nonce retrieved");

        let challenge = ChallengeMessage::new(&self.challenge, address, &nonce, (self.clock)())?;
        let message = challenge.to_canonical();
        tracing::debug!(message = %message, "Challenge prepared");

        self.set_phase(HandshakePhase::AwaitingSignature);
        let signature = self.wallet.sign_message(&message).await?;

        self.set_phase(HandshakePhase::Verifying);
        self.api
            .connect_wallet(ConnectWalletRequest {
                wallet_address: address.to_string(),
                signature,
                message,
            })
            .await
    }

    fn fail(&self, err: &AppError) {
        self.wallet.disconnect();
        self.session.clear();
        *self.last_error.write() = Some(err.user_message().to_string());
        self.set_phase(HandshakePhase::Failed(err.kind()));
    }

    fn set_phase(&self, phase: HandshakePhase) {
        tracing::trace!(?phase, "Handshake phase");
        *self.phase.write() = phase;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::session::SessionEvent;
    use crate::core::error::{MSG_AUTH_FAILED, MSG_PREPARE_FAILED, MSG_SIGNATURE_CANCELLED, MSG_WRONG_NETWORK};
    use crate::core::mock::{MockApiService, MockSigner};
    use crate::core::service::TokenStore;
    use crate::services::storage::MemoryTokenStore;
    use crate::services::wallet::WalletError;
    use chrono::TimeZone;

    const ADDRESS: &str = "0xAbC1230000000000000000000000000000009fE1";

    struct Harness {
        api: Arc<MockApiService>,
        signer: Arc<MockSigner>,
        wallet: Arc<WalletService>,
        storage: Arc<MemoryTokenStore>,
        session: SessionStore,
        auth: WalletAuthenticator,
    }

    fn harness(signer: MockSigner) -> Harness {
        let api = Arc::new(MockApiService::new());
        let signer = Arc::new(signer);
        let wallet = Arc::new(WalletService::new(signer.clone()));
        let storage = Arc::new(MemoryTokenStore::new());
        let session = SessionStore::new(storage.clone());
        let fixed = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let auth = WalletAuthenticator::new(
            api.clone(),
            wallet.clone(),
            session.clone(),
            ChallengeConfig::default(),
        )
        .with_clock(Arc::new(move || fixed));

        Harness { api, signer, wallet, storage, session, auth }
    }

    #[tokio::test]
    async fn test_successful_handshake_commits_session() {
        let h = harness(MockSigner::approving("0xsig"));
        let events = h.session.subscribe();

        let outcome = h.auth.connect_and_authenticate(ADDRESS).await.unwrap();

        assert_eq!(outcome, HandshakeOutcome::Authenticated { wallet_address: ADDRESS.into() });
        assert_eq!(h.auth.phase(), HandshakePhase::Authenticated);
        assert!(h.session.is_authenticated());
        assert_eq!(h.session.token().as_deref(), Some("token-abc"));
        assert_eq!(h.session.wallet_address().as_deref(), Some(ADDRESS));
        assert_eq!(h.storage.load().unwrap().as_deref(), Some("token-abc"));
        assert_eq!(
            events.try_recv().unwrap(),
            SessionEvent::Authenticated { wallet_address: ADDRESS.into() }
        );
        assert_eq!(h.api.calls(), vec!["get_nonce", "connect_wallet"]);
    }

    #[tokio::test]
    async fn test_signed_message_is_what_gets_verified() {
        let h = harness(MockSigner::approving("0xsig"));
        h.auth.connect_and_authenticate(ADDRESS).await.unwrap();

        let signed = h.signer.messages.lock().clone();
        assert_eq!(signed.len(), 1);
        assert!(signed[0].contains("Nonce: n123"));
        assert!(signed[0].contains("Chain ID: 84532"));
        assert!(signed[0].contains("Issued At: 2024-05-01T12:00:00.000Z"));

        let request = h.api.last_connect.lock().clone().unwrap();
        assert_eq!(request.message, signed[0]);
        assert_eq!(request.signature, "0xsig");
        assert_eq!(request.wallet_address, ADDRESS);
    }

    #[tokio::test]
    async fn test_idempotent_when_authenticated() {
        let h = harness(MockSigner::approving("0xsig"));
        h.session.commit_authenticated("existing".into(), ADDRESS.into());
        h.wallet.connect(ADDRESS).unwrap();

        let outcome = h.auth.authenticate().await.unwrap();

        assert_eq!(outcome, HandshakeOutcome::AlreadyAuthenticated);
        assert!(h.api.calls().is_empty());
        assert!(h.signer.messages.lock().is_empty());
        assert_eq!(h.session.token().as_deref(), Some("existing"));
    }

    #[tokio::test]
    async fn test_noop_without_connected_wallet() {
        let h = harness(MockSigner::approving("0xsig"));
        let outcome = h.auth.authenticate().await.unwrap();
        assert_eq!(outcome, HandshakeOutcome::NotConnected);
        assert!(h.api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_verification_failure_leaves_session_unset_and_disconnects() {
        let h = harness(MockSigner::approving("0xsig"));
        *h.api.connect.lock() = Err(AppError::Verification("Invalid signature".into()));

        let err = h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Verification);
        assert!(!h.session.is_authenticated());
        assert_eq!(h.session.token(), None);
        assert_eq!(h.storage.load().unwrap(), None);
        assert!(!h.wallet.is_connected());
        assert_eq!(h.auth.phase(), HandshakePhase::Failed(ErrorKind::Verification));
        assert_eq!(h.auth.error_message().as_deref(), Some(MSG_AUTH_FAILED));
    }

    #[tokio::test]
    async fn test_nonce_failure_aborts_before_signing() {
        let h = harness(MockSigner::approving("0xsig"));
        *h.api.nonce.lock() = Err(AppError::Nonce("Invalid nonce received".into()));

        let err = h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Nonce);
        assert!(h.signer.messages.lock().is_empty());
        assert_eq!(h.api.calls(), vec!["get_nonce"]);
        assert!(!h.wallet.is_connected());
    }

    #[tokio::test]
    async fn test_rejected_signature_message() {
        let h = harness(MockSigner::failing(WalletError::Rejected("User rejected request".into())));

        let err = h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UserRejected);
        assert_eq!(h.auth.error_message().as_deref(), Some(MSG_SIGNATURE_CANCELLED));
        assert_eq!(h.api.call_count("connect_wallet"), 0);
        assert!(!h.wallet.is_connected());
    }

    #[tokio::test]
    async fn test_wrong_network_message() {
        let h = harness(MockSigner::failing(WalletError::WrongNetwork { expected: 84532, actual: 1 }));

        let err = h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::SigningUnavailable);
        assert_eq!(h.auth.error_message().as_deref(), Some(MSG_WRONG_NETWORK));
    }

    #[tokio::test]
    async fn test_unusable_nonce_reports_prepare_failure() {
        let h = harness(MockSigner::approving("0xsig"));
        *h.api.nonce.lock() = Ok("not a nonce".into());

        let err = h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(h.auth.error_message().as_deref(), Some(MSG_PREPARE_FAILED));
    }

    #[tokio::test]
    async fn test_new_attempt_clears_previous_error() {
        let h = harness(MockSigner::approving("0xsig"));
        *h.api.connect.lock() = Err(AppError::Verification("nope".into()));
        h.auth.connect_and_authenticate(ADDRESS).await.unwrap_err();
        assert!(h.auth.error_message().is_some());

        *h.api.connect.lock() = Ok("token-2".into());
        h.auth.connect_and_authenticate(ADDRESS).await.unwrap();
        assert_eq!(h.auth.error_message(), None);
        assert_eq!(h.session.token().as_deref(), Some("token-2"));
    }

    #[tokio::test]
    async fn test_server_rejection_over_http_leaves_session_unset() {
        use crate::services::api::ApiClient;
        use httpmock::prelude::*;
        use serde_json::json;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/user/nonce/{}", ADDRESS));
                then.status(200).json_body(json!({"data": {"nonce": "n123"}}));
            })
            .await;
        let verify = server
            .mock_async(|when, then| {
                when.method(POST).path("/user/connect-wallet");
                then.status(401)
                    .json_body(json!({"success": false, "error": "Invalid signature"}));
            })
            .await;

        let signer = Arc::new(MockSigner::approving("0xsig"));
        let wallet = Arc::new(WalletService::new(signer));
        let storage = Arc::new(MemoryTokenStore::new());
        let session = SessionStore::new(storage.clone());
        let auth = WalletAuthenticator::new(
            Arc::new(ApiClient::new(server.base_url()).unwrap()),
            wallet.clone(),
            session.clone(),
            ChallengeConfig::default(),
        );

        let err = auth.connect_and_authenticate(ADDRESS).await.unwrap_err();

        verify.assert_async().await;
        assert_eq!(err, AppError::Verification("Invalid signature".into()));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert_eq!(storage.load().unwrap(), None);
        assert!(!wallet.is_connected());
        assert_eq!(auth.error_message().as_deref(), Some(MSG_AUTH_FAILED));
    }
}
