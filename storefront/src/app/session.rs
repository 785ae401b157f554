//! # Session State Store
//!
//! Explicit, cloneable handle to `{ token, wallet_address, is_authenticated }`.
//!
//! Views that render session-dependent state call [`SessionStore::subscribe`]
//! and re-render on each [`SessionEvent`]. The handshake is the only writer of
//! authenticated state; the UI is the only writer of disconnect/logout. Writes
//! are last-write-wins and the lock is never held across an `.await`.
//!
//! Token persistence is fire-and-forget: storage failures are logged and do not
//! fail the in-memory update.

use async_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

use crate::core::service::TokenStore;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub wallet_address: Option<String>,
    pub is_authenticated: bool,
}

/// Typed change notifications
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Startup hydration from durable storage finished
    Hydrated { has_token: bool },
    /// Handshake committed a new session
    Authenticated { wallet_address: String },
    /// Session was reset (disconnect, logout, failed verification)
    Cleared,
    TokenChanged(Option<String>),
    WalletAddressChanged(Option<String>),
    AuthenticatedChanged(bool),
}

struct SessionInner {
    state: RwLock<Session>,
    storage: Arc<dyn TokenStore>,
    subscribers: Mutex<Vec<Sender<SessionEvent>>>,
}

#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

impl SessionStore {
    /// Create an empty session backed by `storage`. Call [`hydrate`](Self::hydrate) next.
    pub fn new(storage: Arc<dyn TokenStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: RwLock::new(Session::default()),
                storage,
                subscribers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Load a persisted token, trusting it without re-verification.
    pub fn hydrate(&self) {
        let token = match self.inner.storage.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted session token");
                None
            }
        };

        let has_token = token.is_some();
        {
            let mut state = self.inner.state.write();
            state.is_authenticated = has_token;
            state.token = token;
        }

        tracing::debug!(has_token, "Session hydrated");
        self.publish(SessionEvent::Hydrated { has_token });
    }

    /// Snapshot of the current session.
    pub fn snapshot(&self) -> Session {
        self.inner.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.read().is_authenticated
    }

    pub fn token(&self) -> Option<String> {
        self.inner.state.read().token.clone()
    }

    pub fn wallet_address(&self) -> Option<String> {
        self.inner.state.read().wallet_address.clone()
    }

    /// Commit a successful sign-in in one write and persist the token.
    pub fn commit_authenticated(&self, token: String, wallet_address: String) {
        {
            let mut state = self.inner.state.write();
            *state = Session {
                token: Some(token.clone()),
                wallet_address: Some(wallet_address.clone()),
                is_authenticated: true,
            };
        }

        self.persist(Some(&token));
        tracing::info!(
            address = %shared::truncate_address(&wallet_address),
            "Session authenticated"
        );
        self.publish(SessionEvent::Authenticated { wallet_address });
    }

    /// Reset all fields and remove the persisted token.
    pub fn clear(&self) {
        {
            let mut state = self.inner.state.write();
            *state = Session::default();
        }

        self.persist(None);
        tracing::info!("Session cleared");
        self.publish(SessionEvent::Cleared);
    }

    pub fn set_token(&self, token: Option<String>) {
        self.inner.state.write().token = token.clone();
        self.persist(token.as_deref());
        self.publish(SessionEvent::TokenChanged(token));
    }

    pub fn set_wallet_address(&self, wallet_address: Option<String>) {
        self.inner.state.write().wallet_address = wallet_address.clone();
        self.publish(SessionEvent::WalletAddressChanged(wallet_address));
    }

    pub fn set_authenticated(&self, is_authenticated: bool) {
        self.inner.state.write().is_authenticated = is_authenticated;
        self.publish(SessionEvent::AuthenticatedChanged(is_authenticated));
    }

    /// Receive every subsequent [`SessionEvent`].
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = async_channel::unbounded();
        self.inner.subscribers.lock().push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    fn persist(&self, token: Option<&str>) {
        let result = match token {
            Some(token) => self.inner.storage.save(token),
            None => self.inner.storage.clear(),
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to persist session token");
        }
    }

    fn publish(&self, event: SessionEvent) {
        // Dropped receivers are pruned here
        self.inner
            .subscribers
            .lock()
            .retain(|tx| tx.try_send(event.clone()).is_ok());
    }
}
