//! # Storefront Client - Library Root
//!
//! Client core for a multi-vendor marketplace whose users sign in with an
//! Ethereum wallet. The binary (`main.rs`) is a thin command-line shell over
//! this crate.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │              storefront (this crate)                   │
//! ├────────────────────────────────────────────────────────┤
//! │  app       - session, handshake, landing, search       │
//! │  services  - REST client, retry, challenge, storage    │
//! │  core      - errors and service traits                 │
//! │  config    - STOREFRONT_* environment settings         │
//! │  debug     - tracing setup                             │
//! └────────────────────────────────────────────────────────┘
//!          │                              │
//!          │ HTTP                         │ sign_message
//!          ▼                              ▼
//! ┌─────────────────┐          ┌─────────────────────────┐
//! │  Storefront API │          │  External wallet        │
//! └─────────────────┘          └─────────────────────────┘
//! ```
//!
//! ## Sign-in flow
//!
//! 1. The wallet connects ([`services::wallet::WalletService::connect`])
//! 2. [`app::WalletAuthenticator`] fetches a nonce, builds the challenge, has
//!    the wallet sign it and submits it for verification
//! 3. The issued token is committed to the [`app::SessionStore`] and persisted
//!
//! ## Testing
//!
//! Unit tests live next to the code and use the mock implementations of
//! [`core::service::ApiService`] and [`core::service::MessageSigner`]:
//!
//! ```bash
//! cargo test --lib
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod services;

pub use app::{LandingPage, SearchView, SessionStore, WalletAuthenticator};
pub use config::StorefrontConfig;
pub use crate::core::{AppError, ErrorKind, Result};
pub use services::api::ApiClient;
