//! # External Service Integrations
//!
//! - **[`api`]**: Storefront REST client (auth, catalog, cart, search)
//! - **[`retry`]**: Retry-with-timeout state machine used by listing fetches
//! - **[`siwe`]**: Sign-in challenge construction
//! - **[`storage`]**: Durable token storage
//! - **[`wallet`]**: Wallet connection status and the signing seam

pub mod api;
pub mod retry;
pub mod siwe;
pub mod storage;
pub mod wallet;
