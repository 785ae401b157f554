//! # Application Layer
//!
//! State and orchestration on top of [`crate::services`]:
//!
//! - **[`session`]**: shared `{token, wallet_address, is_authenticated}` with typed change events
//! - **[`handshake`]**: wallet sign-in (nonce, challenge, signature, verification)
//! - **[`carousel`]**: hero and section carousel index arithmetic
//! - **[`landing`]**: landing page sections plus the polling controller
//! - **[`search`]**: search results with resolved links and image URLs

pub mod carousel;
pub mod handshake;
pub mod landing;
pub mod search;
pub mod session;

pub use carousel::{CarouselState, SectionCarousel};
pub use handshake::{HandshakeOutcome, HandshakePhase, WalletAuthenticator};
pub use landing::{LandingPage, LandingState, PollingController, Section};
pub use search::{SearchEntry, SearchView};
pub use session::{Session, SessionEvent, SessionStore};
