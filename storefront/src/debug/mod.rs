//! # Logging
//!
//! Structured logging for the storefront client: a daily rotated file under
//! `STOREFRONT_LOG_DIR` (default `logs/storefront.log`) plus stderr.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: filter (default `storefront=info,warn`)
//! - `STOREFRONT_LOG_DIR`: log directory
//! - `STOREFRONT_LOG_STDERR`: `0` disables the stderr layer

pub mod config;
pub mod logger;

pub use config::DebugConfig;
pub use logger::init_with as init_logger;
