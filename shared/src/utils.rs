//! # Shared Utility Functions
//!
//! Common utility functions used by the storefront client and its CLI.
//!
//! ## Address Formatting
//!
//! Functions for formatting wallet addresses for display:
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `format_address` with the `0x` prefix kept visible
//!
//! ## Image Paths
//!
//! The API stores uploaded images under `/Uploads/`, but documents are not
//! consistent about the prefix. [`normalize_upload_path`] produces the
//! canonical form and [`encode_uri`] makes it safe to append to a base URL.
//!
//! ```rust
//! use shared::utils::{format_address, normalize_upload_path};
//!
//! let address = "0xAbC1230000000000000000000000000000009fE1";
//! assert_eq!(format_address(address, 6, 4), "0xAbC1...9fE1");
//! assert_eq!(normalize_upload_path("Uploads/a.png"), "/Uploads/a.png");
//! ```

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// 1x1 transparent PNG used whenever an image path is missing.
pub const FALLBACK_IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAACklEQVR4nGMAAQAABQABDQottAAAAABJRU5ErkJggg==";

/// Format a wallet address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0xAbC1230000000000000000000000000000009fE1";
/// assert_eq!(format_address(addr, 4, 4), "0xAb...9fE1");
/// assert_eq!(format_address("short", 4, 4), "short");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    // Guard against individual lengths exceeding address length to prevent panics
    if address_len <= prefix_len + suffix_len
        || prefix_len >= address_len
        || suffix_len >= address_len
        || !address.is_ascii()
    {
        return address.to_string();
    }

    let prefix = &address[..prefix_len];
    let suffix = &address[address_len - suffix_len..];

    format!("{}...{}", prefix, suffix)
}

/// Format an EVM address as `0x` + 4 characters, ellipsis, last 4 characters.
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0xAbC1230000000000000000000000000000009fE1";
/// assert_eq!(truncate_address(addr), "0xAbC1...9fE1");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}

/// Normalize an upload path to the `/Uploads/...` form.
///
/// - `/Uploads/x` is kept as-is
/// - `Uploads/x` gains a leading slash
/// - anything else is placed under `/Uploads/` with leading slashes stripped
pub fn normalize_upload_path(path: &str) -> String {
    if path.starts_with("/Uploads/") {
        path.to_string()
    } else if path.starts_with("Uploads/") {
        format!("/{}", path)
    } else {
        format!("/Uploads/{}", path.trim_start_matches('/'))
    }
}

/// Characters `encodeURI` leaves alone besides ASCII alphanumerics.
const ENCODE_URI: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b';')
    .remove(b',')
    .remove(b'/')
    .remove(b'?')
    .remove(b':')
    .remove(b'@')
    .remove(b'&')
    .remove(b'=')
    .remove(b'+')
    .remove(b'$')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'#');

/// Percent-encode a URI the way browsers' `encodeURI` does: reserved and
/// unreserved characters survive, everything else is UTF-8 percent-encoded.
///
/// ```rust
/// use shared::utils::encode_uri;
///
/// assert_eq!(encode_uri("/Uploads/my image.png"), "/Uploads/my%20image.png");
/// ```
pub fn encode_uri(input: &str) -> String {
    utf8_percent_encode(input, ENCODE_URI).to_string()
}
