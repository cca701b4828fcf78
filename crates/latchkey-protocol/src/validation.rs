//! Token plausibility check.
//!
//! Readers emit frames of all zeros or all `F`s when idle or when the
//! antenna saturates. Those frames are not scans and must not be reported
//! as unauthorized attempts. This check says nothing about authorization.

use latchkey_core::constants::SENTINEL_CHARS;

/// Check whether a token looks like a real scan.
///
/// A token is valid when something remains after removing every sentinel
/// character. The empty token is not valid.
///
/// # Examples
///
/// ```
/// use latchkey_protocol::is_valid_token;
///
/// assert!(is_valid_token("F0F0A1"));
/// assert!(!is_valid_token("0000"));
/// assert!(!is_valid_token("FFFFFF"));
/// assert!(!is_valid_token(""));
/// ```
pub fn is_valid_token(token: impl AsRef<str>) -> bool {
    token
        .as_ref()
        .chars()
        .any(|c| !SENTINEL_CHARS.contains(&c))
}
