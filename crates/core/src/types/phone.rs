//! North American phone number validation.

use std::sync::LazyLock;

use regex::Regex;

/// Strict `(###) ###-####`.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\([0-9]{3}\)\s[0-9]{3}-[0-9]{4}$").expect("Invalid regex"));

/// Returns `true` only for the `(###) ###-####` shape.
///
/// No alternate formats (dashes only, dots, country codes) are accepted.
///
/// ```
/// use shopfront_core::validate_phone;
///
/// assert!(validate_phone("(555) 123-4567"));
/// assert!(!validate_phone("555-123-4567"));
/// ```
#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}
