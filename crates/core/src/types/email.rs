//! Email address validation.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld`: no whitespace, exactly one `@`, at least one dot after it.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Returns `true` if `email` has the generic `local@domain.tld` shape.
///
/// The check is purely syntactic: neither part may contain whitespace or a
/// second `@`, and the domain needs at least one dot with text on both sides.
///
/// ```
/// use shopfront_core::validate_email;
///
/// assert!(validate_email("a@b.co"));
/// assert!(!validate_email("not-an-email"));
/// ```
#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}
