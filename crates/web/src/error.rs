//! Error types for the storefront client.
//!
//! Nothing here is ever fatal to the page: widgets log these errors and fall
//! back to an error notification or a silent no-op.

use thiserror::Error;

/// Errors from the storefront backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request could not be sent or the body could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built from the configured base.
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// Backend answered without a confirmed cart update.
    #[error("Cart update was not confirmed by the backend")]
    Rejected,
}

/// Configuration errors that can occur while reading page settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid URL in {0}: {1}")]
    InvalidUrl(String, url::ParseError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::Rejected.to_string(),
            "Cart update was not confirmed by the backend"
        );

        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(ApiError::from(parse).to_string().starts_with("JSON parse error"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidUrl(
            "shopfront-api-base".to_string(),
            url::ParseError::RelativeUrlWithoutBase,
        );
        assert_eq!(
            err.to_string(),
            "Invalid URL in shopfront-api-base: relative URL without a base"
        );
    }
}
