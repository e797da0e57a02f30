//! Client configuration loaded from the page.
//!
//! The storefront client has no environment to read from, so settings come
//! from optional `<meta>` tags in the server-rendered markup.
//!
//! # Meta tags
//!
//! ## Optional
//! - `shopfront-api-base` - Base URL of the backend API, absolute or relative
//!   to the page origin (default: page origin)
//! - `shopfront-log` - `tracing` filter directive (default: `shopfront_web=info`)

use url::Url;

use crate::dom::{Document, Element};
use crate::error::ConfigError;

/// Meta tag carrying the API base URL.
pub const API_BASE_META: &str = "shopfront-api-base";

/// Meta tag carrying the log filter.
pub const LOG_FILTER_META: &str = "shopfront-log";

/// Log filter used when the page doesn't set one.
pub const DEFAULT_LOG_FILTER: &str = "shopfront_web=info";

/// Name reported when the page origin itself is not a usable base.
const ORIGIN_SOURCE: &str = "page origin";

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL the `/api/...` endpoints are resolved against.
    ///
    /// `None` when the page gave no usable base; every endpoint then fails
    /// to resolve while the widgets keep working.
    pub api_base: Option<Url>,
    /// `tracing` filter directive for the console logger
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    /// Configuration with the given API base and default logging.
    #[must_use]
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base: Some(api_base),
            ..Self::default()
        }
    }

    /// Load configuration from the page's meta tags.
    ///
    /// `origin` is the page origin (`window.location.origin`). It is the API
    /// base when no meta tag sets one, and relative meta values such as
    /// `/store/` are resolved against it.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` naming the meta tag if its value is
    /// malformed, or naming the page origin if a base had to be resolved
    /// against an opaque origin (`"null"` on `file://` pages and sandboxed
    /// frames).
    pub fn from_page<D: Document>(document: &D, origin: &str) -> Result<Self, ConfigError> {
        let api_base = match get_meta(document, API_BASE_META) {
            Some(meta) => match Url::parse(&meta) {
                Ok(url) => url,
                Err(url::ParseError::RelativeUrlWithoutBase) => parse_origin(origin)?
                    .join(&meta)
                    .map_err(|e| ConfigError::InvalidUrl(API_BASE_META.to_string(), e))?,
                Err(e) => return Err(ConfigError::InvalidUrl(API_BASE_META.to_string(), e)),
            },
            None => parse_origin(origin)?,
        };
        let log_filter = meta_or_default(document, LOG_FILTER_META, DEFAULT_LOG_FILTER);

        Ok(Self {
            api_base: Some(api_base),
            log_filter,
        })
    }

    /// Load configuration from the page, falling back to defaults.
    ///
    /// A bad API base never stops the page from booting: the fallback keeps
    /// the page's log filter and has no API base. The error that forced the
    /// fallback is returned so it can be logged once logging is up.
    #[must_use]
    pub fn from_page_or_default<D: Document>(
        document: &D,
        origin: &str,
    ) -> (Self, Option<ConfigError>) {
        match Self::from_page(document, origin) {
            Ok(config) => (config, None),
            Err(e) => {
                let config = Self {
                    api_base: None,
                    log_filter: meta_or_default(document, LOG_FILTER_META, DEFAULT_LOG_FILTER),
                };
                (config, Some(e))
            }
        }
    }

    /// Resolve an endpoint path (e.g. `/api/search`) beneath the API base.
    ///
    /// The base's own path is kept when it ends with `/`, so a base of
    /// `https://example.com/shop/` serves `/api/search` from
    /// `https://example.com/shop/api/search`.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no API base or the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.api_base
            .as_ref()
            .ok_or(url::ParseError::RelativeUrlWithoutBase)?
            .join(path.trim_start_matches('/'))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a meta tag's non-empty `content`.
fn get_meta<D: Document>(document: &D, name: &str) -> Option<String> {
    document
        .query_selector(&format!("meta[name=\"{name}\"]"))
        .and_then(|meta| meta.attribute("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}

/// Parse the page origin as a base URL.
fn parse_origin(origin: &str) -> Result<Url, ConfigError> {
    Url::parse(origin).map_err(|e| ConfigError::InvalidUrl(ORIGIN_SOURCE.to_string(), e))
}

/// Get a meta tag's content with a default value.
fn meta_or_default<D: Document>(document: &D, name: &str, default: &str) -> String {
    get_meta(document, name).unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;

    #[test]
    fn test_defaults_to_page_origin() {
        let doc = FakeDocument::from_html("<div class=\"container\"></div>");
        let config = ClientConfig::from_page(&doc, "https://shop.example.com").unwrap();

        assert_eq!(config.api_base.unwrap().as_str(), "https://shop.example.com/");
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_reads_meta_tags() {
        let doc = FakeDocument::from_html(
            r#"<meta name="shopfront-api-base" content="https://api.example.com/v1/">
               <meta name="shopfront-log" content="shopfront_web=debug">"#,
        );
        let config = ClientConfig::from_page(&doc, "https://shop.example.com").unwrap();

        assert_eq!(config.api_base.unwrap().as_str(), "https://api.example.com/v1/");
        assert_eq!(config.log_filter, "shopfront_web=debug");
    }

    #[test]
    fn test_blank_meta_falls_back() {
        let doc = FakeDocument::from_html(r#"<meta name="shopfront-log" content="  ">"#);
        let config = ClientConfig::from_page(&doc, "http://localhost:5000").unwrap();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_invalid_api_base() {
        let doc =
            FakeDocument::from_html(r#"<meta name="shopfront-api-base" content="http://[::1">"#);
        let result = ClientConfig::from_page(&doc, "https://shop.example.com");
        assert!(matches!(result, Err(ConfigError::InvalidUrl(ref name, _)) if name == API_BASE_META));
    }

    #[test]
    fn test_relative_api_base_resolves_against_origin() {
        let doc = FakeDocument::from_html(r#"<meta name="shopfront-api-base" content="/store/">"#);
        let config = ClientConfig::from_page(&doc, "https://shop.example.com").unwrap();

        assert_eq!(
            config.endpoint("/api/search").unwrap().as_str(),
            "https://shop.example.com/store/api/search"
        );
    }

    #[test]
    fn test_opaque_origin_is_reported_as_origin() {
        let doc = FakeDocument::from_html("<div class=\"container\"></div>");
        let result = ClientConfig::from_page(&doc, "null");
        assert!(
            matches!(result, Err(ConfigError::InvalidUrl(ref name, _)) if name == ORIGIN_SOURCE)
        );
    }

    #[test]
    fn test_opaque_origin_keeps_absolute_api_base() {
        let doc = FakeDocument::from_html(
            r#"<meta name="shopfront-api-base" content="https://shop.example.com/">"#,
        );
        let config = ClientConfig::from_page(&doc, "null").unwrap();
        assert_eq!(config.api_base.unwrap().as_str(), "https://shop.example.com/");
    }

    #[test]
    fn test_fallback_keeps_log_filter() {
        let doc = FakeDocument::from_html(r#"<meta name="shopfront-log" content="shopfront_web=debug">"#);
        let (config, error) = ClientConfig::from_page_or_default(&doc, "null");

        assert!(error.is_some());
        assert!(config.api_base.is_none());
        assert_eq!(config.log_filter, "shopfront_web=debug");

        let (config, error) = ClientConfig::from_page_or_default(&doc, "https://shop.example.com");
        assert!(error.is_none());
        assert!(config.api_base.is_some());
    }

    #[test]
    fn test_default_has_no_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
        assert_eq!(
            config.endpoint("/api/search"),
            Err(url::ParseError::RelativeUrlWithoutBase)
        );
    }

    #[test]
    fn test_endpoint_joins_beneath_base() {
        let config = ClientConfig::new(Url::parse("https://shop.example.com").unwrap());
        assert_eq!(
            config.endpoint("/api/search").unwrap().as_str(),
            "https://shop.example.com/api/search"
        );

        let config = ClientConfig::new(Url::parse("https://shop.example.com/store/").unwrap());
        assert_eq!(
            config.endpoint("/api/update-cart/7").unwrap().as_str(),
            "https://shop.example.com/store/api/update-cart/7"
        );
    }
}
