//! Storefront backend API.
//!
//! Widgets talk to the backend through [`StorefrontApi`]; [`HttpApi`] is the
//! real implementation. `reqwest` goes through `fetch` in the browser.
//!
//! # Endpoints
//!
//! - `POST /api/update-cart/{product_id}` with `{"quantity": n}`
//! - `GET /api/search?q=<urlencoded>`
//!
//! Response bodies are parsed whatever the HTTP status: the backend reports
//! cart failures in the body (`success: false`), not through status codes.

use reqwest::Client;
use shopfront_core::{
    CartUpdate, CartUpdateRequest, CartUpdateResponse, ProductId, ProductSummary, SearchResponse,
};
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Header marking requests as made from script.
pub const REQUESTED_WITH_HEADER: &str = "X-Requested-With";

/// Value sent in [`REQUESTED_WITH_HEADER`].
pub const REQUESTED_WITH_VALUE: &str = "XMLHttpRequest";

/// Longest body excerpt written to the log on parse failures.
const LOG_BODY_CHARS: usize = 500;

/// Operations the widgets need from the backend.
///
/// Futures are `!Send`: everything runs on the page's single thread.
#[allow(async_fn_in_trait)]
pub trait StorefrontApi: 'static {
    /// Set the cart quantity for a product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` if the backend did not confirm the update,
    /// or a transport/parse error.
    async fn update_cart(&self, product_id: ProductId, quantity: u32)
    -> Result<CartUpdate, ApiError>;

    /// Search products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns a transport or parse error.
    async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, ApiError>;
}

/// `reqwest`-backed [`StorefrontApi`].
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    config: ClientConfig,
}

impl HttpApi {
    /// Create a client for the configured API base.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client reusing an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    /// URL of the cart update endpoint for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built from the API base.
    pub fn update_cart_url(&self, product_id: ProductId) -> Result<Url, ApiError> {
        Ok(self
            .config
            .endpoint(&format!("/api/update-cart/{product_id}"))?)
    }

    /// URL of the search endpoint for `query`.
    ///
    /// The query is percent-encoded as a URI component.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be built from the API base.
    pub fn search_url(&self, query: &str) -> Result<Url, ApiError> {
        let mut url = self.config.endpoint("/api/search")?;
        url.set_query(Some(&format!("q={}", urlencoding::encode(query))));
        Ok(url)
    }
}

impl StorefrontApi for HttpApi {
    #[instrument(skip(self), level = "debug")]
    async fn update_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartUpdate, ApiError> {
        let url = self.update_cart_url(product_id)?;

        let response = self
            .client
            .post(url)
            .header(REQUESTED_WITH_HEADER, REQUESTED_WITH_VALUE)
            .json(&CartUpdateRequest { quantity })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(status = %status, "Cart update response received");

        parse_cart_update(&body)
    }

    #[instrument(skip(self), level = "debug")]
    async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, ApiError> {
        let url = self.search_url(query)?;

        let response = self.client.get(url).send().await?;
        let body = response.text().await?;

        parse_search(&body)
    }
}

// =============================================================================
// Response Parsing
// =============================================================================

/// Parse a cart update body into a confirmed update.
///
/// # Errors
///
/// Returns `ApiError::Parse` for malformed JSON and `ApiError::Rejected` when
/// the backend did not report `success: true` with a `new_total`.
pub fn parse_cart_update(body: &str) -> Result<CartUpdate, ApiError> {
    let response: CartUpdateResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %excerpt(body),
            "Failed to parse cart update response"
        );
        ApiError::Parse(e)
    })?;

    response.outcome().ok_or(ApiError::Rejected)
}

/// Parse a search body into its product list.
///
/// # Errors
///
/// Returns `ApiError::Parse` for malformed JSON.
pub fn parse_search(body: &str) -> Result<Vec<ProductSummary>, ApiError> {
    let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %excerpt(body),
            "Failed to parse search response"
        );
        ApiError::Parse(e)
    })?;

    Ok(response.products)
}

fn excerpt(body: &str) -> String {
    body.chars().take(LOG_BODY_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        let config = ClientConfig::new(Url::parse("https://shop.example.com").unwrap());
        HttpApi::new(&config)
    }

    #[test]
    fn test_update_cart_url() {
        let url = api().update_cart_url(ProductId::new(12)).unwrap();
        assert_eq!(url.as_str(), "https://shop.example.com/api/update-cart/12");
    }

    #[test]
    fn test_search_url_encodes_query_component() {
        let url = api().search_url("dried fruit & nuts").unwrap();
        assert_eq!(
            url.as_str(),
            "https://shop.example.com/api/search?q=dried%20fruit%20%26%20nuts"
        );
        assert_eq!(url.query_pairs().next().unwrap().1, "dried fruit & nuts");
    }

    #[test]
    fn test_parse_cart_update_success() {
        let update = parse_cart_update(r#"{"success":true,"new_total":42.5}"#).unwrap();
        assert!((update.new_total - 42.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_cart_update_rejected() {
        assert!(matches!(
            parse_cart_update(r#"{"success":false}"#),
            Err(ApiError::Rejected)
        ));
        assert!(matches!(
            parse_cart_update(r#"{"error":"out of stock"}"#),
            Err(ApiError::Rejected)
        ));
    }

    #[test]
    fn test_parse_cart_update_malformed() {
        assert!(matches!(
            parse_cart_update("<html>500</html>"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_search() {
        let products = parse_search(
            r#"{"products":[{"id":1,"name":"Pineapple Rings","description":"Sweet","price":8.5}]}"#,
        )
        .unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Pineapple Rings");

        assert!(parse_search(r#"{"products":[]}"#).unwrap().is_empty());
        assert!(matches!(parse_search("nope"), Err(ApiError::Parse(_))));
    }
}
