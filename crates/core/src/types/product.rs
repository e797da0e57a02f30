//! Wire types for the cart and search endpoints.
//!
//! - `POST /api/update-cart/{product_id}` sends [`CartUpdateRequest`] and
//!   receives [`CartUpdateResponse`].
//! - `GET /api/search?q=...` receives [`SearchResponse`].

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::format_fixed_price;

/// Length of the description shown in a search row, in UTF-16 code units.
pub const EXCERPT_LEN: usize = 100;

/// A product as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
}

impl ProductSummary {
    /// First 100 UTF-16 code units of the description followed by `...`.
    ///
    /// The ellipsis is appended whether or not anything was cut. A character
    /// that would straddle the limit is left out rather than split.
    #[must_use]
    pub fn excerpt(&self) -> String {
        let mut units = 0;
        let mut excerpt: String = self
            .description
            .chars()
            .take_while(|c| {
                units += c.len_utf16();
                units <= EXCERPT_LEN
            })
            .collect();
        excerpt.push_str("...");
        excerpt
    }

    /// Price as shown in search rows (e.g., "$19.99").
    #[must_use]
    pub fn price_display(&self) -> String {
        format_fixed_price(self.price)
    }

    /// Storefront path of the product detail page.
    #[must_use]
    pub fn url(&self) -> String {
        format!("/product/{}", self.id)
    }
}

/// Body of `GET /api/search`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Vec<ProductSummary>,
}

/// Body of `POST /api/update-cart/{product_id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartUpdateRequest {
    pub quantity: u32,
}

/// Raw body returned by the cart update endpoint.
///
/// Both fields are optional on the wire; see [`CartUpdateResponse::outcome`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartUpdateResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub new_total: Option<f64>,
}

/// A cart update the backend confirmed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartUpdate {
    pub new_total: f64,
}

impl CartUpdateResponse {
    /// The confirmed update, if the backend reported one.
    ///
    /// `None` when `success` is false or absent, or when it is `true` but no
    /// `new_total` came with it.
    #[must_use]
    pub fn outcome(self) -> Option<CartUpdate> {
        match (self.success, self.new_total) {
            (Some(true), Some(new_total)) => Some(CartUpdate { new_total }),
            _ => None,
        }
    }
}
