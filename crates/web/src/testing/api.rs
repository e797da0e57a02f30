//! Scripted [`StorefrontApi`].

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use shopfront_core::{CartUpdate, ProductId, ProductSummary, SearchResponse};

use crate::api::{StorefrontApi, parse_cart_update, parse_search};
use crate::error::ApiError;
use crate::runtime;

/// Body returned when no cart reply is scripted.
const DEFAULT_CART_BODY: &str = r#"{"success":false}"#;

/// Body returned when no search reply is scripted.
const DEFAULT_SEARCH_BODY: &str = r#"{"products":[]}"#;

/// Body that fails to parse, standing in for a transport failure.
const FAILURE_BODY: &str = "<html><body>502 Bad Gateway</body></html>";

/// A request the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    UpdateCart { product_id: ProductId, quantity: u32 },
    Search { query: String },
}

#[derive(Debug, Clone)]
struct Reply {
    body: String,
    delay: Duration,
}

#[derive(Debug, Default)]
struct FakeApiInner {
    cart_replies: VecDeque<Reply>,
    search_replies: VecDeque<Reply>,
    calls: Vec<ApiCall>,
}

/// A [`StorefrontApi`] answering from scripted response bodies.
///
/// Replies are consumed in order and go through the same parsing as
/// [`HttpApi`](crate::HttpApi). Each reply may carry a delay, so tests can
/// make responses settle out of order. Clones share the script and the call
/// log.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    inner: Rc<RefCell<FakeApiInner>>,
}

impl FakeApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw cart update body.
    pub fn reply_cart(&self, body: &str) -> &Self {
        self.reply_cart_after(Duration::ZERO, body)
    }

    /// Queue a raw cart update body delivered after `delay`.
    pub fn reply_cart_after(&self, delay: Duration, body: &str) -> &Self {
        self.inner.borrow_mut().cart_replies.push_back(Reply {
            body: body.to_string(),
            delay,
        });
        self
    }

    /// Queue a confirmed cart update.
    pub fn reply_cart_total(&self, new_total: f64) -> &Self {
        self.reply_cart(&serde_json::json!({ "success": true, "new_total": new_total }).to_string())
    }

    /// Queue a cart update that fails before a usable body arrives.
    pub fn fail_cart(&self) -> &Self {
        self.reply_cart(FAILURE_BODY)
    }

    /// Queue search results.
    pub fn reply_search(&self, products: &[ProductSummary]) -> &Self {
        let response = SearchResponse {
            products: products.to_vec(),
        };
        let body = serde_json::to_string(&response).unwrap_or_default();
        self.reply_search_body(&body)
    }

    /// Queue a raw search body.
    pub fn reply_search_body(&self, body: &str) -> &Self {
        self.inner.borrow_mut().search_replies.push_back(Reply {
            body: body.to_string(),
            delay: Duration::ZERO,
        });
        self
    }

    /// Queue a search that fails before a usable body arrives.
    pub fn fail_search(&self) -> &Self {
        self.reply_search_body(FAILURE_BODY)
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.inner.borrow().calls.clone()
    }

    fn record(&self, call: ApiCall) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl StorefrontApi for FakeApi {
    async fn update_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartUpdate, ApiError> {
        self.record(ApiCall::UpdateCart {
            product_id,
            quantity,
        });
        let reply = self.inner.borrow_mut().cart_replies.pop_front();
        let reply = reply.unwrap_or_else(|| Reply {
            body: DEFAULT_CART_BODY.to_string(),
            delay: Duration::ZERO,
        });

        if !reply.delay.is_zero() {
            runtime::sleep(reply.delay).await;
        }
        parse_cart_update(&reply.body)
    }

    async fn search(&self, query: &str) -> Result<Vec<ProductSummary>, ApiError> {
        self.record(ApiCall::Search {
            query: query.to_string(),
        });
        let reply = self.inner.borrow_mut().search_replies.pop_front();
        let body = reply.map_or_else(|| DEFAULT_SEARCH_BODY.to_string(), |reply| reply.body);

        parse_search(&body)
    }
}
