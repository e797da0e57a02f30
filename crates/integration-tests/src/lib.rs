//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `http_api` - `HttpApi` against an in-process mock backend
//! - `page_flows` - whole pages wired with every widget, over the in-memory
//!   document and a scripted API
//!
//! Both run natively; nothing needs a browser or a live backend.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use axum::Router;
use axum::extract::{OriginalUri, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tokio::net::TcpListener;
use url::Url;

/// A request received by the [`MockBackend`].
///
/// `path` is the full request path, including any `/store` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub content_type: Option<String>,
    pub requested_with: Option<String>,
    pub body: String,
}

/// Canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
}

impl Reply {
    #[must_use]
    pub fn ok(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.to_string(),
        }
    }

    #[must_use]
    pub fn with_status(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }
}

#[derive(Debug)]
struct MockState {
    cart: Reply,
    search: Reply,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockState {
    fn record(&self, request: RecordedRequest) {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);
    }
}

/// Storefront backend stand-in serving the cart and search endpoints.
///
/// Routes are mounted at `/` and again under `/store/` for API bases with a
/// path.
#[derive(Debug)]
pub struct MockBackend {
    addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Bind an ephemeral port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(cart: Reply, search: Reply) -> std::io::Result<Self> {
        let state = Arc::new(MockState {
            cart,
            search,
            requests: Mutex::new(Vec::new()),
        });

        let api = Router::new()
            .route("/api/update-cart/{product_id}", post(update_cart))
            .route("/api/search", get(search_products));
        let router = Router::new()
            .merge(api.clone())
            .nest("/store", api)
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!(error = %e, "Mock backend stopped");
            }
        });

        Ok(Self { addr, state })
    }

    /// Base URL of the server root.
    #[must_use]
    pub fn base_url(&self) -> Url {
        self.url("/")
    }

    /// URL of `path` on the server.
    ///
    /// # Panics
    ///
    /// Panics if `path` does not form a valid URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}{path}", self.addr))
            .unwrap_or_else(|e| panic!("invalid mock URL for {path}: {e}"))
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn update_cart(
    State(state): State<Arc<MockState>>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record(RecordedRequest {
        path: uri.path().to_string(),
        query: None,
        content_type: header_value(&headers, header::CONTENT_TYPE.as_str()),
        requested_with: header_value(&headers, "x-requested-with"),
        body,
    });
    json_reply(&state.cart)
}

async fn search_products(
    State(state): State<Arc<MockState>>,
    OriginalUri(uri): OriginalUri,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    state.record(RecordedRequest {
        path: uri.path().to_string(),
        query,
        content_type: header_value(&headers, header::CONTENT_TYPE.as_str()),
        requested_with: header_value(&headers, "x-requested-with"),
        body: String::new(),
    });
    json_reply(&state.search)
}

fn json_reply(reply: &Reply) -> Response {
    (
        reply.status,
        [(header::CONTENT_TYPE, "application/json")],
        reply.body.clone(),
    )
        .into_response()
}
