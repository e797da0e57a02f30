//! Shopfront Web - browser-side storefront interactions.
//!
//! Compiled to `wasm32-unknown-unknown`, this crate attaches behaviour to the
//! server-rendered storefront markup: loading states on submit buttons, cart
//! quantity updates, lazy images, form validation, debounced product search,
//! the "add to cart" animation and notification banners.
//!
//! # Architecture
//!
//! - Widgets are written against the [`dom`] traits, never against `web-sys`
//!   directly, so the same code runs in the browser and in native tests.
//! - The backend is reached through the [`api::StorefrontApi`] trait;
//!   [`api::HttpApi`] is the `reqwest` implementation.
//! - Timers and tasks go through [`runtime`], which maps to the browser event
//!   loop on wasm and to a tokio `LocalSet` natively.
//! - [`state::PageState`] is the `Rc`-shared context handed to every widget.
//!
//! # Modules
//!
//! - [`widgets`] - one module per UI concern plus the page bootstrap
//! - [`markup`] - askama templates for injected HTML
//! - `web` (wasm only) - `web-sys` document, Bootstrap bindings, entry point
//! - `testing` (tests / `testing` feature) - in-memory document and scripted API

// wasm-bindgen expands to unsafe glue, so `forbid` only holds off-wasm.
#![cfg_attr(not(any(test, target_arch = "wasm32")), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod dom;
pub mod error;
pub mod logging;
pub mod markup;
pub mod runtime;
pub mod state;
pub mod widgets;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{HttpApi, StorefrontApi};
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError};
pub use state::PageState;
