//! Browser entry point and `web-sys` bindings (wasm32 only).
//!
//! The start function boots the page once the DOM is parsed: configuration
//! from meta tags, console logging, the HTTP client, then every widget. The
//! booted page state is kept for the exported functions.

// `#[wasm_bindgen]` expands to unsafe FFI glue.
#![allow(unsafe_code)]

mod bootstrap;
mod console;
mod document;
mod exports;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub use console::ConsoleWriter;
pub use document::{BrowserDocument, BrowserElement, BrowserEvent, BrowserObserver};

use crate::api::HttpApi;
use crate::config::ClientConfig;
use crate::state::PageState;
use crate::{logging, widgets};

type BrowserState = PageState<BrowserDocument, HttpApi>;

thread_local! {
    static PAGE: RefCell<Option<BrowserState>> = const { RefCell::new(None) };
}

/// Module start: boot now, or once `DOMContentLoaded` fires.
///
/// # Errors
///
/// Returns an error if there is no document to attach to.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = BrowserDocument::current().ok_or_else(|| JsValue::from_str("No document"))?;
    if document.is_loading() {
        document.on_content_loaded(boot);
    } else {
        boot();
    }
    Ok(())
}

fn boot() {
    if let Err(e) = try_boot() {
        web_sys::console::error_2(&JsValue::from_str("Storefront failed to start:"), &e);
    }
}

fn try_boot() -> Result<(), JsValue> {
    let document = BrowserDocument::current().ok_or_else(|| JsValue::from_str("No document"))?;
    let origin = document.origin().unwrap_or_default();
    let (config, config_error) = ClientConfig::from_page_or_default(&document, &origin);

    if let Err(e) = logging::init(&config.log_filter, ConsoleWriter) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("Logging not initialized: {e}")));
    }
    if let Some(e) = config_error {
        tracing::warn!(error = %e, origin = %origin, "Invalid client configuration, API calls disabled");
    }
    tracing::debug!(api_base = ?config.api_base, "Loaded client configuration");

    let api = HttpApi::new(&config);
    let state = PageState::new(document, api);
    widgets::init(&state);
    PAGE.with(|page| *page.borrow_mut() = Some(state));

    exports::publish_namespace()
}

/// The booted page, if `start` has run to completion.
fn page() -> Option<BrowserState> {
    PAGE.with(|page| page.borrow().clone())
}
