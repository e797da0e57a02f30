//! Bindings to the page's global `bootstrap` bundle.
//!
//! Constructors are `catch` so a page without Bootstrap loaded logs an error
//! instead of trapping.

use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Tooltip)]
    pub type Tooltip;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Tooltip", catch)]
    pub fn new(element: &web_sys::Element) -> Result<Tooltip, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = bootstrap, js_name = Alert)]
    pub type Alert;

    #[wasm_bindgen(constructor, js_namespace = bootstrap, js_class = "Alert", catch)]
    pub fn new(element: &web_sys::Element) -> Result<Alert, JsValue>;

    #[wasm_bindgen(method, catch)]
    pub fn close(this: &Alert) -> Result<(), JsValue>;
}
