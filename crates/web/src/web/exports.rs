//! Functions exposed to page scripts, as wasm exports and on
//! `window.ECommerceApp`.

use js_sys::{Object, Reflect};
use shopfront_core::NotificationKind;
use wasm_bindgen::prelude::*;

use super::document::{BrowserDocument, BrowserElement};
use crate::widgets::{add_to_cart, cart, loading, notifications};

/// Global the helpers are published under.
pub const NAMESPACE: &str = "ECommerceApp";

#[wasm_bindgen(js_name = addLoadingState)]
pub fn add_loading_state(button: web_sys::Element) {
    loading::add_loading_state(&BrowserElement::new(button));
}

#[wasm_bindgen(js_name = updateCartQuantity)]
pub fn update_cart_quantity(input: web_sys::Element) {
    match super::page() {
        Some(state) => cart::update_cart_quantity(&state, &BrowserElement::new(input)),
        None => tracing::warn!("updateCartQuantity called before the page was initialized"),
    }
}

#[wasm_bindgen(js_name = animateAddToCart)]
pub fn animate_add_to_cart(button: web_sys::Element) {
    add_to_cart::animate_add_to_cart(&BrowserElement::new(button));
}

/// `kind` is `"success"`, `"error"`, `"warning"`, or anything else for info.
#[wasm_bindgen(js_name = showNotification)]
pub fn show_notification(message: &str, kind: Option<String>) {
    let kind = kind
        .as_deref()
        .map_or(NotificationKind::Info, NotificationKind::from_name);
    if let Some(document) = BrowserDocument::current() {
        notifications::show_notification(&document, message, kind);
    }
}

#[wasm_bindgen(js_name = validateEmail)]
#[must_use]
pub fn validate_email(email: &str) -> bool {
    shopfront_core::validate_email(email)
}

#[wasm_bindgen(js_name = validatePhone)]
#[must_use]
pub fn validate_phone(phone: &str) -> bool {
    shopfront_core::validate_phone(phone)
}

#[wasm_bindgen(js_name = formatCurrency)]
#[must_use]
pub fn format_currency(amount: f64) -> String {
    shopfront_core::format_currency(amount)
}

/// Publish the helpers as `window.ECommerceApp`.
pub(super) fn publish_namespace() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let namespace = Object::new();

    set(
        &namespace,
        "addLoadingState",
        Closure::<dyn Fn(web_sys::Element)>::new(add_loading_state).into_js_value(),
    )?;
    set(
        &namespace,
        "updateCartQuantity",
        Closure::<dyn Fn(web_sys::Element)>::new(update_cart_quantity).into_js_value(),
    )?;
    set(
        &namespace,
        "animateAddToCart",
        Closure::<dyn Fn(web_sys::Element)>::new(animate_add_to_cart).into_js_value(),
    )?;
    set(
        &namespace,
        "showNotification",
        Closure::<dyn Fn(JsValue, JsValue)>::new(|message: JsValue, kind: JsValue| {
            let message = message.as_string().unwrap_or_default();
            show_notification(&message, kind.as_string());
        })
        .into_js_value(),
    )?;
    set(
        &namespace,
        "validateEmail",
        Closure::<dyn Fn(String) -> bool>::new(|email: String| validate_email(&email))
            .into_js_value(),
    )?;
    set(
        &namespace,
        "validatePhone",
        Closure::<dyn Fn(String) -> bool>::new(|phone: String| validate_phone(&phone))
            .into_js_value(),
    )?;
    set(
        &namespace,
        "formatCurrency",
        Closure::<dyn Fn(f64) -> String>::new(format_currency).into_js_value(),
    )?;

    set(&window, NAMESPACE, namespace.into())
}

fn set(target: &JsValue, name: &str, value: JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(name), &value)?;
    Ok(())
}
