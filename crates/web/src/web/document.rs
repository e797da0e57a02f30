//! [`Document`] over `web-sys`.
//!
//! Listener and observer closures are leaked with `Closure::forget`: they
//! live as long as the page.

use js_sys::{Array, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlAnchorElement, HtmlButtonElement, HtmlFormElement, HtmlInputElement, IntersectionObserver,
    IntersectionObserverEntry, NodeList,
};

use super::bootstrap::{Alert, Tooltip};
use crate::dom::{Document, DomEvent, Element, InsertPosition, VisibilityObserver};

/// The page's `document`.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    /// The current window's document.
    #[must_use]
    pub fn current() -> Option<Self> {
        let document = web_sys::window()?.document()?;
        Some(Self { document })
    }

    /// Whether the document is still being parsed.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    /// Run `f` once the DOM has been parsed.
    pub fn on_content_loaded<F: FnOnce() + 'static>(&self, f: F) {
        let callback = Closure::once_into_js(f);
        if let Err(e) = self
            .document
            .add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
        {
            tracing::error!(error = ?e, "Failed to listen for DOMContentLoaded");
        }
    }

    /// `window.location.origin`.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if there is no window or the origin is
    /// unavailable.
    pub fn origin(&self) -> Result<String, JsValue> {
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))?
            .location()
            .origin()
    }
}

fn elements(list: &NodeList) -> Vec<BrowserElement> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .map(BrowserElement::new)
        .collect()
}

impl Document for BrowserDocument {
    type Element = BrowserElement;
    type Event = BrowserEvent;
    type Observer = BrowserObserver;

    fn query_selector(&self, selector: &str) -> Option<BrowserElement> {
        self.document
            .query_selector(selector)
            .ok()
            .flatten()
            .map(BrowserElement::new)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<BrowserElement> {
        self.document
            .query_selector_all(selector)
            .map(|list| elements(&list))
            .unwrap_or_default()
    }

    fn get_element_by_id(&self, id: &str) -> Option<BrowserElement> {
        self.document.get_element_by_id(id).map(BrowserElement::new)
    }

    fn add_event_listener<F>(&self, target: &BrowserElement, event: &str, listener: F)
    where
        F: Fn(&BrowserEvent) + 'static,
    {
        let callback = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            listener(&BrowserEvent(event));
        });
        if let Err(e) = target
            .element
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
        {
            tracing::error!(error = ?e, event, "Failed to add event listener");
        }
        callback.forget();
    }

    fn observe_visibility<F>(&self, on_visible: F) -> BrowserObserver
    where
        F: Fn(&BrowserElement, &BrowserObserver) + 'static,
    {
        let callback = Closure::<dyn Fn(Array, IntersectionObserver)>::new(
            move |entries: Array, observer: IntersectionObserver| {
                let observer = BrowserObserver {
                    observer: Some(observer),
                };
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        on_visible(&BrowserElement::new(entry.target()), &observer);
                    }
                }
            },
        );

        let observer = match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
            Ok(observer) => Some(observer),
            Err(e) => {
                tracing::warn!(error = ?e, "IntersectionObserver unavailable");
                None
            }
        };
        callback.forget();
        BrowserObserver { observer }
    }

    fn navigate(&self, href: &str) {
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("No window"))
            .and_then(|window| window.location().set_href(href));
        if let Err(e) = result {
            tracing::error!(error = ?e, href, "Navigation failed");
        }
    }

    fn init_tooltip(&self, target: &BrowserElement) {
        if let Err(e) = Tooltip::new(&target.element) {
            tracing::warn!(error = ?e, "Bootstrap tooltip unavailable");
        }
    }

    fn close_alert(&self, alert: &BrowserElement) {
        if let Err(e) = Alert::new(&alert.element).and_then(|alert| alert.close()) {
            tracing::warn!(error = ?e, "Failed to close alert");
        }
    }
}

/// A DOM element.
#[derive(Debug, Clone)]
pub struct BrowserElement {
    element: web_sys::Element,
}

impl BrowserElement {
    #[must_use]
    pub const fn new(element: web_sys::Element) -> Self {
        Self { element }
    }

    /// The underlying `web-sys` element.
    #[must_use]
    pub const fn as_element(&self) -> &web_sys::Element {
        &self.element
    }
}

impl Element for BrowserElement {
    fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn text_content(&self) -> String {
        self.element.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(e) = self.element.set_attribute(name, value) {
            tracing::warn!(error = ?e, name, "Failed to set attribute");
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.element.class_list().contains(class)
    }

    fn add_class(&self, class: &str) {
        let _ = self.element.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.element.class_list().remove_1(class);
    }

    fn is_disabled(&self) -> bool {
        if let Some(button) = self.element.dyn_ref::<HtmlButtonElement>() {
            button.disabled()
        } else if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.disabled()
        } else {
            self.element.has_attribute("disabled")
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.element.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        } else if disabled {
            self.set_attribute("disabled", "");
        } else {
            let _ = self.element.remove_attribute("disabled");
        }
    }

    fn value(&self) -> String {
        if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            return input.value();
        }
        // <select>, <textarea>
        Reflect::get(&self.element, &JsValue::from_str("value"))
            .ok()
            .and_then(|value| value.as_string())
            .unwrap_or_default()
    }

    fn href(&self) -> Option<String> {
        if !self.element.has_attribute("href") {
            return None;
        }
        match self.element.dyn_ref::<HtmlAnchorElement>() {
            Some(anchor) => Some(anchor.href()),
            None => self.attribute("href"),
        }
    }

    fn parent(&self) -> Option<Self> {
        self.element.parent_element().map(Self::new)
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        self.element.closest(selector).ok().flatten().map(Self::new)
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        self.element
            .query_selector(selector)
            .ok()
            .flatten()
            .map(Self::new)
    }

    fn check_validity(&self) -> bool {
        if let Some(form) = self.element.dyn_ref::<HtmlFormElement>() {
            form.check_validity()
        } else if let Some(input) = self.element.dyn_ref::<HtmlInputElement>() {
            input.check_validity()
        } else {
            true
        }
    }

    fn insert_adjacent_html(&self, position: InsertPosition, html: &str) {
        if let Err(e) = self.element.insert_adjacent_html(position.as_str(), html) {
            tracing::warn!(error = ?e, "Failed to insert HTML");
        }
    }
}

/// A DOM event.
#[derive(Debug, Clone)]
pub struct BrowserEvent(web_sys::Event);

impl DomEvent for BrowserEvent {
    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

/// An `IntersectionObserver`, or nothing where the browser lacks one.
#[derive(Debug, Clone)]
pub struct BrowserObserver {
    observer: Option<IntersectionObserver>,
}

impl VisibilityObserver for BrowserObserver {
    type Element = BrowserElement;

    fn observe(&self, target: &BrowserElement) {
        if let Some(observer) = &self.observer {
            observer.observe(&target.element);
        }
    }

    fn unobserve(&self, target: &BrowserElement) {
        if let Some(observer) = &self.observer {
            observer.unobserve(&target.element);
        }
    }
}
