//! The slice of the DOM the widgets rely on.
//!
//! [`Document`] is implemented over `web-sys` for the browser (`web` module)
//! and over an in-memory tree for tests (`testing` module). All handles are
//! cheap to clone and refer to the same underlying node.
//!
//! Lookups return `Option`/`Vec` instead of errors: a missing element is a
//! normal condition on pages that don't carry a given widget.

/// Position argument of `insertAdjacentHTML`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
}

impl InsertPosition {
    /// The DOM spelling of the position.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
        }
    }
}

/// A document the widgets can query, listen on and navigate from.
pub trait Document: Clone + 'static {
    type Element: Element;
    type Event: DomEvent;
    type Observer: VisibilityObserver<Element = Self::Element>;

    /// First element matching a CSS selector.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// All elements matching a CSS selector, in document order.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Element with the given `id` attribute.
    fn get_element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Register `listener` for `event` on `target` for the lifetime of the page.
    fn add_event_listener<F>(&self, target: &Self::Element, event: &str, listener: F)
    where
        F: Fn(&Self::Event) + 'static;

    /// Create a viewport-intersection observer.
    ///
    /// `on_visible` runs for each observed element that enters the viewport,
    /// together with the observer so it can stop watching.
    fn observe_visibility<F>(&self, on_visible: F) -> Self::Observer
    where
        F: Fn(&Self::Element, &Self::Observer) + 'static;

    /// Send the browser to `href`.
    fn navigate(&self, href: &str);

    /// Attach a Bootstrap tooltip to `target`.
    fn init_tooltip(&self, target: &Self::Element);

    /// Close an alert through Bootstrap's dismiss mechanism.
    fn close_alert(&self, alert: &Self::Element);
}

/// An element handle.
pub trait Element: Clone + 'static {
    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);
    fn text_content(&self) -> String;
    fn set_text_content(&self, text: &str);

    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);

    fn has_class(&self, class: &str) -> bool;
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);

    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);

    /// Current value of a form control; empty for other elements.
    fn value(&self) -> String;

    /// Link target. Anchors resolve it against the document URL in the browser.
    fn href(&self) -> Option<String> {
        self.attribute("href")
    }

    fn parent(&self) -> Option<Self>;

    /// Nearest inclusive ancestor matching `selector`.
    fn closest(&self, selector: &str) -> Option<Self>;

    /// First descendant matching `selector`.
    fn query_selector(&self, selector: &str) -> Option<Self>;

    /// Native constraint validation (`checkValidity()`).
    fn check_validity(&self) -> bool;

    fn insert_adjacent_html(&self, position: InsertPosition, html: &str);
}

/// The part of an event a listener can act on.
pub trait DomEvent {
    fn prevent_default(&self);
    fn stop_propagation(&self);
}

/// Handle to an intersection observer created by [`Document::observe_visibility`].
pub trait VisibilityObserver: Clone + 'static {
    type Element;

    fn observe(&self, target: &Self::Element);
    fn unobserve(&self, target: &Self::Element);
}
