//! In-memory [`Document`] for driving widgets without a browser.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use shopfront_core::validate_email;

use super::selector::Selector;
use super::tree::{NodeId, Tree};
use crate::dom::{Document, DomEvent, Element, InsertPosition, VisibilityObserver};

type Listener = Rc<dyn Fn(&FakeEvent)>;
type VisibleCallback = Rc<dyn Fn(&FakeElement, &FakeObserver)>;

struct RegisteredListener {
    target: NodeId,
    event: String,
    listener: Listener,
}

struct ObserverEntry {
    targets: Vec<NodeId>,
    on_visible: VisibleCallback,
}

/// Everything behind a [`FakeDocument`] handle.
struct Page {
    tree: Tree,
    listeners: Vec<RegisteredListener>,
    observers: Vec<ObserverEntry>,
    navigations: Vec<String>,
    tooltips: Vec<NodeId>,
    closed_alerts: Vec<NodeId>,
}

type SharedPage = Rc<RefCell<Page>>;

/// An in-memory page.
///
/// Parses real markup, runs listeners synchronously on [`dispatch`], and
/// records the side effects that need a browser: navigations, Bootstrap
/// tooltips and closed alerts. Listeners are invoked with no borrow held, so
/// they may freely mutate the page.
///
/// [`dispatch`]: FakeDocument::dispatch
#[derive(Clone)]
pub struct FakeDocument {
    page: SharedPage,
}

impl FakeDocument {
    /// Load a page from HTML.
    #[must_use]
    pub fn from_html(html: &str) -> Self {
        Self {
            page: Rc::new(RefCell::new(Page {
                tree: Tree::parse(html),
                listeners: Vec::new(),
                observers: Vec::new(),
                navigations: Vec::new(),
                tooltips: Vec::new(),
                closed_alerts: Vec::new(),
            })),
        }
    }

    /// First element matching `selector`.
    ///
    /// # Panics
    ///
    /// Panics if nothing matches.
    #[must_use]
    #[track_caller]
    pub fn get(&self, selector: &str) -> FakeElement {
        self.query_selector(selector)
            .unwrap_or_else(|| panic!("no element matches `{selector}`"))
    }

    /// Serialized markup of the whole page.
    #[must_use]
    pub fn html(&self) -> String {
        let page = self.page.borrow();
        page.tree.inner_html(page.tree.root())
    }

    /// Fire `event` at `target`, bubbling through its ancestors.
    ///
    /// Returns the event so callers can inspect what listeners did with it.
    pub fn dispatch(&self, target: &FakeElement, event: &str) -> FakeEvent {
        let event = FakeEvent::new(event);

        let mut path = vec![target.node];
        {
            let page = self.page.borrow();
            let mut current = page.tree.node(target.node).parent;
            while let Some(node) = current {
                path.push(node);
                current = page.tree.node(node).parent;
            }
        }

        for node in path {
            let listeners: Vec<Listener> = self
                .page
                .borrow()
                .listeners
                .iter()
                .filter(|l| l.target == node && l.event == event.kind)
                .map(|l| Rc::clone(&l.listener))
                .collect();

            for listener in listeners {
                listener(&event);
            }
            if event.propagation_stopped() {
                break;
            }
        }

        event
    }

    pub fn click(&self, target: &FakeElement) -> FakeEvent {
        self.dispatch(target, "click")
    }

    pub fn submit(&self, form: &FakeElement) -> FakeEvent {
        self.dispatch(form, "submit")
    }

    /// Set a control's value and fire `change`.
    pub fn change_value(&self, input: &FakeElement, value: &str) -> FakeEvent {
        input.set_value(value);
        self.dispatch(input, "change")
    }

    /// Type `text` one character at a time, firing `input` after each.
    pub fn type_text(&self, input: &FakeElement, text: &str) {
        for c in text.chars() {
            let mut value = input.value();
            value.push(c);
            input.set_value(&value);
            self.dispatch(input, "input");
        }
    }

    /// Delete the last character of a control's value and fire `input`.
    pub fn backspace(&self, input: &FakeElement) {
        let mut value = input.value();
        value.pop();
        input.set_value(&value);
        self.dispatch(input, "input");
    }

    /// Scroll `target` into view: notify every observer watching it.
    pub fn reveal(&self, target: &FakeElement) {
        let watching: Vec<(usize, VisibleCallback)> = self
            .page
            .borrow()
            .observers
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.targets.contains(&target.node))
            .map(|(index, entry)| (index, Rc::clone(&entry.on_visible)))
            .collect();

        for (index, on_visible) in watching {
            let observer = FakeObserver {
                page: Rc::clone(&self.page),
                index,
            };
            on_visible(target, &observer);
        }
    }

    /// Whether any observer is watching `target`.
    #[must_use]
    pub fn is_observed(&self, target: &FakeElement) -> bool {
        self.page
            .borrow()
            .observers
            .iter()
            .any(|entry| entry.targets.contains(&target.node))
    }

    /// Hrefs passed to [`Document::navigate`], in order.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.page.borrow().navigations.clone()
    }

    /// Elements given a Bootstrap tooltip.
    #[must_use]
    pub fn tooltips(&self) -> Vec<FakeElement> {
        let nodes = self.page.borrow().tooltips.clone();
        nodes.into_iter().map(|node| self.wrap(node)).collect()
    }

    /// Alerts closed through Bootstrap, in order.
    #[must_use]
    pub fn closed_alerts(&self) -> Vec<FakeElement> {
        let nodes = self.page.borrow().closed_alerts.clone();
        nodes.into_iter().map(|node| self.wrap(node)).collect()
    }

    fn wrap(&self, node: NodeId) -> FakeElement {
        FakeElement {
            page: Rc::clone(&self.page),
            node,
        }
    }

    fn select(&self, scope: NodeId, selector: &str) -> Vec<FakeElement> {
        let Some(selector) = Selector::parse(selector) else {
            tracing::warn!(selector, "Unsupported selector in fake document");
            return Vec::new();
        };
        let page = self.page.borrow();
        page.tree
            .descendants(scope)
            .into_iter()
            .filter(|node| selector.matches(&page.tree, *node))
            .map(|node| self.wrap(node))
            .collect()
    }
}

impl fmt::Debug for FakeDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeDocument").finish_non_exhaustive()
    }
}

impl Document for FakeDocument {
    type Element = FakeElement;
    type Event = FakeEvent;
    type Observer = FakeObserver;

    fn query_selector(&self, selector: &str) -> Option<FakeElement> {
        let root = self.page.borrow().tree.root();
        self.select(root, selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<FakeElement> {
        let root = self.page.borrow().tree.root();
        self.select(root, selector)
    }

    fn get_element_by_id(&self, id: &str) -> Option<FakeElement> {
        let page = self.page.borrow();
        page.tree
            .descendants(page.tree.root())
            .into_iter()
            .find(|node| page.tree.attr(*node, "id").as_deref() == Some(id))
            .map(|node| self.wrap(node))
    }

    fn add_event_listener<F>(&self, target: &FakeElement, event: &str, listener: F)
    where
        F: Fn(&FakeEvent) + 'static,
    {
        self.page.borrow_mut().listeners.push(RegisteredListener {
            target: target.node,
            event: event.to_string(),
            listener: Rc::new(listener),
        });
    }

    fn observe_visibility<F>(&self, on_visible: F) -> FakeObserver
    where
        F: Fn(&FakeElement, &FakeObserver) + 'static,
    {
        let mut page = self.page.borrow_mut();
        page.observers.push(ObserverEntry {
            targets: Vec::new(),
            on_visible: Rc::new(on_visible),
        });
        FakeObserver {
            page: Rc::clone(&self.page),
            index: page.observers.len() - 1,
        }
    }

    fn navigate(&self, href: &str) {
        self.page.borrow_mut().navigations.push(href.to_string());
    }

    fn init_tooltip(&self, target: &FakeElement) {
        self.page.borrow_mut().tooltips.push(target.node);
    }

    fn close_alert(&self, alert: &FakeElement) {
        let mut page = self.page.borrow_mut();
        page.closed_alerts.push(alert.node);
        page.tree.detach(alert.node);
    }
}

/// Element handle into a [`FakeDocument`].
#[derive(Clone)]
pub struct FakeElement {
    page: SharedPage,
    node: NodeId,
}

impl FakeElement {
    /// Set a form control's current value without firing events.
    pub fn set_value(&self, value: &str) {
        if let Some(element) = self.page.borrow_mut().tree.element_mut(self.node) {
            element.value = value.to_string();
        }
    }

    /// Whether the element is still in the document.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.page.borrow().tree.is_attached(self.node)
    }

    /// Lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> String {
        self.page
            .borrow()
            .tree
            .element(self.node)
            .map(|element| element.tag.clone())
            .unwrap_or_default()
    }

    /// Constraint validation for a single control.
    fn control_is_valid(&self) -> bool {
        let page = self.page.borrow();
        let Some(element) = page.tree.element(self.node) else {
            return true;
        };
        if !matches!(element.tag.as_str(), "input" | "select" | "textarea")
            || element.attr("disabled").is_some()
        {
            return true;
        }

        let value = element.value.as_str();
        if element.attr("required").is_some() && value.is_empty() {
            return false;
        }
        if element.attr("type") == Some("email") && !value.is_empty() {
            return validate_email(value);
        }
        true
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.page, &other.page) && self.node == other.node
    }
}

impl fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let page = self.page.borrow();
        let mut html = String::new();
        page.tree.write_node(self.node, &mut html);
        f.debug_tuple("FakeElement").field(&html).finish()
    }
}

impl Element for FakeElement {
    fn inner_html(&self) -> String {
        self.page.borrow().tree.inner_html(self.node)
    }

    fn set_inner_html(&self, html: &str) {
        self.page.borrow_mut().tree.set_inner_html(self.node, html);
    }

    fn text_content(&self) -> String {
        self.page.borrow().tree.text_content(self.node)
    }

    fn set_text_content(&self, text: &str) {
        self.page.borrow_mut().tree.set_text_content(self.node, text);
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.page.borrow().tree.attr(self.node, name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.page.borrow_mut().tree.set_attr(self.node, name, value);
    }

    fn has_class(&self, class: &str) -> bool {
        self.page
            .borrow()
            .tree
            .element(self.node)
            .is_some_and(|element| element.has_class(class))
    }

    fn add_class(&self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{} {class}", existing.trim()),
            _ => class.to_string(),
        };
        self.set_attribute("class", &classes);
    }

    fn remove_class(&self, class: &str) {
        let Some(existing) = self.attribute("class") else {
            return;
        };
        let classes: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        self.set_attribute("class", &classes.join(" "));
    }

    fn is_disabled(&self) -> bool {
        self.attribute("disabled").is_some()
    }

    fn set_disabled(&self, disabled: bool) {
        if disabled {
            self.set_attribute("disabled", "");
        } else {
            self.page.borrow_mut().tree.remove_attr(self.node, "disabled");
        }
    }

    fn value(&self) -> String {
        self.page
            .borrow()
            .tree
            .element(self.node)
            .map(|element| element.value.clone())
            .unwrap_or_default()
    }

    fn parent(&self) -> Option<Self> {
        let parent = self.page.borrow().tree.parent_element(self.node)?;
        Some(Self {
            page: Rc::clone(&self.page),
            node: parent,
        })
    }

    fn closest(&self, selector: &str) -> Option<Self> {
        let selector = Selector::parse(selector)?;
        let page = self.page.borrow();
        let mut current = page.tree.element(self.node).map(|_| self.node);
        while let Some(node) = current {
            if selector.matches(&page.tree, node) {
                return Some(Self {
                    page: Rc::clone(&self.page),
                    node,
                });
            }
            current = page.tree.parent_element(node);
        }
        None
    }

    fn query_selector(&self, selector: &str) -> Option<Self> {
        let document = FakeDocument {
            page: Rc::clone(&self.page),
        };
        document.select(self.node, selector).into_iter().next()
    }

    fn check_validity(&self) -> bool {
        let descendants = self.page.borrow().tree.descendants(self.node);
        self.control_is_valid()
            && descendants.into_iter().all(|node| {
                Self {
                    page: Rc::clone(&self.page),
                    node,
                }
                .control_is_valid()
            })
    }

    fn insert_adjacent_html(&self, position: InsertPosition, html: &str) {
        self.page
            .borrow_mut()
            .tree
            .insert_adjacent_html(self.node, position, html);
    }
}

/// Event passed to listeners; records what they did with it.
#[derive(Debug)]
pub struct FakeEvent {
    kind: String,
    default_prevented: Cell<bool>,
    propagation_stopped: Cell<bool>,
}

impl FakeEvent {
    fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            default_prevented: Cell::new(false),
            propagation_stopped: Cell::new(false),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }

    #[must_use]
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped.get()
    }
}

impl DomEvent for FakeEvent {
    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

/// Observer handle created by [`FakeDocument::observe_visibility`].
#[derive(Clone)]
pub struct FakeObserver {
    page: SharedPage,
    index: usize,
}

impl fmt::Debug for FakeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeObserver")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}

impl VisibilityObserver for FakeObserver {
    type Element = FakeElement;

    fn observe(&self, target: &FakeElement) {
        if let Some(entry) = self.page.borrow_mut().observers.get_mut(self.index) {
            if !entry.targets.contains(&target.node) {
                entry.targets.push(target.node);
            }
        }
    }

    fn unobserve(&self, target: &FakeElement) {
        if let Some(entry) = self.page.borrow_mut().observers.get_mut(self.index) {
            entry.targets.retain(|node| *node != target.node);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_query_and_mutate() {
        let doc = FakeDocument::from_html(
            r#"<div class="container"><span id="total" class="cart-total">$0.00</span></div>"#,
        );
        let total = doc.get_element_by_id("total").unwrap();

        total.set_text_content("$42.50");
        total.add_class("updated");
        total.remove_class("cart-total");

        assert_eq!(doc.get(".updated").text_content(), "$42.50");
        assert!(doc.query_selector(".cart-total").is_none());
        assert_eq!(total.parent().unwrap(), doc.get(".container"));
    }

    #[test]
    fn test_dispatch_bubbles_until_stopped() {
        let doc = FakeDocument::from_html(r#"<div id="outer"><form id="inner"></form></div>"#);
        let outer = doc.get("#outer");
        let inner = doc.get("#inner");
        let seen = Rc::new(RefCell::new(Vec::new()));

        let log = Rc::clone(&seen);
        doc.add_event_listener(&outer, "submit", move |_| log.borrow_mut().push("outer"));
        let log = Rc::clone(&seen);
        doc.add_event_listener(&inner, "submit", move |_| log.borrow_mut().push("inner"));

        doc.submit(&inner);
        assert_eq!(*seen.borrow(), ["inner", "outer"]);

        seen.borrow_mut().clear();
        doc.add_event_listener(&inner, "submit", |event| event.stop_propagation());
        let event = doc.submit(&inner);
        assert!(event.propagation_stopped());
        assert_eq!(*seen.borrow(), ["inner"]);
    }

    #[test]
    fn test_check_validity() {
        let doc = FakeDocument::from_html(
            r#"<form><input name="email" type="email" required><input name="note"></form>"#,
        );
        let form = doc.get("form");
        let email = doc.get(r#"input[name="email"]"#);

        assert!(!form.check_validity());
        email.set_value("not-an-email");
        assert!(!form.check_validity());
        email.set_value("a@b.co");
        assert!(form.check_validity());
        assert!(doc.get(r#"input[name="note"]"#).check_validity());
    }

    #[test]
    fn test_observer_reveal() {
        let doc = FakeDocument::from_html(r#"<img data-src="a.png"><img data-src="b.png">"#);
        let images = doc.query_selector_all("img");
        let revealed = Rc::new(Cell::new(0));

        let count = Rc::clone(&revealed);
        let observer = doc.observe_visibility(move |img, observer| {
            count.set(count.get() + 1);
            observer.unobserve(img);
        });
        observer.observe(&images[0]);

        doc.reveal(&images[1]);
        assert_eq!(revealed.get(), 0);

        doc.reveal(&images[0]);
        doc.reveal(&images[0]);
        assert_eq!(revealed.get(), 1);
        assert!(!doc.is_observed(&images[0]));
    }

    #[test]
    fn test_close_alert_detaches() {
        let doc = FakeDocument::from_html(r#"<div class="alert alert-info">Hi</div>"#);
        let alert = doc.get(".alert");

        doc.close_alert(&alert);
        assert!(!alert.is_attached());
        assert!(doc.query_selector(".alert").is_none());
        assert_eq!(doc.closed_alerts(), [alert]);
    }
}
