//! Submit button loading state.
//!
//! A submit button in a valid form shows a spinner and is disabled while the
//! browser submits. The original content comes back after a fixed delay
//! whether or not the submission has finished.

use std::time::Duration;

use crate::dom::{Document, Element};
use crate::markup::LOADING_MARKUP;
use crate::runtime;

/// How long a button stays in the loading state.
pub const LOADING_RESTORE_DELAY: Duration = Duration::from_millis(3000);

const SUBMIT_BUTTON_SELECTOR: &str = r#".btn[type="submit"]"#;

/// Show the loading state on submit buttons whose form is valid.
pub fn init<D: Document>(document: &D) {
    for button in document.query_selector_all(SUBMIT_BUTTON_SELECTOR) {
        let target = button.clone();
        document.add_event_listener(&button, "click", move |_| {
            if target.closest("form").is_some_and(|form| form.check_validity()) {
                add_loading_state(&target);
            }
        });
    }
}

/// Replace `button`'s content with a spinner and disable it until
/// [`LOADING_RESTORE_DELAY`] has passed.
pub fn add_loading_state<E: Element>(button: &E) {
    let original = button.inner_html();
    button.set_inner_html(LOADING_MARKUP);
    button.set_disabled(true);

    let button = button.clone();
    runtime::spawn_after(LOADING_RESTORE_DELAY, move || {
        button.set_inner_html(&original);
        button.set_disabled(false);
    });
}
