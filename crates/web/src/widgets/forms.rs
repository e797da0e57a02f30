//! Native constraint validation for `.needs-validation` forms.

use crate::dom::{Document, DomEvent, Element};

const VALIDATED_FORM_SELECTOR: &str = ".needs-validation";
const WAS_VALIDATED_CLASS: &str = "was-validated";

/// Block invalid submissions and reveal validation styling.
pub fn init<D: Document>(document: &D) {
    for form in document.query_selector_all(VALIDATED_FORM_SELECTOR) {
        let target = form.clone();
        document.add_event_listener(&form, "submit", move |event| {
            if !target.check_validity() {
                event.prevent_default();
                event.stop_propagation();
            }
            target.add_class(WAS_VALIDATED_CLASS);
        });
    }
}
