//! Deferred image loading.

use crate::dom::{Document, Element, VisibilityObserver};

const LAZY_IMAGE_SELECTOR: &str = "img[data-src]";
const LAZY_CLASS: &str = "lazy";

/// Load each `img[data-src]` the first time it scrolls into view.
pub fn init<D: Document>(document: &D) {
    let images = document.query_selector_all(LAZY_IMAGE_SELECTOR);
    if images.is_empty() {
        return;
    }

    let observer = document.observe_visibility(|image, observer| {
        if let Some(src) = image.attribute("data-src") {
            image.set_attribute("src", &src);
        }
        image.remove_class(LAZY_CLASS);
        observer.unobserve(image);
    });

    for image in &images {
        observer.observe(image);
    }
    tracing::debug!(count = images.len(), "Watching lazy images");
}
