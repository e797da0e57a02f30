//! Bootstrap tooltips.

use crate::dom::Document;

/// Elements opting into a tooltip.
pub const TOOLTIP_SELECTOR: &str = r#"[data-bs-toggle="tooltip"]"#;

/// Attach a tooltip to every opted-in element.
pub fn init<D: Document>(document: &D) {
    let targets = document.query_selector_all(TOOLTIP_SELECTOR);
    for target in &targets {
        document.init_tooltip(target);
    }
    tracing::debug!(count = targets.len(), "Tooltips initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeDocument;

    #[test]
    fn test_init_only_opted_in_elements() {
        let doc = FakeDocument::from_html(
            r#"<a data-bs-toggle="tooltip" title="Wishlist">♥</a>
               <button data-bs-toggle="modal">Open</button>
               <span data-bs-toggle="tooltip" title="Free shipping">i</span>"#,
        );

        init(&doc);

        let tooltips = doc.tooltips();
        assert_eq!(tooltips.len(), 2);
        assert_eq!(tooltips[0], doc.get("a"));
        assert_eq!(tooltips[1], doc.get("span"));
    }
}
