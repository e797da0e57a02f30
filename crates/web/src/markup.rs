//! HTML fragments injected into the page.
//!
//! Fragments built from backend or caller data go through askama templates
//! (`templates/partials/`) so text is HTML-escaped. Fixed markup is kept as
//! constants.

use askama::Template;
use shopfront_core::{NotificationKind, ProductSummary};

/// Button content while a form submission is in flight.
pub const LOADING_MARKUP: &str =
    r#"<span class="spinner-border spinner-border-sm me-2" role="status"></span>Loading..."#;

/// Add-to-cart button content during the confirmation animation.
pub const ADDED_MARKUP: &str = r#"<i class="fas fa-check me-1"></i>Added!"#;

/// A search result row, pre-formatted for display.
#[derive(Debug, Clone)]
pub struct SearchResultView {
    pub url: String,
    pub name: String,
    pub excerpt: String,
    pub price: String,
}

impl From<&ProductSummary> for SearchResultView {
    fn from(product: &ProductSummary) -> Self {
        Self {
            url: product.url(),
            name: product.name.clone(),
            excerpt: product.excerpt(),
            price: product.price_display(),
        }
    }
}

/// Search results list (or the empty-state message).
#[derive(Template)]
#[template(path = "partials/search_results.html")]
pub struct SearchResultsTemplate {
    pub items: Vec<SearchResultView>,
}

impl SearchResultsTemplate {
    #[must_use]
    pub fn new(products: &[ProductSummary]) -> Self {
        Self {
            items: products.iter().map(SearchResultView::from).collect(),
        }
    }
}

/// Dismissible notification banner.
#[derive(Template)]
#[template(path = "partials/notification.html")]
pub struct NotificationTemplate {
    pub message: String,
    pub alert_class: &'static str,
}

impl NotificationTemplate {
    #[must_use]
    pub fn new(message: &str, kind: NotificationKind) -> Self {
        Self {
            message: message.to_string(),
            alert_class: kind.alert_class(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;

    use super::*;

    fn product(id: i32, name: &str, description: &str, price: f64) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }

    #[test]
    fn test_empty_results() {
        let html = SearchResultsTemplate::new(&[]).render().unwrap();
        assert_eq!(html.trim(), r#"<p class="text-muted">No products found</p>"#);
    }

    #[test]
    fn test_result_rows() {
        let html = SearchResultsTemplate::new(&[
            product(1, "Dried Mango", "Chewy and sweet", 12.0),
            product(2, "Pineapple Chips", "", 7.255),
        ])
        .render()
        .unwrap();

        assert_eq!(html.matches("search-result-item").count(), 2);
        assert!(html.contains("Dried Mango"));
        assert!(html.contains("Chewy and sweet..."));
        assert!(html.contains("$12.00"));
        assert!(!html.contains("No products found"));
    }

    #[test]
    fn test_result_text_is_escaped() {
        let html = SearchResultsTemplate::new(&[product(3, "<b>Bold</b>", "", 1.0)])
            .render()
            .unwrap();
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;Bold"));
    }

    #[test]
    fn test_notification_banner() {
        let html = NotificationTemplate::new("Saved <now>", NotificationKind::Success)
            .render()
            .unwrap();

        assert!(html.contains(r#"class="alert alert-success alert-dismissible fade show""#));
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains(r#"data-bs-dismiss="alert""#));
        assert!(html.contains("Saved &lt;now&gt;"));
    }
}
