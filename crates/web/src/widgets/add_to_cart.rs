//! "Added!" confirmation on add-to-cart links.
//!
//! Clicking holds the navigation back briefly so the confirmation is seen,
//! then follows the link. The animation and the navigation run on separate
//! timers; the page usually leaves before the button reverts.

use std::time::Duration;

use crate::dom::{Document, DomEvent, Element};
use crate::markup::ADDED_MARKUP;
use crate::runtime;

/// How long the confirmation stays on the button.
pub const ADDED_REVERT_DELAY: Duration = Duration::from_millis(1000);

/// Delay before following the link.
pub const NAVIGATE_DELAY: Duration = Duration::from_millis(800);

const ADD_TO_CART_SELECTOR: &str = ".add-to-cart";
const PRIMARY_CLASS: &str = "btn-primary";
const SUCCESS_CLASS: &str = "btn-success";

/// Animate add-to-cart links and delay their navigation.
pub fn init<D: Document>(document: &D) {
    for link in document.query_selector_all(ADD_TO_CART_SELECTOR) {
        let listener_document = document.clone();
        let target = link.clone();
        document.add_event_listener(&link, "click", move |event| {
            event.prevent_default();
            animate_add_to_cart(&target);

            let Some(href) = target.href() else {
                tracing::debug!("Add-to-cart link has no href");
                return;
            };
            let document = listener_document.clone();
            runtime::spawn_after(NAVIGATE_DELAY, move || document.navigate(&href));
        });
    }
}

/// Show the "Added!" state on `button` for [`ADDED_REVERT_DELAY`].
pub fn animate_add_to_cart<E: Element>(button: &E) {
    let original = button.inner_html();
    button.set_inner_html(ADDED_MARKUP);
    button.remove_class(PRIMARY_CLASS);
    button.add_class(SUCCESS_CLASS);

    let button = button.clone();
    runtime::spawn_after(ADDED_REVERT_DELAY, move || {
        button.set_inner_html(&original);
        button.remove_class(SUCCESS_CLASS);
        button.add_class(PRIMARY_CLASS);
    });
}

#[cfg(test)]
mod tests {
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use super::*;
    use crate::testing::FakeDocument;

    const PAGE: &str = r#"
        <a class="btn btn-primary add-to-cart" href="/cart/add/7"><i class="fas fa-cart-plus me-1"></i>Add to Cart</a>
        <a class="btn btn-primary add-to-cart" id="no-href">Add</a>
    "#;

    const MS: Duration = Duration::from_millis(1);

    #[tokio::test(start_paused = true)]
    async fn test_click_animates_then_navigates() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(PAGE);
                init(&doc);
                let link = doc.get(r#".add-to-cart[href="/cart/add/7"]"#);
                let original = link.inner_html();

                let event = doc.click(&link);
                assert!(event.default_prevented());
                assert!(doc.navigations().is_empty());
                assert_eq!(link.text_content(), "Added!");
                assert!(link.has_class("btn-success"));
                assert!(!link.has_class("btn-primary"));

                sleep(NAVIGATE_DELAY - MS).await;
                assert!(doc.navigations().is_empty());

                sleep(MS * 2).await;
                assert_eq!(doc.navigations(), ["/cart/add/7"]);
                assert_eq!(link.text_content(), "Added!");

                sleep(ADDED_REVERT_DELAY - NAVIGATE_DELAY).await;
                assert_eq!(link.inner_html(), original);
                assert!(link.has_class("btn-primary"));
                assert!(!link.has_class("btn-success"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_without_href_only_animates() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(PAGE);
                init(&doc);
                let link = doc.get("#no-href");

                let event = doc.click(&link);
                assert!(event.default_prevented());
                assert_eq!(link.text_content(), "Added!");

                sleep(ADDED_REVERT_DELAY + MS).await;
                assert!(doc.navigations().is_empty());
                assert_eq!(link.text_content(), "Add");
            })
            .await;
    }
}
