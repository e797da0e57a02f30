//! Page bootstrap.

use super::{add_to_cart, cart, forms, lazy_images, loading, notifications, search, tooltips};
use crate::api::StorefrontApi;
use crate::dom::Document;
use crate::state::PageState;

/// Wire every widget to the current page.
///
/// Call once, after the document has loaded. Widgets whose markup is absent
/// are skipped.
pub fn init<D, A>(state: &PageState<D, A>)
where
    D: Document,
    A: StorefrontApi,
{
    let document = state.document();

    tooltips::init(document);
    loading::init(document);
    cart::init(state);
    lazy_images::init(document);
    forms::init(document);
    search::init(state);
    add_to_cart::init(document);
    notifications::init(document);

    tracing::info!("Storefront page initialized");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use super::*;
    use crate::dom::Element;
    use crate::widgets::test_support::fake_page;

    #[tokio::test(start_paused = true)]
    async fn test_bare_page_is_noop() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page("<main><h1>About us</h1></main>");
                init(&state);

                sleep(Duration::from_secs(10)).await;
                assert!(api.calls().is_empty());
                assert!(doc.tooltips().is_empty());
                assert!(doc.closed_alerts().is_empty());
                assert_eq!(doc.get("h1").text_content(), "About us");
            })
            .await;
    }
}
