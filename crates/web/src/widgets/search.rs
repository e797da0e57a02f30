//! Debounced product search.
//!
//! Each keystroke in `#search` restarts a short timer. When typing pauses and
//! the field holds at least [`MIN_QUERY_LEN`] characters, the results list
//! in `#search-results` is replaced. Shorter queries leave the list as it is.

use std::time::Duration;

use askama::Template;
use shopfront_core::ProductSummary;

use crate::api::StorefrontApi;
use crate::dom::{Document, Element};
use crate::markup::SearchResultsTemplate;
use crate::runtime::Debouncer;
use crate::state::PageState;

/// Pause in typing before a search is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest query that is searched, in UTF-16 code units like a DOM
/// string's `length`.
pub const MIN_QUERY_LEN: usize = 3;

const SEARCH_INPUT_ID: &str = "search";
const SEARCH_RESULTS_ID: &str = "search-results";

/// Search as the user types in `#search`.
pub fn init<D, A>(state: &PageState<D, A>)
where
    D: Document,
    A: StorefrontApi,
{
    let Some(input) = state.document().get_element_by_id(SEARCH_INPUT_ID) else {
        return;
    };

    // Owned by the listener; nothing else can reach the pending timer.
    let debouncer = Debouncer::new(SEARCH_DEBOUNCE);
    let listener_state = state.clone();
    let target = input.clone();
    state.document().add_event_listener(&input, "input", move |_| {
        let state = listener_state.clone();
        let input = target.clone();
        debouncer.schedule(move || async move {
            let query = input.value();
            if query.encode_utf16().count() >= MIN_QUERY_LEN {
                search_products(&state, &query).await;
            }
        });
    });
}

/// Fetch products matching `query` and render them into `#search-results`.
///
/// Nothing is requested on pages without a results container. Failures are
/// logged and leave the current results in place.
pub async fn search_products<D, A>(state: &PageState<D, A>, query: &str)
where
    D: Document,
    A: StorefrontApi,
{
    let Some(container) = state.document().get_element_by_id(SEARCH_RESULTS_ID) else {
        tracing::debug!("No search results container on page");
        return;
    };

    match state.api().search(query).await {
        Ok(products) => {
            tracing::debug!(query, count = products.len(), "Search results received");
            display_search_results(&container, &products);
        }
        Err(e) => tracing::error!(error = %e, query, "Search failed"),
    }
}

/// Replace `container`'s content with result rows, or the empty-state message.
pub fn display_search_results<E: Element>(container: &E, products: &[ProductSummary]) {
    match SearchResultsTemplate::new(products).render() {
        Ok(html) => container.set_inner_html(&html),
        Err(e) => tracing::error!(error = %e, "Failed to render search results"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::ProductId;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use super::*;
    use crate::testing::{ApiCall, FakeDocument};
    use crate::widgets::test_support::fake_page;

    const PAGE: &str = r#"
        <form class="d-flex" role="search">
            <input id="search" class="form-control" type="search" placeholder="Search products">
        </form>
        <div id="search-results"><p>Previous results</p></div>
    "#;

    const MS: Duration = Duration::from_millis(1);

    fn product(id: i32, name: &str, description: &str, price: f64) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }

    fn searched(calls: &[ApiCall]) -> Vec<String> {
        calls
            .iter()
            .filter_map(|call| match call {
                ApiCall::Search { query } => Some(query.clone()),
                ApiCall::UpdateCart { .. } => None,
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_searches_once_typing_pauses() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                api.reply_search(&[product(1, "Dried Mango", "Sun-dried", 8.5)]);

                doc.type_text(&doc.get("#search"), "mango");
                sleep(SEARCH_DEBOUNCE - MS).await;
                assert!(api.calls().is_empty());

                sleep(MS * 2).await;
                assert_eq!(searched(&api.calls()), ["mango"]);

                let rows = doc.query_selector_all("#search-results .search-result-item");
                assert_eq!(rows.len(), 1);
                let link = rows[0].query_selector("a").unwrap();
                assert_eq!(link.attribute("href").as_deref(), Some("/product/1"));
                assert!(rows[0].text_content().contains("Dried Mango"));
                assert!(rows[0].text_content().contains("Sun-dried..."));
                assert!(rows[0].text_content().contains("$8.50"));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_restart_timer() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                let input = doc.get("#search");

                doc.type_text(&input, "pin");
                sleep(Duration::from_millis(200)).await;
                doc.type_text(&input, "e");
                sleep(Duration::from_millis(200)).await;
                assert!(api.calls().is_empty());

                sleep(Duration::from_millis(101)).await;
                assert_eq!(searched(&api.calls()), ["pine"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_searches() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                let input = doc.get("#search");

                doc.type_text(&input, "ki");
                sleep(Duration::from_secs(2)).await;
                assert!(api.calls().is_empty());

                doc.type_text(&input, "w");
                doc.backspace(&input);
                sleep(Duration::from_secs(2)).await;
                assert!(api.calls().is_empty());
                assert_eq!(doc.get("#search-results").text_content(), "Previous results");
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_length_counts_utf16_units() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);

                doc.type_text(&doc.get("#search"), "açaí");
                sleep(SEARCH_DEBOUNCE + MS).await;
                assert_eq!(searched(&api.calls()), ["açaí"]);

                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                doc.type_text(&doc.get("#search"), "çé");
                sleep(SEARCH_DEBOUNCE + MS).await;
                assert!(api.calls().is_empty());

                // An astral character is two code units.
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                doc.type_text(&doc.get("#search"), "a😀");
                sleep(SEARCH_DEBOUNCE + MS).await;
                assert_eq!(searched(&api.calls()), ["a😀"]);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_results_message() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                api.reply_search(&[]);

                doc.type_text(&doc.get("#search"), "durian");
                sleep(SEARCH_DEBOUNCE + MS).await;

                let results = doc.get("#search-results");
                assert_eq!(results.text_content().trim(), "No products found");
                assert!(results.query_selector(".search-result-item").is_none());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_search_keeps_results() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) = fake_page(PAGE);
                init(&state);
                api.fail_search();

                doc.type_text(&doc.get("#search"), "guava");
                sleep(SEARCH_DEBOUNCE + MS).await;

                assert_eq!(searched(&api.calls()), ["guava"]);
                assert_eq!(doc.get("#search-results").text_content(), "Previous results");
                assert!(doc.query_selector(".alert").is_none());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_results_container_sends_nothing() {
        LocalSet::new()
            .run_until(async {
                let (doc, api, state) =
                    fake_page(r#"<input id="search" type="search">"#);
                init(&state);

                doc.type_text(&doc.get("#search"), "papaya");
                sleep(SEARCH_DEBOUNCE + MS).await;
                assert!(api.calls().is_empty());
            })
            .await;
    }

    #[test]
    fn test_display_truncates_description() {
        let doc = FakeDocument::from_html(r#"<div id="search-results"></div>"#);
        let container = doc.get("#search-results");
        let long = "x".repeat(150);

        display_search_results(&container, &[product(9, "Jackfruit", &long, 1234.567)]);

        let excerpt = container.query_selector("p").unwrap().text_content();
        assert_eq!(excerpt, format!("{}...", "x".repeat(100)));
        assert_eq!(container.query_selector("span").unwrap().text_content(), "$1234.57");
    }
}
