//! Page behaviours, one module per UI concern.
//!
//! Each widget owns the wiring and DOM mutation of its region. Widgets never
//! fail: missing elements are skipped and backend errors are logged and
//! surfaced as notifications where the user needs to know.

pub mod add_to_cart;
pub mod cart;
pub mod forms;
pub mod lazy_images;
pub mod loading;
pub mod notifications;
pub mod page;
pub mod search;
pub mod tooltips;

pub use page::init;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use crate::state::PageState;
    use crate::testing::{FakeApi, FakeDocument};

    pub type FakeState = PageState<FakeDocument, FakeApi>;

    /// Page state over `html` with a fresh scripted API.
    pub fn fake_page(html: &str) -> (FakeDocument, FakeApi, FakeState) {
        let document = FakeDocument::from_html(html);
        let api = FakeApi::new();
        let state = PageState::new(document.clone(), api.clone());
        (document, api, state)
    }

    /// Let spawned tasks run without letting timers of interest fire.
    pub async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
}
