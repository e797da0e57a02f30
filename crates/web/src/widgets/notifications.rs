//! Alert banners: auto-dismissing the ones rendered by the server, and
//! showing new ones from script.

use std::time::Duration;

use askama::Template;
use shopfront_core::NotificationKind;

use crate::dom::{Document, Element, InsertPosition};
use crate::markup::NotificationTemplate;
use crate::runtime;

/// How long server-rendered alerts stay up.
pub const EXISTING_ALERT_DELAY: Duration = Duration::from_millis(5000);

/// How long a banner from [`show_notification`] stays up.
pub const NOTIFICATION_DISMISS_DELAY: Duration = Duration::from_millis(3000);

const ALERT_SELECTOR: &str = ".alert";
const CONTAINER_SELECTOR: &str = ".container";

/// Schedule every alert currently on the page for dismissal.
pub fn init<D: Document>(document: &D) {
    for alert in document.query_selector_all(ALERT_SELECTOR) {
        let document = document.clone();
        runtime::spawn_after(EXISTING_ALERT_DELAY, move || document.close_alert(&alert));
    }
}

/// Show a dismissible banner at the top of the page's main container.
///
/// Every call adds its own banner, which closes itself after
/// [`NOTIFICATION_DISMISS_DELAY`]. No-op on pages without a `.container`.
pub fn show_notification<D: Document>(document: &D, message: &str, kind: NotificationKind) {
    let Some(container) = document.query_selector(CONTAINER_SELECTOR) else {
        tracing::debug!(message, "No container for notification");
        return;
    };

    let html = match NotificationTemplate::new(message, kind).render() {
        Ok(html) => html,
        Err(e) => {
            tracing::error!(error = %e, "Failed to render notification");
            return;
        }
    };

    container.insert_adjacent_html(InsertPosition::AfterBegin, &html);

    // Inserted first, so it is the container's first alert.
    let Some(banner) = container.query_selector(ALERT_SELECTOR) else {
        return;
    };
    let document = document.clone();
    runtime::spawn_after(NOTIFICATION_DISMISS_DELAY, move || {
        document.close_alert(&banner);
    });
}

#[cfg(test)]
mod tests {
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    use super::*;
    use crate::testing::FakeDocument;

    const MS: Duration = Duration::from_millis(1);

    #[tokio::test(start_paused = true)]
    async fn test_existing_alerts_close_after_delay() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(
                    r#"<div class="container">
                        <div class="alert alert-success">Welcome back</div>
                        <div class="alert alert-warning">Low stock</div>
                    </div>"#,
                );
                init(&doc);

                sleep(EXISTING_ALERT_DELAY - MS).await;
                assert!(doc.closed_alerts().is_empty());

                sleep(MS * 2).await;
                assert_eq!(doc.closed_alerts().len(), 2);
                assert!(doc.query_selector(".alert").is_none());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_notification_inserts_banner_first() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(
                    r#"<div class="container"><h1>Cart</h1></div>"#,
                );

                show_notification(&doc, "Cart updated successfully", NotificationKind::Success);

                let container = doc.get(".container");
                let banner = doc.get(".container > .alert");
                assert!(container.inner_html().starts_with("<div class=\"alert alert-success"));
                assert!(banner.has_class("alert-dismissible"));
                assert_eq!(banner.attribute("role").as_deref(), Some("alert"));
                assert!(banner.text_content().contains("Cart updated successfully"));
                assert_eq!(
                    banner
                        .query_selector(".btn-close")
                        .and_then(|b| b.attribute("data-bs-dismiss")),
                    Some("alert".to_string())
                );
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_each_banner_dismisses_itself() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(r#"<div class="container"></div>"#);

                show_notification(&doc, "first", NotificationKind::Info);
                let first = doc.get(".alert");
                sleep(Duration::from_millis(1000)).await;
                show_notification(&doc, "second", NotificationKind::Error);
                let second = doc.get(".alert-danger");
                assert_eq!(doc.query_selector_all(".alert").len(), 2);

                sleep(Duration::from_millis(2001)).await;
                assert_eq!(doc.closed_alerts(), [first]);
                assert!(second.is_attached());

                sleep(Duration::from_millis(1000)).await;
                assert_eq!(doc.closed_alerts().len(), 2);
                assert!(!second.is_attached());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_message_is_escaped() {
        LocalSet::new()
            .run_until(async {
                let doc = FakeDocument::from_html(r#"<div class="container"></div>"#);

                show_notification(&doc, "<img src=x>", NotificationKind::Warning);

                let banner = doc.get(".alert-warning");
                assert!(banner.query_selector("img").is_none());
                assert!(banner.text_content().contains("<img src=x>"));
            })
            .await;
    }

    #[test]
    fn test_without_container_is_noop() {
        let doc = FakeDocument::from_html("<main></main>");
        show_notification(&doc, "hello", NotificationKind::Info);
        assert!(doc.query_selector(".alert").is_none());
    }
}
