//! Cart quantity updates.
//!
//! Changing a `.quantity-input` posts the new quantity and, once the backend
//! confirms, rewrites every `.cart-total` on the page. Requests are not
//! de-duplicated: rapid edits race and the last response to arrive wins.

use shopfront_core::{NotificationKind, ProductId, format_fixed_price};

use super::notifications::show_notification;
use crate::api::StorefrontApi;
use crate::dom::{Document, Element};
use crate::runtime;
use crate::state::PageState;

/// Notification shown once the backend confirms an update.
pub const SUCCESS_MESSAGE: &str = "Cart updated successfully";

/// Notification shown for any failed update.
pub const ERROR_MESSAGE: &str = "Error updating cart";

const QUANTITY_INPUT_SELECTOR: &str = ".quantity-input";
const CART_TOTAL_SELECTOR: &str = ".cart-total";
const PRODUCT_ID_ATTR: &str = "data-product-id";
const LOADING_CLASS: &str = "loading";

/// Send quantity changes to the backend.
pub fn init<D, A>(state: &PageState<D, A>)
where
    D: Document,
    A: StorefrontApi,
{
    let document = state.document();
    for input in document.query_selector_all(QUANTITY_INPUT_SELECTOR) {
        let state = state.clone();
        let target = input.clone();
        document.add_event_listener(&input, "change", move |_| {
            update_cart_quantity(&state, &target);
        });
    }
}

/// Post `input`'s quantity for its product and reflect the outcome.
///
/// The input's parent carries the `loading` class until the request settles.
pub fn update_cart_quantity<D, A>(state: &PageState<D, A>, input: &D::Element)
where
    D: Document,
    A: StorefrontApi,
{
    let Some(product_id) = product_id(input) else {
        tracing::warn!("Quantity input without a valid {PRODUCT_ID_ATTR}");
        return;
    };

    let value = input.value();
    let Ok(quantity) = value.trim().parse::<u32>() else {
        tracing::warn!(product_id = %product_id, value = %value, "Invalid cart quantity");
        show_notification(state.document(), ERROR_MESSAGE, NotificationKind::Error);
        return;
    };

    let parent = input.parent();
    if let Some(parent) = &parent {
        parent.add_class(LOADING_CLASS);
    }

    let state = state.clone();
    runtime::spawn(async move {
        match state.api().update_cart(product_id, quantity).await {
            Ok(update) => {
                tracing::debug!(product_id = %product_id, quantity, new_total = update.new_total, "Cart updated");
                update_cart_total(state.document(), update.new_total);
                show_notification(state.document(), SUCCESS_MESSAGE, NotificationKind::Success);
            }
            Err(e) => {
                tracing::error!(error = %e, product_id = %product_id, "Failed to update cart");
                show_notification(state.document(), ERROR_MESSAGE, NotificationKind::Error);
            }
        }

        if let Some(parent) = parent {
            parent.remove_class(LOADING_CLASS);
        }
    });
}

/// Write `new_total` into every `.cart-total` element.
pub fn update_cart_total<D: Document>(document: &D, new_total: f64) {
    let text = format_fixed_price(new_total);
    for element in document.query_selector_all(CART_TOTAL_SELECTOR) {
        element.set_text_content(&text);
    }
}

fn product_id<E: Element>(input: &E) -> Option<ProductId> {
    input.attribute(PRODUCT_ID_ATTR)?.parse().ok()
}
