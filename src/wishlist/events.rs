//! `wishlist:changed` event
//!
//! Document-level broadcast of confirmed membership changes. Any part of the
//! page (including scripts outside this crate) can listen or dispatch.

use web_sys::{CustomEvent, CustomEventInit};

use crate::dom;
use crate::error::UiResult;
use crate::models::WishlistChanged;

pub const WISHLIST_CHANGED: &str = "wishlist:changed";

/// Broadcast a change on the document.
pub fn dispatch(change: &WishlistChanged) {
    if let Err(err) = try_dispatch(change) {
        log::error!("Failed to broadcast {}: {}", WISHLIST_CHANGED, err);
    }
}

fn try_dispatch(change: &WishlistChanged) -> UiResult<()> {
    let Some(doc) = dom::document() else { return Ok(()) };
    let detail = serde_wasm_bindgen::to_value(change)?;
    let init = CustomEventInit::new();
    init.set_detail(&detail);
    let event = CustomEvent::new_with_event_init_dict(WISHLIST_CHANGED, &init)?;
    doc.dispatch_event(&event)?;
    Ok(())
}

/// Call `handler` for every well-formed change. Events without a detail or
/// without a venue id are dropped.
pub fn subscribe<F>(mut handler: F)
where
    F: FnMut(WishlistChanged) + 'static,
{
    let Some(doc) = dom::document() else { return };
    dom::listen(&doc, WISHLIST_CHANGED, move |ev: CustomEvent| {
        let detail = ev.detail();
        if detail.is_null() || detail.is_undefined() {
            return;
        }
        match serde_wasm_bindgen::from_value::<WishlistChanged>(detail) {
            Ok(change) if !change.venue_id.is_empty() => handler(change),
            Ok(_) => log::debug!("Ignoring {} without a venue id", WISHLIST_CHANGED),
            Err(err) => log::warn!("Malformed {} detail: {}", WISHLIST_CHANGED, err),
        }
    });
}
