//! Wishlist
//!
//! Heart buttons that add or remove a venue from the user's wishlist, and the
//! `wishlist:changed` subscriber that keeps the rest of the page in sync.

pub mod card;
pub mod control;
pub mod events;
pub mod reconcile;
pub mod toggle;

use std::rc::Rc;

use web_sys::{Event, MouseEvent};

use crate::app::App;
use crate::dom;

use self::reconcile::DomSurface;

/// Delegated click/submit handling plus reconciliation.
pub fn bind(app: &Rc<App>) {
    let Some(doc) = dom::document() else { return };
    control::prepare_all();

    let clicks = app.clone();
    dom::listen(&doc, "click", move |ev: MouseEvent| {
        if let Some(button) = dom::closest(ev.target(), control::BUTTON_SELECTOR) {
            ev.prevent_default();
            toggle::toggle(&clicks, button);
        }
    });

    let submits = app.clone();
    dom::listen(&doc, "submit", move |ev: Event| {
        let Some(form) = dom::closest(ev.target(), "[data-wishlist-form]") else { return };
        ev.prevent_default();
        if let Some(button) = dom::query_within(&form, control::BUTTON_SELECTOR) {
            toggle::toggle(&submits, button);
        }
    });

    let subscriber = app.clone();
    events::subscribe(move |change| {
        log::debug!("Reconciling wishlist for venue {} ({})", change.venue_id, change.wishlisted);
        let mut surface = DomSurface::new(subscriber.clone());
        reconcile::reconcile(&mut surface, &change);
    });
}
