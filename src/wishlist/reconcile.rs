//! Wishlist Reconciliation
//!
//! Applies a [`WishlistChanged`] to everything on the page that shows
//! membership: the wishlist grid, its empty state, and every control for the
//! venue. Applying the same change twice leaves the page unchanged.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlTemplateElement};

use crate::app::App;
use crate::dom;
use crate::models::{VenueRecord, WishlistChanged};
use crate::util::{attr_selector, csrf_token};

use super::{card, control};

pub const GRID_SELECTOR: &str = "[data-wishlist-grid]";
pub const EMPTY_SELECTOR: &str = "[data-wishlist-empty]";
pub const ITEM_ATTR: &str = "data-wishlist-item";

/// Everything reconciliation reads or writes
pub trait WishlistSurface {
    fn has_grid(&self) -> bool;
    fn has_card(&self, venue_id: &str) -> bool;
    fn remove_card(&mut self, venue_id: &str);
    /// Replace the venue's card with `html`, or prepend it when absent
    fn put_card_html(&mut self, venue_id: &str, html: &str);
    /// Prepend a client-built card
    fn insert_synthesized_card(&mut self, venue: &VenueRecord);
    fn grid_has_items(&self) -> bool;
    fn set_empty_state_visible(&mut self, visible: bool);
    /// Write the venue dataset and visual state to every control for `venue_id`
    fn sync_controls(&mut self, venue_id: &str, wishlisted: bool, venue: Option<&VenueRecord>);
    fn prepare_all_controls(&mut self);
}

pub fn reconcile<S: WishlistSurface>(surface: &mut S, change: &WishlistChanged) {
    if change.venue_id.is_empty() {
        return;
    }
    if surface.has_grid() {
        sync_grid(surface, change);
    }
    surface.sync_controls(&change.venue_id, change.wishlisted, change.venue_data.as_ref());
    surface.prepare_all_controls();
}

fn sync_grid<S: WishlistSurface>(surface: &mut S, change: &WishlistChanged) {
    let venue_id = change.venue_id.as_str();
    if !change.wishlisted {
        if surface.has_card(venue_id) {
            surface.remove_card(venue_id);
        }
    } else if let Some(html) = change.item_html() {
        surface.put_card_html(venue_id, html);
    } else if !surface.has_card(venue_id) {
        if let Some(venue) = &change.venue_data {
            let mut venue = venue.clone();
            if venue.id.is_empty() {
                venue.id = venue_id.to_string();
            }
            surface.insert_synthesized_card(&venue);
        }
    }
    let has_items = surface.grid_has_items();
    surface.set_empty_state_visible(!has_items);
}

// ========================
// DOM surface
// ========================

pub struct DomSurface {
    app: Rc<App>,
    grid: Option<Element>,
    empty: Option<Element>,
}

impl DomSurface {
    pub fn new(app: Rc<App>) -> Self {
        Self {
            app,
            grid: dom::query(GRID_SELECTOR),
            empty: dom::query(EMPTY_SELECTOR),
        }
    }

    fn card(&self, venue_id: &str) -> Option<Element> {
        let grid = self.grid.as_ref()?;
        dom::query_within(grid, &attr_selector(ITEM_ATTR, venue_id))
    }

    fn adopt(&self, card: &Element) {
        control::prepare_within(card);
        self.app.refresh_interactive(card);
    }
}

fn parse_card(html: &str) -> Option<Element> {
    let template = dom::create_element("template")?.dyn_into::<HtmlTemplateElement>().ok()?;
    template.set_inner_html(html);
    template.content().first_element_child()
}

impl WishlistSurface for DomSurface {
    fn has_grid(&self) -> bool {
        self.grid.is_some()
    }

    fn has_card(&self, venue_id: &str) -> bool {
        self.card(venue_id).is_some()
    }

    fn remove_card(&mut self, venue_id: &str) {
        if let Some(card) = self.card(venue_id) {
            card.remove();
        }
    }

    fn put_card_html(&mut self, venue_id: &str, html: &str) {
        let (Some(grid), Some(new_card)) = (self.grid.as_ref(), parse_card(html)) else { return };
        let placed = match self.card(venue_id) {
            Some(existing) => existing.replace_with_with_node_1(&new_card),
            None => grid.prepend_with_node_1(&new_card),
        };
        if let Err(err) = placed {
            log::error!("Failed to place wishlist card for venue {}: {:?}", venue_id, err);
            return;
        }
        control::prepare_within(&new_card);
        self.app.refresh_interactive(grid);
    }

    fn insert_synthesized_card(&mut self, venue: &VenueRecord) {
        let Some(grid) = self.grid.as_ref() else { return };
        let mut venue = venue.clone();
        if venue.toggle_url.is_empty() {
            venue.toggle_url = self.app.config.toggle_url_for(&venue.id);
        }
        let Some(card) = card::build(venue, csrf_token(), dom::current_location()) else { return };
        if let Err(err) = grid.prepend_with_node_1(&card) {
            log::error!("Failed to insert wishlist card: {:?}", err);
            return;
        }
        self.adopt(&card);
    }

    fn grid_has_items(&self) -> bool {
        self.grid
            .as_ref()
            .is_some_and(|grid| dom::query_within(grid, &format!("[{}]", ITEM_ATTR)).is_some())
    }

    fn set_empty_state_visible(&mut self, visible: bool) {
        if let Some(empty) = &self.empty {
            dom::toggle_class(empty, "hidden", !visible);
        }
    }

    fn sync_controls(&mut self, venue_id: &str, wishlisted: bool, venue: Option<&VenueRecord>) {
        let selector = format!("{}{}", control::BUTTON_SELECTOR, attr_selector("data-venue", venue_id));
        for button in dom::query_all(&selector) {
            control::prepare(&button);
            if let Some(venue) = venue {
                control::write_venue(&button, venue);
            }
            control::render_state(&button, wishlisted);
        }
    }

    fn prepare_all_controls(&mut self) {
        control::prepare_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::models::WishlistToggleResponse;
    use crate::wishlist::control::WishlistControl;
    use crate::wishlist::toggle::{ToggleRequest, ToggleSettlement};

    #[derive(Debug, Clone, PartialEq)]
    struct Card {
        venue_id: String,
        html: Option<String>,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Control {
        venue: VenueRecord,
        pressed: bool,
        prepared: bool,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct MemorySurface {
        grid: Option<Vec<Card>>,
        empty_visible: bool,
        controls: Vec<Control>,
    }

    impl MemorySurface {
        fn with_grid(ids: &[&str]) -> Self {
            let cards = ids.iter().map(|id| Card { venue_id: id.to_string(), html: None }).collect();
            Self {
                grid: Some(cards),
                empty_visible: ids.is_empty(),
                controls: Vec::new(),
            }
        }

        fn control(mut self, id: &str, pressed: bool) -> Self {
            self.controls.push(Control { venue: VenueRecord::with_id(id), pressed, prepared: false });
            self
        }

        fn cards_for(&self, id: &str) -> usize {
            self.grid.iter().flatten().filter(|c| c.venue_id == id).count()
        }
    }

    impl WishlistSurface for MemorySurface {
        fn has_grid(&self) -> bool {
            self.grid.is_some()
        }

        fn has_card(&self, venue_id: &str) -> bool {
            self.cards_for(venue_id) > 0
        }

        fn remove_card(&mut self, venue_id: &str) {
            if let Some(grid) = &mut self.grid {
                grid.retain(|c| c.venue_id != venue_id);
            }
        }

        fn put_card_html(&mut self, venue_id: &str, html: &str) {
            let Some(grid) = &mut self.grid else { return };
            let card = Card { venue_id: venue_id.to_string(), html: Some(html.to_string()) };
            match grid.iter_mut().find(|c| c.venue_id == venue_id) {
                Some(existing) => *existing = card,
                None => grid.insert(0, card),
            }
        }

        fn insert_synthesized_card(&mut self, venue: &VenueRecord) {
            if let Some(grid) = &mut self.grid {
                grid.insert(0, Card { venue_id: venue.id.clone(), html: None });
            }
        }

        fn grid_has_items(&self) -> bool {
            self.grid.as_ref().is_some_and(|g| !g.is_empty())
        }

        fn set_empty_state_visible(&mut self, visible: bool) {
            self.empty_visible = visible;
        }

        fn sync_controls(&mut self, venue_id: &str, wishlisted: bool, venue: Option<&VenueRecord>) {
            for control in self.controls.iter_mut().filter(|c| c.venue.id == venue_id) {
                control.prepared = true;
                if let Some(venue) = venue {
                    control.venue = venue.clone();
                }
                control.pressed = wishlisted;
            }
        }

        fn prepare_all_controls(&mut self) {
            for control in &mut self.controls {
                control.prepared = true;
            }
        }
    }

    fn change(id: &str, wishlisted: bool) -> WishlistChanged {
        WishlistChanged {
            venue_id: id.into(),
            wishlisted,
            venue_data: Some(VenueRecord { id: id.into(), name: "Alpha Hall".into(), ..Default::default() }),
            wishlist_item_html: None,
            wishlist_count: None,
        }
    }

    /// Run a toggle response through the session and return the broadcast change
    fn settle(id: &str, pressed: bool, body: &str) -> WishlistChanged {
        let config = UiConfig::default();
        let control = WishlistControl { venue: VenueRecord::with_id(id), pressed, loading: false };
        let request = ToggleRequest::begin(&control, &config, String::new()).unwrap();
        let response: WishlistToggleResponse = serde_json::from_str(body).unwrap();
        match request.settle(Ok(response), &config) {
            ToggleSettlement::Confirmed { change, .. } => change,
            other => panic!("unexpected settlement: {:?}", other),
        }
    }

    #[test]
    fn test_all_controls_follow_membership() {
        let mut surface = MemorySurface::default().control("7", false).control("7", false).control("8", false);
        reconcile(&mut surface, &change("7", true));
        assert!(surface.controls.iter().filter(|c| c.venue.id == "7").all(|c| c.pressed));
        assert!(!surface.controls[2].pressed);

        reconcile(&mut surface, &change("7", false));
        assert!(surface.controls.iter().all(|c| !c.pressed));
        assert!(surface.controls.iter().all(|c| c.prepared));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut once = MemorySurface::with_grid(&["3"]).control("7", false);
        reconcile(&mut once, &change("7", true));
        let mut twice = once.clone();
        reconcile(&mut twice, &change("7", true));
        assert_eq!(once, twice);

        let mut html = change("7", true);
        html.wishlist_item_html = Some("<article data-wishlist-item=\"7\"></article>".into());
        reconcile(&mut once, &html);
        let snapshot = once.clone();
        reconcile(&mut once, &html);
        assert_eq!(once, snapshot);
        assert_eq!(once.cards_for("7"), 1);
    }

    #[test]
    fn test_add_then_remove_last_card() {
        let mut surface = MemorySurface::with_grid(&[]);
        assert!(surface.empty_visible);

        let added = settle("7", false, r#"{"wishlisted": true, "venue": {"id": "7", "name": "Alpha Hall"}}"#);
        reconcile(&mut surface, &added);
        assert_eq!(surface.cards_for("7"), 1);
        assert!(!surface.empty_visible);

        let removed = settle("7", true, r#"{"wishlisted": false}"#);
        reconcile(&mut surface, &removed);
        assert_eq!(surface.cards_for("7"), 0);
        assert!(surface.empty_visible);
    }

    #[test]
    fn test_server_html_replaces_existing_card() {
        let mut surface = MemorySurface::with_grid(&["7", "8"]);
        let mut update = change("7", true);
        update.wishlist_item_html = Some("  <article data-wishlist-item=\"7\">new</article> ".into());
        reconcile(&mut surface, &update);

        let grid = surface.grid.as_ref().unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].html.as_deref(), Some("<article data-wishlist-item=\"7\">new</article>"));
    }

    #[test]
    fn test_existing_card_is_kept_without_html() {
        let mut surface = MemorySurface::with_grid(&["8", "7"]);
        let before = surface.grid.clone();
        reconcile(&mut surface, &change("7", true));
        assert_eq!(surface.grid, before);
    }

    #[test]
    fn test_no_venue_data_means_no_card() {
        let mut surface = MemorySurface::with_grid(&[]);
        let mut bare = change("7", true);
        bare.venue_data = None;
        reconcile(&mut surface, &bare);
        assert_eq!(surface.cards_for("7"), 0);
        assert!(surface.empty_visible);
    }

    #[test]
    fn test_removing_one_of_many_keeps_empty_state_hidden() {
        let mut surface = MemorySurface::with_grid(&["7", "8"]);
        reconcile(&mut surface, &change("7", false));
        assert_eq!(surface.cards_for("7"), 0);
        assert!(!surface.empty_visible);
    }

    #[test]
    fn test_pages_without_grid_only_sync_controls() {
        let mut surface = MemorySurface::default().control("7", false);
        reconcile(&mut surface, &change("7", true));
        assert!(surface.grid.is_none());
        assert!(surface.controls[0].pressed);
        assert_eq!(surface.controls[0].venue.name, "Alpha Hall");
    }
}
