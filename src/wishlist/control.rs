//! Wishlist Control View-Model
//!
//! Typed projection of a `.wishlist-button`. The button's `data-venue-*`
//! attributes are read into a [`WishlistControl`] at the start of a toggle and
//! written back, together with the visual state, at defined update points.

use web_sys::Element;

use crate::dom;
use crate::models::VenueRecord;

pub const BUTTON_SELECTOR: &str = ".wishlist-button";
pub const ACTIVE_CLASS: &str = "wishlist-button--active";
pub const HEART_COLOR: &str = "#ef4444";

pub const LOADING_ATTR: &str = "data-loading";
const PREPARED_ATTR: &str = "data-wishlist-prepared";

/// `data-*` attribute for each cached venue field
const VENUE_ATTRS: [&str; 9] = [
    "data-venue",
    "data-venue-name",
    "data-venue-city",
    "data-venue-category",
    "data-venue-price",
    "data-venue-url",
    "data-venue-image",
    "data-venue-description",
    "data-toggle-url",
];

/// Visual state of a heart button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonVisual {
    pub pressed: bool,
    pub fill: &'static str,
    pub stroke: &'static str,
    pub label: &'static str,
}

impl ButtonVisual {
    pub fn for_state(wishlisted: bool) -> Self {
        if wishlisted {
            Self { pressed: true, fill: HEART_COLOR, stroke: HEART_COLOR, label: "Remove from wishlist" }
        } else {
            Self { pressed: false, fill: "none", stroke: "currentColor", label: "Add to wishlist" }
        }
    }

    pub fn aria_pressed(&self) -> &'static str {
        if self.pressed { "true" } else { "false" }
    }
}

/// A wishlist button as read from the DOM
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WishlistControl {
    pub venue: VenueRecord,
    pub pressed: bool,
    pub loading: bool,
}

impl WishlistControl {
    pub fn read(button: &Element) -> Self {
        let [id, name, city, category, price, url, image, description, toggle_url] =
            VENUE_ATTRS.map(|attr| dom::attr(button, attr));
        Self {
            venue: VenueRecord { id, name, city, category, price, url, image, description, toggle_url },
            pressed: dom::flag(button, "aria-pressed"),
            loading: dom::flag(button, LOADING_ATTR),
        }
    }

    pub fn venue_id(&self) -> Option<&str> {
        Some(self.venue.id.as_str()).filter(|id| !id.is_empty())
    }
}

/// Cache a venue's fields on the button
pub fn write_venue(button: &Element, venue: &VenueRecord) {
    let values = [
        &venue.id,
        &venue.name,
        &venue.city,
        &venue.category,
        &venue.price,
        &venue.url,
        &venue.image,
        &venue.description,
        &venue.toggle_url,
    ];
    for (attr, value) in VENUE_ATTRS.iter().zip(values) {
        if *attr == "data-venue" && value.is_empty() {
            continue;
        }
        dom::set_attr(button, attr, value);
    }
}

/// Apply the pressed/unpressed visual state
pub fn render_state(button: &Element, wishlisted: bool) {
    let visual = ButtonVisual::for_state(wishlisted);
    if let Some(svg) = dom::query_within(button, "svg") {
        paint(&svg, &visual);
        if let Some(path) = dom::query_within(&svg, "path") {
            paint(&path, &visual);
        }
    }
    dom::toggle_class(button, ACTIVE_CLASS, visual.pressed);
    dom::set_attr(button, "aria-pressed", visual.aria_pressed());
    dom::set_attr(button, "aria-label", visual.label);
    dom::set_attr(button, "title", visual.label);
    dom::set_attr(button, "data-wishlisted", visual.aria_pressed());
}

fn paint(el: &Element, visual: &ButtonVisual) {
    dom::set_attr(el, "fill", visual.fill);
    dom::set_attr(el, "stroke", visual.stroke);
}

/// Keep wishlist buttons from submitting their form natively
pub fn prepare(button: &Element) {
    if button.tag_name().to_lowercase() != "button" || dom::flag(button, PREPARED_ATTR) {
        return;
    }
    let button_type = dom::attr(button, "type").to_lowercase();
    if button_type.is_empty() || button_type == "submit" {
        dom::set_attr(button, "type", "button");
    }
    dom::set_flag(button, PREPARED_ATTR, true);
}

/// Prepare every wishlist button in `root` (inclusive)
pub fn prepare_within(root: &Element) {
    for button in dom::query_all_inclusive(root, BUTTON_SELECTOR) {
        prepare(&button);
    }
}

pub fn prepare_all() {
    for button in dom::query_all(BUTTON_SELECTOR) {
        prepare(&button);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressed_visual() {
        let visual = ButtonVisual::for_state(true);
        assert_eq!(visual.fill, "#ef4444");
        assert_eq!(visual.stroke, "#ef4444");
        assert_eq!(visual.aria_pressed(), "true");
        assert_eq!(visual.label, "Remove from wishlist");
    }

    #[test]
    fn test_unpressed_visual() {
        let visual = ButtonVisual::for_state(false);
        assert_eq!(visual.fill, "none");
        assert_eq!(visual.stroke, "currentColor");
        assert_eq!(visual.aria_pressed(), "false");
        assert_eq!(visual.label, "Add to wishlist");
    }

    #[test]
    fn test_venue_id_requires_value() {
        assert!(WishlistControl::default().venue_id().is_none());
        let control = WishlistControl { venue: VenueRecord::with_id("7"), ..Default::default() };
        assert_eq!(control.venue_id(), Some("7"));
    }
}
