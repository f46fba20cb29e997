//! Wishlist Toggle
//!
//! One optimistic toggle of a wishlist control. [`ToggleRequest`] holds the
//! pure session state (previous/desired membership, endpoint, payload) and
//! settles the server's answer into a [`ToggleSettlement`]; [`toggle`] drives
//! it against the DOM.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlInputElement};

use crate::api::{self, HttpResponse};
use crate::app::App;
use crate::config::UiConfig;
use crate::dom;
use crate::error::{UiError, UiResult};
use crate::models::{TogglePayload, VenueRecord, WishlistChanged, WishlistToggleResponse};
use crate::toast::ToastLevel;
use crate::util::csrf_token;

use super::control::{self, WishlistControl, LOADING_ATTR};
use super::events;

pub const FAILURE_MESSAGE: &str = "Unable to update your wishlist right now. Please try again.";

/// An in-flight toggle of a single control
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleRequest {
    pub venue: VenueRecord,
    pub previous: bool,
    pub desired: bool,
    pub url: String,
    pub next: String,
}

/// How a finished toggle should be applied
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleSettlement {
    Confirmed {
        change: WishlistChanged,
        message: String,
        level: ToastLevel,
    },
    /// Login required; the browser goes to `location`
    Redirect { location: String, revert_to: bool },
    Failed { revert_to: bool, error: UiError },
}

impl ToggleRequest {
    /// Start a toggle. `None` while a request is outstanding or when the
    /// control carries no venue id.
    pub fn begin(control: &WishlistControl, config: &UiConfig, next: String) -> Option<Self> {
        if control.loading {
            return None;
        }
        let id = control.venue_id()?;
        let url = if control.venue.toggle_url.is_empty() {
            config.toggle_url_for(id)
        } else {
            control.venue.toggle_url.clone()
        };
        Some(Self {
            venue: control.venue.clone(),
            previous: control.pressed,
            desired: !control.pressed,
            url,
            next,
        })
    }

    pub fn payload(&self) -> TogglePayload {
        TogglePayload {
            next: Some(self.next.clone()).filter(|next| !next.is_empty()),
        }
    }

    pub fn settle(self, result: UiResult<WishlistToggleResponse>, config: &UiConfig) -> ToggleSettlement {
        let response = match result {
            Ok(response) => response,
            Err(error) => {
                return match error.redirect_location() {
                    Some(location) => ToggleSettlement::Redirect {
                        location: location.to_string(),
                        revert_to: self.previous,
                    },
                    None => ToggleSettlement::Failed { revert_to: self.previous, error },
                };
            }
        };

        let mut venue = self.venue;
        let local_id = venue.id.clone();
        if let Some(patch) = response.venue {
            venue.merge(patch);
        }
        if venue.id.is_empty() {
            venue.id = local_id;
        }
        if venue.toggle_url.is_empty() {
            venue.toggle_url = config.toggle_url_for(&venue.id);
        }

        let (message, level) = if response.wishlisted {
            (format!("Added {} to your wishlist.", venue.display_name()), ToastLevel::Success)
        } else {
            (format!("Removed {} from your wishlist.", venue.display_name()), ToastLevel::Info)
        };

        ToggleSettlement::Confirmed {
            change: WishlistChanged {
                venue_id: venue.id.clone(),
                wishlisted: response.wishlisted,
                venue_data: Some(venue),
                wishlist_item_html: response.wishlist_item_html,
                wishlist_count: response.wishlist_count,
            },
            message,
            level,
        }
    }
}

/// Classify a toggle endpoint response.
pub fn interpret_toggle_response(response: &HttpResponse) -> UiResult<WishlistToggleResponse> {
    if response.redirected {
        return Err(UiError::AuthRequired { location: response.url.clone() });
    }
    response.require_ok()?;
    if !response.is_json() {
        return Err(UiError::UnexpectedContent(response.content_type.clone()));
    }
    response.json()
}

/// Return location posted with the toggle
fn next_value(button: &Element) -> String {
    let Some(form) = button.closest("[data-wishlist-form]").ok().flatten() else {
        return dom::current_location();
    };
    match dom::query_within(&form, "input[name=\"next\"]").and_then(|el| el.dyn_into::<HtmlInputElement>().ok()) {
        Some(input) => input.value(),
        None => dom::current_location(),
    }
}

fn scroll_position() -> (f64, f64) {
    dom::window()
        .map(|win| (win.scroll_x().unwrap_or(0.0), win.scroll_y().unwrap_or(0.0)))
        .unwrap_or((0.0, 0.0))
}

fn restore_scroll((x, y): (f64, f64)) {
    dom::next_frame(move || {
        if let Some(win) = dom::window() {
            win.scroll_to_with_x_and_y(x, y);
        }
    });
}

/// Toggle the venue behind `button`, optimistically.
pub fn toggle(app: &Rc<App>, button: Element) {
    let control = WishlistControl::read(&button);
    let Some(request) = ToggleRequest::begin(&control, &app.config, next_value(&button)) else {
        return;
    };
    let scroll = scroll_position();

    dom::set_flag(&button, LOADING_ATTR, true);
    control::render_state(&button, request.desired);
    log::debug!("Toggling wishlist for venue {} via {}", request.venue.id, request.url);

    let app = app.clone();
    spawn_local(async move {
        let result = match api::post_json(&request.url, &request.payload(), &csrf_token()).await {
            Ok(response) => interpret_toggle_response(&response),
            Err(err) => Err(err),
        };

        match request.settle(result, &app.config) {
            ToggleSettlement::Confirmed { change, message, level } => {
                if let Some(venue) = &change.venue_data {
                    control::write_venue(&button, venue);
                }
                control::render_state(&button, change.wishlisted);
                events::dispatch(&change);
                app.toaster.show_for(&message, level, app.config.wishlist_toast_ms);
            }
            ToggleSettlement::Redirect { location, revert_to } => {
                log::info!("Wishlist toggle needs authentication, redirecting to {}", location);
                control::render_state(&button, revert_to);
                dom::navigate(&location);
            }
            ToggleSettlement::Failed { revert_to, error } => {
                control::render_state(&button, revert_to);
                log::error!("Wishlist toggle failed: {}", error);
                app.toaster
                    .show_for(FAILURE_MESSAGE, ToastLevel::Error, app.config.wishlist_error_toast_ms);
            }
        }

        restore_scroll(scroll);
        dom::remove_attr(&button, LOADING_ATTR);
    });
}
