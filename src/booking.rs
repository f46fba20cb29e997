//! Booking Cancellation
//!
//! Submits `[data-cancel-booking-form]` forms in the background, removes the
//! cancelled booking's card and reports the result as a toast.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, Event, HtmlFormElement};

use crate::api::{self, HttpResponse};
use crate::app::App;
use crate::dom;
use crate::error::{UiError, UiResult};
use crate::models::CancelResponse;
use crate::toast::ToastLevel;
use crate::util::attr_selector;

pub const FORM_SELECTOR: &str = "[data-cancel-booking-form]";
pub const SUCCESS_MESSAGE: &str = "Booking cancelled successfully.";
pub const FAILURE_MESSAGE: &str = "Could not cancel this booking. Please try again.";

const PREPARED_ATTR: &str = "data-cancel-prepared";
const SUBMITTING_ATTR: &str = "data-submitting";
const CARD_EXIT: [&str; 2] = ["opacity-0", "scale-95"];

/// Result of one cancellation request
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    Cancelled { booking_id: Option<String>, message: String },
    Failed(UiError),
}

impl CancelOutcome {
    pub fn from_result(result: UiResult<HttpResponse>) -> Self {
        match result.and_then(|response| confirm_cancellation(&response)) {
            Ok(confirmed) => CancelOutcome::Cancelled {
                booking_id: confirmed.booking_id.filter(|id| !id.is_empty()),
                message: confirmed
                    .message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| SUCCESS_MESSAGE.to_string()),
            },
            Err(err) => CancelOutcome::Failed(err),
        }
    }

    /// Toast shown for this outcome
    pub fn notice(&self) -> (&str, ToastLevel) {
        match self {
            CancelOutcome::Cancelled { message, .. } => (message, ToastLevel::Success),
            CancelOutcome::Failed(_) => (FAILURE_MESSAGE, ToastLevel::Error),
        }
    }
}

/// Accept only an OK JSON body with `success: true`.
pub fn confirm_cancellation(response: &HttpResponse) -> UiResult<CancelResponse> {
    response.require_ok()?;
    let body: CancelResponse = response.json()?;
    if !body.success {
        return Err(UiError::Rejected);
    }
    Ok(body)
}

/// The empty-state message appears once the last card is gone
pub fn needs_empty_state(remaining_cards: usize) -> bool {
    remaining_cards == 0
}

/// Selector for the card of booking `id`
pub fn booking_card_selector(id: &str) -> String {
    format!("[data-booking-card]{}", attr_selector("data-booking-id", id))
}

/// Bind every cancel form under `root` (inclusive), once.
pub fn prepare_cancel_forms(app: &Rc<App>, root: &Element) {
    for form in dom::query_all_inclusive(root, FORM_SELECTOR) {
        let Ok(form) = form.dyn_into::<HtmlFormElement>() else { continue };
        if !dom::claim(&form, PREPARED_ATTR) {
            continue;
        }
        let app = app.clone();
        let target = form.clone();
        dom::listen(&form, "submit", move |ev: Event| {
            ev.prevent_default();
            submit(&app, target.clone());
        });
    }
}

fn submit(app: &Rc<App>, form: HtmlFormElement) {
    if !dom::claim(&form, SUBMITTING_ATTR) {
        return;
    }
    let submit_button = dom::query_within(&form, "[type=\"submit\"]");
    if let Some(button) = &submit_button {
        dom::set_attr(button, "disabled", "true");
    }

    let app = app.clone();
    spawn_local(async move {
        let outcome = CancelOutcome::from_result(api::post_form(&form.action(), &form).await);
        match &outcome {
            CancelOutcome::Cancelled { booking_id, .. } => {
                log::debug!("Booking {:?} cancelled", booking_id);
                remove_card(booking_id.as_deref(), &form, app.config.card_exit_fallback_ms);
                let (message, level) = outcome.notice();
                app.toaster.show(message, level);
                app.modals.close_containing(&form);
            }
            CancelOutcome::Failed(err) => {
                log::warn!("Booking cancellation failed: {}", err);
                let (message, level) = outcome.notice();
                app.toaster.show(message, level);
            }
        }

        dom::set_attr(&form, SUBMITTING_ATTR, "false");
        if let Some(button) = &submit_button {
            dom::remove_attr(button, "disabled");
        }
    });
}

fn remove_card(booking_id: Option<&str>, form: &Element, fallback_ms: u32) {
    let Some(list) = dom::query("[data-booking-list]") else { return };
    let card = booking_id
        .and_then(|id| dom::query_within(&list, &booking_card_selector(id)))
        .or_else(|| form.closest("[data-booking-card]").ok().flatten());
    let Some(card) = card else {
        sync_empty_state(&list);
        return;
    };

    dom::add_classes(&card, &CARD_EXIT);
    let (ended_card, ended_list) = (card.clone(), list.clone());
    dom::listen_once(&card, "transitionend", move |_: Event| {
        ended_card.remove();
        sync_empty_state(&ended_list);
    });
    Timeout::new(fallback_ms, move || {
        if card.is_connected() {
            card.remove();
            sync_empty_state(&list);
        }
    })
    .forget();
}

fn sync_empty_state(list: &Element) {
    let remaining = dom::query_all_within(list, "[data-booking-card]").len();
    if needs_empty_state(remaining) {
        if let Some(empty) = dom::query("[data-booking-empty]") {
            dom::remove_class(&empty, "hidden");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            ok: (200..300).contains(&status),
            content_type: "application/json".into(),
            body: body.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_success_targets_booking_card() {
        let outcome = CancelOutcome::from_result(Ok(json(200, r#"{"success": true, "booking_id": "42"}"#)));
        assert_eq!(
            outcome,
            CancelOutcome::Cancelled { booking_id: Some("42".into()), message: SUCCESS_MESSAGE.into() }
        );
        assert_eq!(outcome.notice(), (SUCCESS_MESSAGE, ToastLevel::Success));
    }

    #[test]
    fn test_server_message_is_used() {
        let outcome = CancelOutcome::from_result(Ok(json(
            200,
            r#"{"success": true, "booking_id": 42, "message": "Booking #42 cancelled."}"#,
        )));
        assert_eq!(outcome.notice(), ("Booking #42 cancelled.", ToastLevel::Success));
    }

    #[test]
    fn test_unsuccessful_body_is_rejected() {
        let outcome = CancelOutcome::from_result(Ok(json(200, r#"{"success": false}"#)));
        assert_eq!(outcome, CancelOutcome::Failed(UiError::Rejected));
        assert_eq!(outcome.notice(), (FAILURE_MESSAGE, ToastLevel::Error));
    }

    #[test]
    fn test_http_and_network_failures() {
        let outcome = CancelOutcome::from_result(Ok(json(403, r#"{"success": true}"#)));
        assert_eq!(outcome, CancelOutcome::Failed(UiError::Status(403)));

        let outcome = CancelOutcome::from_result(Err(UiError::Network("offline".into())));
        assert!(matches!(outcome, CancelOutcome::Failed(UiError::Network(_))));

        let outcome = CancelOutcome::from_result(Ok(json(200, "<html>")));
        assert!(matches!(outcome, CancelOutcome::Failed(UiError::Malformed(_))));
    }

    #[test]
    fn test_booking_card_selector() {
        assert_eq!(booking_card_selector("42"), r#"[data-booking-card][data-booking-id="42"]"#);
        assert_eq!(
            booking_card_selector(r#"7"]#x"#),
            r#"[data-booking-card][data-booking-id="7\"\]\#x"]"#
        );
    }

    #[test]
    fn test_empty_state_after_last_card() {
        assert!(needs_empty_state(0));
        assert!(!needs_empty_state(2));
    }
}
