//! Page Effects
//!
//! Page transition overlay, scroll-reveal animations and click ripples.
//! [`Effects::refresh`] registers newly inserted content with reveal and ripple.

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, Event, HtmlAnchorElement, HtmlElement, HtmlFormElement, IntersectionObserver,
    IntersectionObserverEntry, IntersectionObserverInit, MouseEvent,
};

use crate::app::App;
use crate::config::UiConfig;
use crate::dom;

pub const RIPPLE_SELECTOR: &str = ".interactive-glow, [data-ripple]";
pub const REVEAL_SELECTOR: &str = "[data-animate]";

const OVERLAY_ID: &str = "page-transition";
const SHELL_SELECTOR: &str = "[data-page-shell]";
const REDUCED_MOTION: &str = "(prefers-reduced-motion: reduce)";

// ========================
// Decisions
// ========================

/// What a click on an `a[href]` looked like
#[derive(Debug, Clone, Default)]
pub struct LinkClick<'a> {
    pub href: &'a str,
    pub target: &'a str,
    /// Host of the resolved link, empty for non-http schemes
    pub host: &'a str,
    pub page_host: &'a str,
    pub modal_trigger: bool,
    pub modified: bool,
    pub default_prevented: bool,
}

/// Whether a link click should play the leave transition before navigating
pub fn should_intercept(click: &LinkClick<'_>) -> bool {
    if click.default_prevented || click.modal_trigger || click.modified {
        return false;
    }
    if click.href.is_empty() || click.href.starts_with('#') {
        return false;
    }
    if !click.target.is_empty() && click.target != "_self" {
        return false;
    }
    click.host.is_empty() || click.host == click.page_host
}

/// Whether a form submission should show the overlay
pub fn submit_shows_overlay(default_prevented: bool, no_transition: &str, target: &str) -> bool {
    !default_prevented && no_transition != "true" && (target.is_empty() || target == "_self")
}

/// Ripples only for plain primary clicks, and never under reduced motion
pub fn should_ripple(button: i16, meta: bool, ctrl: bool, reduced_motion: bool) -> bool {
    button == 0 && !meta && !ctrl && !reduced_motion
}

fn is_modified(ev: &MouseEvent) -> bool {
    ev.meta_key() || ev.ctrl_key() || ev.shift_key() || ev.alt_key()
}

// ========================
// Transition overlay
// ========================

/// `#page-transition` overlay and the `[data-page-shell]` it covers
#[derive(Clone)]
pub struct PageTransition {
    overlay: Option<Element>,
    shell: Option<Element>,
    hide_ms: u32,
}

impl PageTransition {
    pub fn find(config: &UiConfig) -> Self {
        Self {
            overlay: dom::by_id(OVERLAY_ID),
            shell: dom::query(SHELL_SELECTOR),
            hide_ms: config.overlay_hide_ms,
        }
    }

    pub fn show(&self) {
        let Some(overlay) = &self.overlay else { return };
        dom::remove_classes(overlay, &["pointer-events-none", "opacity-0", "invisible"]);
        dom::add_classes(overlay, &["opacity-100", "pointer-events-auto"]);
        if let Some(shell) = &self.shell {
            dom::remove_class(shell, "is-ready");
            dom::add_class(shell, "is-leaving");
        }
    }

    pub fn hide(&self) {
        let Some(overlay) = &self.overlay else { return };
        dom::remove_classes(overlay, &["opacity-100", "pointer-events-auto"]);
        dom::add_classes(overlay, &["opacity-0", "pointer-events-none"]);
        let overlay = overlay.clone();
        Timeout::new(self.hide_ms, move || dom::add_class(&overlay, "invisible")).forget();
        self.reveal_shell();
    }

    pub fn reveal_shell(&self) {
        let Some(shell) = self.shell.clone() else { return };
        dom::remove_classes(&shell, &["is-leaving", "opacity-0"]);
        dom::next_frame(move || {
            if let Some(el) = shell.dyn_ref::<HtmlElement>() {
                let style = el.style();
                for property in ["opacity", "filter", "transform"] {
                    let _ = style.remove_property(property);
                }
            }
            dom::add_class(&shell, "is-ready");
        });
    }
}

// ========================
// Reveal & ripple
// ========================

pub struct Effects {
    observer: Option<IntersectionObserver>,
    ripple_lifetime_ms: u32,
}

impl Effects {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            observer: reveal_observer(config.reveal_threshold),
            ripple_lifetime_ms: config.ripple_lifetime_ms,
        }
    }

    /// Register reveal and ripple on `root` and its descendants
    pub fn refresh(&self, root: &Element) {
        for el in dom::query_all_inclusive(root, REVEAL_SELECTOR) {
            self.observe(&el);
        }
        for el in dom::query_all_inclusive(root, RIPPLE_SELECTOR) {
            attach_ripple(&el, self.ripple_lifetime_ms);
        }
    }

    fn observe(&self, el: &Element) {
        let Some(observer) = &self.observer else { return };
        if dom::claim(el, "data-animate-observed") {
            observer.observe(el);
        }
    }
}

fn reveal_observer(threshold: f64) -> Option<IntersectionObserver> {
    let callback = Closure::wrap(Box::new(|entries: js_sys::Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else { continue };
            if entry.is_intersecting() {
                let target = entry.target();
                dom::add_class(&target, "is-visible");
                observer.unobserve(&target);
            }
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options);
    callback.forget();
    match observer {
        Ok(observer) => Some(observer),
        Err(err) => {
            log::warn!("Reveal animations unavailable: {:?}", err);
            None
        }
    }
}

fn prefers_reduced_motion() -> bool {
    dom::window()
        .and_then(|win| win.match_media(REDUCED_MOTION).ok().flatten())
        .is_some_and(|query| query.matches())
}

fn attach_ripple(el: &Element, lifetime_ms: u32) {
    if !dom::claim(el, "data-ripple-bound") {
        return;
    }
    dom::add_class(el, "relative");
    let host = el.clone();
    dom::listen(el, "click", move |ev: MouseEvent| {
        if !should_ripple(ev.button(), ev.meta_key(), ev.ctrl_key(), prefers_reduced_motion()) {
            return;
        }
        let Some(ripple) = dom::create_element("span").and_then(|s| s.dyn_into::<HtmlElement>().ok()) else {
            return;
        };
        let rect = host.get_bounding_client_rect();
        ripple.set_class_name("ripple");
        let style = ripple.style();
        let _ = style.set_property("left", &format!("{}px", f64::from(ev.client_x()) - rect.left()));
        let _ = style.set_property("top", &format!("{}px", f64::from(ev.client_y()) - rect.top()));
        if host.append_child(&ripple).is_ok() {
            Timeout::new(lifetime_ms, move || ripple.remove()).forget();
        }
    });
}

// ========================
// Binding
// ========================

/// Startup reveal, overlay lifecycle, link and form interception.
pub fn bind(app: &Rc<App>) {
    let (Some(win), Some(doc)) = (dom::window(), dom::document()) else { return };

    let effects = Rc::new(Effects::new(&app.config));
    if let Some(root) = doc.document_element() {
        effects.refresh(&root);
    }
    app.register_refresh(move |root| effects.refresh(root));

    let transition = PageTransition::find(&app.config);
    transition.reveal_shell();
    transition.hide();

    let shown = transition.clone();
    dom::listen(&win, "pageshow", move |_: Event| shown.hide());
    let leaving = transition.clone();
    dom::listen(&win, "beforeunload", move |_: Event| leaving.show());

    let delay_ms = app.config.navigation_delay_ms;
    let links = transition.clone();
    dom::listen(&doc, "click", move |ev: MouseEvent| {
        let Some(anchor) = dom::closest(ev.target(), "a[href]") else { return };
        let Ok(anchor) = anchor.dyn_into::<HtmlAnchorElement>() else { return };
        let href = dom::attr(&anchor, "href");
        let target = anchor.target();
        let host = anchor.host();
        let page_host = dom::current_host();
        let click = LinkClick {
            href: &href,
            target: &target,
            host: &host,
            page_host: &page_host,
            modal_trigger: anchor.has_attribute("data-modal-target"),
            modified: is_modified(&ev),
            default_prevented: ev.default_prevented(),
        };
        if !should_intercept(&click) {
            return;
        }
        links.show();
        ev.prevent_default();
        let destination = anchor.href();
        Timeout::new(delay_ms, move || dom::navigate(&destination)).forget();
    });

    let forms = transition;
    dom::listen(&doc, "submit", move |ev: Event| {
        let Some(form) = ev.target().and_then(|t| t.dyn_into::<HtmlFormElement>().ok()) else { return };
        if submit_shows_overlay(ev.default_prevented(), &dom::attr(&form, "data-no-transition"), &form.target()) {
            forms.show();
        }
    });
}
