//! DOM Helpers
//!
//! Thin wrappers over `web-sys` for lookups, class toggling, marker
//! attributes and listener wiring. Missing window/document degrade to no-ops.

use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{AddEventListenerOptions, Document, Element, EventTarget, HtmlElement, NodeList, Window};

// ── Lookups ──

pub fn window() -> Option<Window> {
    web_sys::window()
}

pub fn document() -> Option<Document> {
    window()?.document()
}

pub fn body() -> Option<HtmlElement> {
    document()?.body()
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn query(selector: &str) -> Option<Element> {
    document()?.query_selector(selector).ok()?
}

pub fn query_all(selector: &str) -> Vec<Element> {
    document()
        .and_then(|doc| doc.query_selector_all(selector).ok())
        .map(elements)
        .unwrap_or_default()
}

pub fn query_within(parent: &Element, selector: &str) -> Option<Element> {
    parent.query_selector(selector).ok()?
}

/// Query all matching elements within a parent element.
pub fn query_all_within(parent: &Element, selector: &str) -> Vec<Element> {
    parent.query_selector_all(selector).map(elements).unwrap_or_default()
}

/// Matching elements in `root` itself and its descendants
pub fn query_all_inclusive(root: &Element, selector: &str) -> Vec<Element> {
    let mut found = Vec::new();
    if root.matches(selector).unwrap_or(false) {
        found.push(root.clone());
    }
    found.extend(query_all_within(root, selector));
    found
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Nearest ancestor (or self) of an event target matching `selector`
pub fn closest(target: Option<EventTarget>, selector: &str) -> Option<Element> {
    target?.dyn_into::<Element>().ok()?.closest(selector).ok()?
}

pub fn create_element(tag: &str) -> Option<Element> {
    document()?.create_element(tag).ok()
}

// ── Classes ──

pub fn add_class(el: &Element, cls: &str) {
    let _ = el.class_list().add_1(cls);
}

pub fn remove_class(el: &Element, cls: &str) {
    let _ = el.class_list().remove_1(cls);
}

pub fn add_classes(el: &Element, classes: &[&str]) {
    for cls in classes {
        add_class(el, cls);
    }
}

pub fn remove_classes(el: &Element, classes: &[&str]) {
    for cls in classes {
        remove_class(el, cls);
    }
}

pub fn toggle_class(el: &Element, cls: &str, force: bool) {
    let _ = el.class_list().toggle_with_force(cls, force);
}

pub fn has_class(el: &Element, cls: &str) -> bool {
    el.class_list().contains(cls)
}

// ── Attributes ──

pub fn set_attr(el: &Element, name: &str, value: &str) {
    let _ = el.set_attribute(name, value);
}

pub fn remove_attr(el: &Element, name: &str) {
    let _ = el.remove_attribute(name);
}

/// Attribute value, empty string when absent
pub fn attr(el: &Element, name: &str) -> String {
    el.get_attribute(name).unwrap_or_default()
}

/// Marker attributes hold `"true"` when set
pub fn flag(el: &Element, name: &str) -> bool {
    el.get_attribute(name).as_deref() == Some("true")
}

pub fn set_flag(el: &Element, name: &str, on: bool) {
    set_attr(el, name, if on { "true" } else { "false" });
}

/// Check-and-set a marker attribute. Returns false if it was already set.
pub fn claim(el: &Element, name: &str) -> bool {
    if flag(el, name) {
        return false;
    }
    set_flag(el, name, true);
    true
}

// ── Events ──

/// Attach a listener for the lifetime of the page.
pub fn listen<E, F>(target: &EventTarget, event: &str, handler: F)
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    if let Err(err) = target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref()) {
        log::warn!("Failed to bind {} listener: {:?}", event, err);
    }
    cb.forget();
}

/// Attach a listener that fires at most once.
pub fn listen_once<E, F>(target: &EventTarget, event: &str, handler: F)
where
    E: FromWasmAbi + 'static,
    F: FnMut(E) + 'static,
{
    let cb = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
    let opts = AddEventListenerOptions::new();
    opts.set_once(true);
    if let Err(err) = target.add_event_listener_with_callback_and_add_event_listener_options(
        event,
        cb.as_ref().unchecked_ref(),
        &opts,
    ) {
        log::warn!("Failed to bind {} listener: {:?}", event, err);
    }
    cb.forget();
}

/// Run `f` once the document has been parsed.
pub fn on_document_ready<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(doc) = document() else { return };
    if doc.ready_state() == "loading" {
        let mut pending = Some(f);
        listen_once(&doc, "DOMContentLoaded", move |_: web_sys::Event| {
            if let Some(f) = pending.take() {
                f();
            }
        });
    } else {
        f();
    }
}

/// Run `f` on the next animation frame.
pub fn next_frame<F>(f: F)
where
    F: FnOnce() + 'static,
{
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(f);
    let _ = win.request_animation_frame(cb.unchecked_ref());
}

/// Current `pathname + search`, used as the post-action return location
pub fn current_location() -> String {
    window()
        .map(|win| {
            let loc = win.location();
            format!(
                "{}{}",
                loc.pathname().unwrap_or_default(),
                loc.search().unwrap_or_default()
            )
        })
        .unwrap_or_default()
}

pub fn current_host() -> String {
    window().and_then(|win| win.location().host().ok()).unwrap_or_default()
}

pub fn navigate(url: &str) {
    if let Some(win) = window() {
        if let Err(err) = win.location().set_href(url) {
            log::error!("Navigation to {} failed: {:?}", url, err);
        }
    }
}
