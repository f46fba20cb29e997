//! Modal Manager
//!
//! Stack of open dialogs. Only the top of the stack answers Escape, and the
//! body scroll lock is held while any modal is open.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};

use crate::app::App;
use crate::dom;
use crate::util::escape_selector;

/// Body class that disables page scrolling
pub const SCROLL_LOCK_CLASS: &str = "overflow-hidden";

/// Fallback focus targets, in priority order
const FOCUSABLE: &str = "[data-autofocus], input, select, textarea, button, a[href]";

/// Ordered set of open modals, most recent last
#[derive(Debug, Clone)]
pub struct ModalStack<T> {
    open: Vec<T>,
}

impl<T> Default for ModalStack<T> {
    fn default() -> Self {
        Self { open: Vec::new() }
    }
}

impl<T: PartialEq + Clone> ModalStack<T> {
    /// Push unless already open
    pub fn push(&mut self, modal: T) {
        if !self.open.contains(&modal) {
            self.open.push(modal);
        }
    }

    pub fn remove(&mut self, modal: &T) {
        self.open.retain(|m| m != modal);
    }

    pub fn top(&self) -> Option<T> {
        self.open.last().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.open.len()
    }

    /// Scroll lock is active iff anything is open
    pub fn scroll_locked(&self) -> bool {
        !self.is_empty()
    }
}

/// DOM side of the modal stack
#[derive(Default)]
pub struct ModalManager {
    stack: RefCell<ModalStack<Element>>,
}

impl ModalManager {
    pub fn open(&self, modal: &Element) {
        dom::remove_class(modal, "hidden");
        dom::set_attr(modal, "aria-hidden", "false");
        self.stack.borrow_mut().push(modal.clone());
        self.sync_scroll_lock();
        focus_initial(modal);
    }

    pub fn close(&self, modal: &Element) {
        dom::add_class(modal, "hidden");
        dom::set_attr(modal, "aria-hidden", "true");
        self.stack.borrow_mut().remove(modal);
        self.sync_scroll_lock();
    }

    /// Close the most recently opened modal. Returns false if none is open.
    pub fn close_top(&self) -> bool {
        let top = self.stack.borrow().top();
        match top {
            Some(modal) => {
                self.close(&modal);
                true
            }
            None => false,
        }
    }

    /// Close the modal enclosing `element`, if any
    pub fn close_containing(&self, element: &Element) {
        if let Some(modal) = element.closest("[data-modal]").ok().flatten() {
            self.close(&modal);
        }
    }

    fn sync_scroll_lock(&self) {
        let locked = self.stack.borrow().scroll_locked();
        if let Some(body) = dom::body() {
            dom::toggle_class(&body, SCROLL_LOCK_CLASS, locked);
        }
    }
}

fn focus_initial(modal: &Element) {
    let named = modal
        .get_attribute("data-modal-initial-focus")
        .filter(|id| !id.is_empty())
        .and_then(|id| dom::query_within(modal, &format!("#{}", escape_selector(&id))));
    let target = named.or_else(|| dom::query_within(modal, FOCUSABLE));
    if let Some(el) = target.and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        let _ = el.focus();
    }
}

/// Wire triggers, dismiss controls, Escape and default-open modals.
pub fn bind(app: &Rc<App>) {
    let Some(doc) = dom::document() else { return };

    let clicks = app.clone();
    dom::listen(&doc, "click", move |ev: MouseEvent| {
        if let Some(trigger) = dom::closest(ev.target(), "[data-modal-target]") {
            let modal_id = dom::attr(&trigger, "data-modal-target");
            if let Some(modal) = dom::by_id(&modal_id) {
                ev.prevent_default();
                clicks.modals.open(&modal);
                return;
            }
        }
        if let Some(dismiss) = dom::closest(ev.target(), "[data-modal-close]") {
            ev.prevent_default();
            clicks.modals.close_containing(&dismiss);
        }
    });

    let keys = app.clone();
    dom::listen(&doc, "keydown", move |ev: KeyboardEvent| {
        if ev.key() == "Escape" && keys.modals.close_top() {
            ev.prevent_default();
        }
    });

    for modal in dom::query_all("[data-modal]") {
        if !modal.has_attribute("aria-hidden") {
            let hidden = dom::has_class(&modal, "hidden");
            dom::set_attr(&modal, "aria-hidden", if hidden { "true" } else { "false" });
        }
        let default_open = modal.get_attribute("data-modal-default-open");
        if default_open.is_some_and(|value| !value.is_empty() && value != "false") {
            app.modals.open(&modal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_is_idempotent() {
        let mut stack = ModalStack::default();
        stack.push("login");
        stack.push("login");
        assert_eq!(stack.len(), 1);
    }

    #[test]
    fn test_escape_closes_only_top() {
        let mut stack = ModalStack::default();
        stack.push("booking");
        stack.push("confirm-cancel");
        assert_eq!(stack.top(), Some("confirm-cancel"));

        let top = stack.top().unwrap();
        stack.remove(&top);
        assert_eq!(stack.top(), Some("booking"));
        assert!(stack.scroll_locked());

        let top = stack.top().unwrap();
        stack.remove(&top);
        assert!(stack.top().is_none());
        assert!(!stack.scroll_locked());
    }

    #[test]
    fn test_closing_lower_modal_keeps_lock() {
        let mut stack = ModalStack::default();
        stack.push(1);
        stack.push(2);
        stack.remove(&1);
        assert_eq!(stack.top(), Some(2));
        assert!(stack.scroll_locked());
    }
}
