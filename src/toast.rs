//! Toast Notifications
//!
//! Transient notices rendered into the shared `[data-toast-root]` live region.
//! Client-side toasts live in a reactive store and are rendered by
//! [`ToastStack`]; server-rendered notices found at load are re-activated in
//! place by [`bootstrap_toasts`].

use gloo_timers::callback::Timeout;
use leptos::mount::mount_to;
use leptos::prelude::*;
use reactive_stores::Store;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::config::UiConfig;
use crate::dom;

pub const TOAST_ROOT_CLASS: &str =
    "pointer-events-none fixed inset-x-0 bottom-4 z-50 flex flex-col items-center gap-3 px-4 sm:px-6";

const TOAST_BASE_CLASS: &str = "pointer-events-auto w-full max-w-md rounded-3xl border px-5 py-4 text-sm font-medium shadow-2xl shadow-slate-950/40 backdrop-blur transition-all duration-300";

/// Classes applied while a toast is entering or leaving
const TOAST_OFFSCREEN: [&str; 2] = ["opacity-0", "translate-y-2"];

// ========================
// Level
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastLevel {
    Success,
    #[default]
    Info,
    Warning,
    Error,
}

impl ToastLevel {
    /// Normalise free-form severity text (e.g. Django message tags)
    pub fn normalize(value: &str) -> Self {
        let level = value.to_lowercase();
        if level.contains("error") || level.contains("danger") || level.contains("alert") {
            ToastLevel::Error
        } else if level.contains("warn") {
            ToastLevel::Warning
        } else if level.contains("success") {
            ToastLevel::Success
        } else {
            ToastLevel::Info
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ToastLevel::Success => "success",
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        }
    }

    pub fn class_names(&self) -> &'static str {
        match self {
            ToastLevel::Success => "border-emerald-400/40 bg-emerald-500/20 text-emerald-50",
            ToastLevel::Info => "border-white/20 bg-slate-950/90 text-white",
            ToastLevel::Warning => "border-amber-400/40 bg-amber-500/20 text-amber-50",
            ToastLevel::Error => "border-rose-500/40 bg-rose-500/20 text-rose-50",
        }
    }
}

/// Full class list for a toast in the given lifecycle phase
pub fn toast_class(level: ToastLevel, entered: bool, hiding: bool) -> String {
    let mut class = format!("{} {}", TOAST_BASE_CLASS, level.class_names());
    if hiding {
        class.push_str(" opacity-0 translate-y-2 pointer-events-none");
    } else if !entered {
        class.push_str(" opacity-0 translate-y-2");
    }
    class
}

/// Positive attribute duration wins, then the requested one, then the default
pub fn resolve_duration(attribute: Option<&str>, requested: Option<u32>, default_ms: u32) -> u32 {
    attribute
        .and_then(|raw| raw.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms > 0.0)
        .map(|ms| ms as u32)
        .or(requested.filter(|ms| *ms > 0))
        .unwrap_or(default_ms)
}

// ========================
// State
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
    pub duration_ms: u32,
    pub entered: bool,
    pub hiding: bool,
}

/// Toasts in display order
#[derive(Clone, Debug, Default, Store)]
pub struct ToastState {
    pub toasts: Vec<Toast>,
    pub next_id: u64,
}

/// Mark a toast as leaving. Returns false if it is gone or already leaving.
pub fn begin_hide(toasts: &mut [Toast], id: u64) -> bool {
    match toasts.iter_mut().find(|t| t.id == id) {
        Some(toast) if !toast.hiding => {
            toast.hiding = true;
            true
        }
        _ => false,
    }
}

/// Drop a toast whose exit has started
pub fn remove_hidden(toasts: &mut Vec<Toast>, id: u64) -> bool {
    let before = toasts.len();
    toasts.retain(|t| !(t.id == id && t.hiding));
    toasts.len() != before
}

/// Advance the id counter and return the new id
pub fn allocate_id(counter: &mut u64) -> u64 {
    *counter += 1;
    *counter
}

pub fn mark_entered(toasts: &mut [Toast], id: u64) {
    if let Some(toast) = toasts.iter_mut().find(|t| t.id == id) {
        toast.entered = true;
    }
}

// ========================
// Toaster
// ========================

/// Handle for showing toasts from any controller
#[derive(Clone, Copy)]
pub struct Toaster {
    state: Store<ToastState>,
    exit_fallback_ms: u32,
    default_duration_ms: u32,
}

impl Toaster {
    pub fn new(config: &UiConfig) -> Self {
        Self {
            state: Store::new(ToastState::default()),
            exit_fallback_ms: config.toast_exit_fallback_ms,
            default_duration_ms: config.toast_duration_ms,
        }
    }

    /// Show a toast with the default duration
    pub fn show(&self, message: &str, level: ToastLevel) -> Option<u64> {
        self.show_for(message, level, self.default_duration_ms)
    }

    /// Show a toast that dismisses itself after `duration_ms`
    pub fn show_for(&self, message: &str, level: ToastLevel, duration_ms: u32) -> Option<u64> {
        if message.is_empty() {
            return None;
        }
        let counter = self.state.next_id();
        let id = allocate_id(&mut counter.write());
        let duration_ms = resolve_duration(None, Some(duration_ms), self.default_duration_ms);
        self.state.toasts().write().push(Toast {
            id,
            message: message.to_string(),
            level,
            duration_ms,
            entered: false,
            hiding: false,
        });

        let toaster = *self;
        dom::next_frame(move || mark_entered(&mut toaster.state.toasts().write(), id));
        Timeout::new(duration_ms, move || toaster.hide(id)).forget();
        Some(id)
    }

    /// Start the exit transition; the toast is dropped when it ends
    pub fn hide(&self, id: u64) {
        if !begin_hide(&mut self.state.toasts().write(), id) {
            return;
        }
        let toaster = *self;
        Timeout::new(self.exit_fallback_ms, move || toaster.finish_hide(id)).forget();
    }

    fn finish_hide(&self, id: u64) {
        remove_hidden(&mut self.state.toasts().write(), id);
    }

    fn class_for(&self, id: u64) -> String {
        self.state
            .toasts()
            .read()
            .iter()
            .find(|t| t.id == id)
            .map(|t| toast_class(t.level, t.entered, t.hiding))
            .unwrap_or_default()
    }

    /// Render the stack into the page's toast root
    pub fn mount(&self) {
        let Some(root) = ensure_root().and_then(|el| el.dyn_into::<HtmlElement>().ok()) else {
            log::warn!("No toast root available");
            return;
        };
        let toaster = *self;
        mount_to(root, move || view! { <ToastStack toaster=toaster /> }).forget();
    }
}

// ========================
// Components
// ========================

/// Client-side toasts, in insertion order
#[component]
pub fn ToastStack(toaster: Toaster) -> impl IntoView {
    view! {
        <For
            each=move || toaster.state.toasts().get()
            key=|toast| toast.id
            children=move |toast| view! { <ToastItem toaster=toaster toast=toast /> }
        />
    }
}

#[component]
fn ToastItem(toaster: Toaster, toast: Toast) -> impl IntoView {
    let id = toast.id;
    view! {
        <div
            class=move || toaster.class_for(id)
            role="status"
            data-toast-message="true"
            data-toast-level={toast.level.as_str()}
            on:click=move |_| toaster.hide(id)
            on:transitionend=move |_| toaster.finish_hide(id)
        >
            {toast.message}
        </div>
    }
}

// ========================
// Root & server-rendered notices
// ========================

/// The single shared container, created on first use
pub fn ensure_root() -> Option<Element> {
    if let Some(root) = dom::query("[data-toast-root]") {
        if !dom::has_class(&root, "pointer-events-none") {
            root.set_class_name(TOAST_ROOT_CLASS);
        }
        return Some(root);
    }
    let root = dom::create_element("div")?;
    dom::set_attr(&root, "data-toast-root", "true");
    root.set_class_name(TOAST_ROOT_CLASS);
    dom::set_attr(&root, "aria-live", "polite");
    dom::set_attr(&root, "aria-atomic", "false");
    dom::body()?.append_child(&root).ok()?;
    Some(root)
}

/// Re-activate notices rendered by the server (e.g. Django messages).
pub fn bootstrap_toasts(config: &UiConfig) {
    let Some(root) = ensure_root() else { return };
    for toast in dom::query_all_within(&root, "[data-toast-message]") {
        register_server_toast(&toast, config);
    }
}

fn register_server_toast(toast: &Element, config: &UiConfig) {
    let level_hint = toast
        .get_attribute("data-message-level")
        .or_else(|| toast.get_attribute("data-toast-level"))
        .unwrap_or_default();
    let level = ToastLevel::normalize(&level_hint);
    toast.set_class_name(&toast_class(level, true, false));
    dom::set_attr(toast, "data-toast-level", level.as_str());
    dom::set_attr(toast, "data-toast-message", "true");
    if toast.get_attribute("role").is_none() {
        dom::set_attr(toast, "role", "status");
    }

    let duration = resolve_duration(
        toast.get_attribute("data-toast-duration").as_deref(),
        Some(config.toast_duration_ms),
        config.toast_duration_ms,
    );
    dom::set_attr(toast, "data-toast-duration", &duration.to_string());

    let fallback_ms = config.toast_exit_fallback_ms;
    let clicked = toast.clone();
    dom::listen(toast, "click", move |_: web_sys::MouseEvent| hide_element(&clicked, fallback_ms));
    let expired = toast.clone();
    Timeout::new(duration, move || hide_element(&expired, fallback_ms)).forget();
}

fn hide_element(toast: &Element, fallback_ms: u32) {
    if !dom::claim(toast, "data-toast-hiding") {
        return;
    }
    dom::add_classes(toast, &TOAST_OFFSCREEN);
    dom::add_class(toast, "pointer-events-none");

    let ended = toast.clone();
    dom::listen_once(toast, "transitionend", move |_: web_sys::Event| {
        if ended.is_connected() {
            ended.remove();
        }
    });
    let fallback = toast.clone();
    Timeout::new(fallback_ms, move || {
        if fallback.is_connected() {
            fallback.remove();
        }
    })
    .forget();
}
