//! RagaSpace Frontend App
//!
//! Shared state for every page controller: configuration, the toaster, the
//! modal stack and the registry of callbacks that wire up inserted content.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::Element;

use crate::config::UiConfig;
use crate::modal::ModalManager;
use crate::toast::{self, Toaster};
use crate::{booking, catalog, dom, effects, modal, nav, wishlist};

type RefreshFn = Box<dyn Fn(&Element)>;

pub struct App {
    pub config: UiConfig,
    pub toaster: Toaster,
    pub modals: ModalManager,
    refreshers: RefCell<Vec<RefreshFn>>,
}

impl App {
    pub fn new(config: UiConfig) -> Rc<Self> {
        let toaster = Toaster::new(&config);
        Rc::new(Self {
            config,
            toaster,
            modals: ModalManager::default(),
            refreshers: RefCell::new(Vec::new()),
        })
    }

    /// Run `f` for every subtree passed to [`App::refresh_interactive`]
    pub fn register_refresh<F>(&self, f: F)
    where
        F: Fn(&Element) + 'static,
    {
        self.refreshers.borrow_mut().push(Box::new(f));
    }

    /// Wire up dynamically inserted content
    pub fn refresh_interactive(&self, root: &Element) {
        for refresh in self.refreshers.borrow().iter() {
            refresh(root);
        }
    }

    /// Bind every page controller. Wishlist handlers go before the effects
    /// layer so link interception sees their `preventDefault`.
    pub fn start(self: &Rc<Self>) {
        toast::bootstrap_toasts(&self.config);
        self.toaster.mount();

        if let Some(root) = dom::document().and_then(|doc| doc.document_element()) {
            booking::prepare_cancel_forms(self, &root);
        }
        let weak = Rc::downgrade(self);
        self.register_refresh(move |root| {
            if let Some(app) = weak.upgrade() {
                booking::prepare_cancel_forms(&app, root);
            }
        });

        wishlist::bind(self);
        nav::bind();
        modal::bind(self);
        effects::bind(self);
        catalog::bind(self);
        log::info!("RagaSpace UI ready");
    }
}
