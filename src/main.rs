//! RagaSpace Frontend Entry Point

mod api;
mod app;
mod booking;
mod catalog;
mod config;
mod dom;
mod effects;
mod error;
mod modal;
mod models;
mod nav;
mod toast;
mod util;
mod wishlist;

use app::App;
use config::UiConfig;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_logger::init(LevelFilter::Info) {
        web_sys::console::warn_1(&format!("[APP] Logger already installed: {}", err).into());
    }

    dom::on_document_ready(|| {
        let config = UiConfig::load();
        console_logger::set_level(config.log_filter());
        App::new(config).start();
    });
}
