//! Front-end Configuration
//!
//! Timings and endpoint paths. Pages may override any field with a JSON
//! block: `<script type="application/json" id="ragaspace-config">{...}</script>`.

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::dom;

/// Id of the optional configuration `<script>` element
pub const CONFIG_ELEMENT_ID: &str = "ragaspace-config";

/// Placeholder replaced by the venue id in `wishlist_toggle_path`
pub const VENUE_ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`
    pub log_level: String,
    pub toast_duration_ms: u32,
    /// Removal deadline when a toast's exit transition never ends
    pub toast_exit_fallback_ms: u32,
    pub wishlist_toast_ms: u32,
    pub wishlist_error_toast_ms: u32,
    /// Delay between showing the transition overlay and navigating
    pub navigation_delay_ms: u32,
    pub overlay_hide_ms: u32,
    pub ripple_lifetime_ms: u32,
    pub card_exit_fallback_ms: u32,
    pub reveal_threshold: f64,
    pub wishlist_toggle_path: String,
    pub catalog_filter_path: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            toast_duration_ms: 3000,
            toast_exit_fallback_ms: 400,
            wishlist_toast_ms: 1000,
            wishlist_error_toast_ms: 4500,
            navigation_delay_ms: 320,
            overlay_hide_ms: 400,
            ripple_lifetime_ms: 750,
            card_exit_fallback_ms: 350,
            reveal_threshold: 0.2,
            wishlist_toggle_path: "/api/wishlist/{id}/toggle/".to_string(),
            catalog_filter_path: "/api/catalog/filter/".to_string(),
        }
    }
}

impl UiConfig {
    /// Parse a JSON override block; missing fields keep their defaults
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(raw)
    }

    /// Read the page's configuration block, falling back to defaults
    pub fn load() -> Self {
        let Some(raw) = dom::by_id(CONFIG_ELEMENT_ID).and_then(|el| el.text_content()) else {
            return Self::default();
        };
        match Self::from_json(&raw) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring malformed #{}: {}", CONFIG_ELEMENT_ID, err);
                Self::default()
            }
        }
    }

    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Default toggle endpoint for a venue
    pub fn toggle_url_for(&self, venue_id: &str) -> String {
        self.wishlist_toggle_path.replace(VENUE_ID_PLACEHOLDER, venue_id)
    }

    /// Catalog filter endpoint with an encoded query string
    pub fn catalog_filter_url(&self, query: &str) -> String {
        format!("{}?{}", self.catalog_filter_path, query)
    }
}
