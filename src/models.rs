//! Frontend Models
//!
//! Data structures exchanged with the server endpoints and carried by the
//! `wishlist:changed` event.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ========================
// Lenient field decoding
// ========================

/// Ids and prices arrive as strings or numbers depending on the endpoint
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Optional text field; values of any other type are ignored
fn lenient_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// Optional count; anything but a non-negative integer is ignored
fn lenient_opt_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .and_then(|value| value.as_u64())
        .and_then(|count| u32::try_from(count).ok()))
}

// ========================
// Venue
// ========================

/// Client-side projection of a venue, as cached on wishlist controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VenueRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub toggle_url: String,
}

/// Venue fields sent by the toggle endpoint; absent fields keep local values
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct VenuePatch {
    #[serde(deserialize_with = "lenient_opt_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub price: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub url: Option<String>,
    #[serde(alias = "image_url", deserialize_with = "lenient_opt_string")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(alias = "toggleUrl", deserialize_with = "lenient_opt_string")]
    pub toggle_url: Option<String>,
}

impl VenueRecord {
    #[cfg(test)]
    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), ..Default::default() }
    }

    /// Overlay server-provided fields (server wins)
    pub fn merge(&mut self, patch: VenuePatch) {
        let VenuePatch { id, name, city, category, price, url, image, description, toggle_url } = patch;
        let fields = [
            (&mut self.id, id),
            (&mut self.name, name),
            (&mut self.city, city),
            (&mut self.category, category),
            (&mut self.price, price),
            (&mut self.url, url),
            (&mut self.image, image),
            (&mut self.description, description),
            (&mut self.toggle_url, toggle_url),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }

    /// Display name for notices
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "venue" } else { &self.name }
    }
}

// ========================
// Wishlist
// ========================

/// Body of the toggle request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TogglePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

/// Toggle endpoint response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct WishlistToggleResponse {
    pub wishlisted: bool,
    pub venue: Option<VenuePatch>,
    #[serde(deserialize_with = "lenient_opt_text")]
    pub wishlist_item_html: Option<String>,
    #[serde(deserialize_with = "lenient_opt_count")]
    pub wishlist_count: Option<u32>,
}

/// Payload of the document-level `wishlist:changed` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistChanged {
    #[serde(deserialize_with = "lenient_string")]
    pub venue_id: String,
    #[serde(default)]
    pub wishlisted: bool,
    #[serde(default)]
    pub venue_data: Option<VenueRecord>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub wishlist_item_html: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_count")]
    pub wishlist_count: Option<u32>,
}

impl WishlistChanged {
    /// Server-rendered card markup, if any non-blank markup was supplied
    pub fn item_html(&self) -> Option<&str> {
        self.wishlist_item_html
            .as_deref()
            .map(str::trim)
            .filter(|html| !html.is_empty())
    }
}

// ========================
// Booking
// ========================

/// Cancellation endpoint response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CancelResponse {
    pub success: bool,
    #[serde(deserialize_with = "lenient_opt_string")]
    pub booking_id: Option<String>,
    pub message: Option<String>,
}

// ========================
// Catalog
// ========================

/// One venue in a catalog filter response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CatalogVenue {
    #[serde(deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(deserialize_with = "lenient_string")]
    pub price: String,
    #[serde(deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub image_url: String,
    #[serde(deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(deserialize_with = "lenient_string")]
    pub toggle_url: String,
    pub wishlisted: bool,
}

/// Catalog filter endpoint response
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogFilterResponse {
    pub venues: Vec<CatalogVenue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_response_accepts_numeric_ids() {
        let raw = r#"{"wishlisted": true, "venue": {"id": 7, "name": "Alpha Hall", "image_url": "/a.jpg"}, "wishlist_count": 2}"#;
        let resp: WishlistToggleResponse = serde_json::from_str(raw).unwrap();
        let venue = resp.venue.unwrap();
        assert_eq!(venue.id.as_deref(), Some("7"));
        assert_eq!(venue.image.as_deref(), Some("/a.jpg"));
        assert_eq!(resp.wishlist_count, Some(2));
        assert!(resp.wishlist_item_html.is_none());
    }

    #[test]
    fn test_badly_typed_optional_fields_are_ignored() {
        for raw in [
            r#"{"wishlisted": true, "wishlist_count": 2.5, "wishlist_item_html": 42}"#,
            r#"{"wishlisted": true, "wishlist_count": -1, "wishlist_item_html": {"html": "<p>"}}"#,
            r#"{"wishlisted": true, "wishlist_count": "3", "wishlist_item_html": null}"#,
        ] {
            let resp: WishlistToggleResponse = serde_json::from_str(raw).unwrap();
            assert!(resp.wishlisted);
            assert!(resp.wishlist_count.is_none());
            assert!(resp.wishlist_item_html.is_none());
        }
    }

    #[test]
    fn test_changed_detail_ignores_bad_count() {
        let change: WishlistChanged =
            serde_json::from_str(r#"{"venueId": "7", "wishlisted": false, "wishlistCount": -4}"#).unwrap();
        assert!(change.wishlist_count.is_none());
    }

    #[test]
    fn test_null_venue_is_none() {
        let resp: WishlistToggleResponse = serde_json::from_str(r#"{"wishlisted": false, "venue": null}"#).unwrap();
        assert!(!resp.wishlisted);
        assert!(resp.venue.is_none());
    }

    #[test]
    fn test_merge_server_wins_for_present_fields() {
        let mut venue = VenueRecord {
            id: "7".into(),
            name: "Old Name".into(),
            city: "Bandung".into(),
            ..Default::default()
        };
        venue.merge(VenuePatch {
            name: Some("Alpha Hall".into()),
            toggle_url: Some("/api/wishlist/7/toggle/".into()),
            ..Default::default()
        });
        assert_eq!(venue.name, "Alpha Hall");
        assert_eq!(venue.city, "Bandung");
        assert_eq!(venue.toggle_url, "/api/wishlist/7/toggle/");
    }

    #[test]
    fn test_display_name_fallback() {
        assert_eq!(VenueRecord::with_id("1").display_name(), "venue");
        let named = VenueRecord { name: "Alpha Hall".into(), ..Default::default() };
        assert_eq!(named.display_name(), "Alpha Hall");
    }

    #[test]
    fn test_wishlist_changed_wire_format_is_camel_case() {
        let change = WishlistChanged {
            venue_id: "7".into(),
            wishlisted: true,
            venue_data: Some(VenueRecord::with_id("7")),
            wishlist_item_html: None,
            wishlist_count: Some(1),
        };
        let json = serde_json::to_value(&change).unwrap();
        assert_eq!(json["venueId"], "7");
        assert_eq!(json["venueData"]["toggleUrl"], "");
        assert_eq!(json["wishlistCount"], 1);

        let parsed: WishlistChanged = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, change);
    }

    #[test]
    fn test_blank_item_html_is_ignored() {
        let change: WishlistChanged =
            serde_json::from_str(r#"{"venueId": 3, "wishlisted": true, "wishlistItemHtml": "   "}"#).unwrap();
        assert_eq!(change.venue_id, "3");
        assert!(change.item_html().is_none());
    }

    #[test]
    fn test_cancel_response_defaults() {
        let resp: CancelResponse = serde_json::from_str(r#"{"success": true, "booking_id": 42}"#).unwrap();
        assert!(resp.success);
        assert_eq!(resp.booking_id.as_deref(), Some("42"));
        assert!(resp.message.is_none());
    }

    #[test]
    fn test_catalog_response_requires_venues() {
        assert!(serde_json::from_str::<CatalogFilterResponse>("{}").is_err());
        let resp: CatalogFilterResponse = serde_json::from_str(
            r#"{"venues": [{"id": 1, "name": "Court", "price": "150000.00", "wishlisted": true}]}"#,
        )
        .unwrap();
        assert_eq!(resp.venues[0].id, "1");
        assert!(resp.venues[0].wishlisted);
        assert_eq!(resp.venues[0].city, "");
    }
}
