//! Catalog Filter
//!
//! Submits `#catalog-filter-form` in the background and replaces
//! `#catalog-grid` with the matching venues.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Event, FormData, HtmlFormElement};

use crate::api;
use crate::app::App;
use crate::dom;
use crate::error::UiResult;
use crate::models::{CatalogFilterResponse, CatalogVenue};
use crate::util::{encode_query, escape_html, format_currency};
use crate::wishlist::card::HEART_PATH;
use crate::wishlist::control::{self, ButtonVisual, ACTIVE_CLASS};

pub const FORM_ID: &str = "catalog-filter-form";
pub const GRID_ID: &str = "catalog-grid";
pub const NO_RESULTS: &str = r#"<p class="text-white/70">No venues match your filters yet.</p>"#;

/// Markup for one catalog card. Every interpolated value is escaped.
pub fn render_catalog_card(venue: &CatalogVenue) -> String {
    let visual = ButtonVisual::for_state(venue.wishlisted);
    let active = if venue.wishlisted { ACTIVE_CLASS } else { "" };
    let price = escape_html(&format_currency(Some(&venue.price)));
    let e = escape_html;

    format!(
        r#"<article class="card-tilt group relative overflow-hidden rounded-3xl border border-white/10 bg-white/5 p-5 shadow-xl shadow-slate-950/40 backdrop-blur-xl transition hover:bg-white/10" data-animate>
  <div class="relative">
    <img src="{image}" alt="{name}" class="h-48 w-full rounded-2xl object-cover" />
    <button type="button" data-venue="{id}" data-wishlisted="{pressed}" data-venue-name="{name}" data-venue-city="{city}" data-venue-category="{category}" data-venue-price="{raw_price}" data-venue-url="{url}" data-venue-image="{image}" data-venue-description="{description}" data-toggle-url="{toggle_url}" class="wishlist-button {active} absolute right-3 top-3 rounded-full border border-white/30 bg-white/10 p-2 text-white transition hover:bg-white/20" aria-label="{label}" title="{label}" aria-pressed="{pressed}">
      <svg xmlns="http://www.w3.org/2000/svg" fill="{fill}" viewBox="0 0 24 24" stroke-width="1.5" stroke="{stroke}" class="h-6 w-6">
        <path stroke-linecap="round" stroke-linejoin="round" d="{heart}" />
      </svg>
    </button>
  </div>
  <div class="mt-4 flex flex-col gap-2">
    <p class="text-xs uppercase tracking-[0.4em] text-white/50">{category}</p>
    <h3 class="text-xl font-semibold text-white">{name}</h3>
    <p class="text-sm text-white/60">{city}</p>
  </div>
  <div class="mt-4 flex items-center justify-between">
    <span class="rounded-full border border-white/20 bg-white/10 px-3 py-1 text-xs uppercase tracking-widest text-white/70">Rp {price}</span>
    <a href="{url}" class="interactive-glow rounded-2xl bg-white/10 px-4 py-2 text-sm font-semibold text-white transition hover:bg-white/20" data-ripple>View product</a>
  </div>
</article>"#,
        id = e(&venue.id),
        name = e(&venue.name),
        city = e(&venue.city),
        category = e(&venue.category),
        raw_price = e(&venue.price),
        url = e(&venue.url),
        image = e(&venue.image_url),
        description = e(&venue.description),
        toggle_url = e(&venue.toggle_url),
        pressed = visual.aria_pressed(),
        label = visual.label,
        fill = visual.fill,
        stroke = visual.stroke,
        heart = HEART_PATH,
        active = active,
        price = price,
    )
}

/// Grid contents for a filter result
pub fn render_results(venues: &[CatalogVenue]) -> String {
    if venues.is_empty() {
        return NO_RESULTS.to_string();
    }
    venues.iter().map(render_catalog_card).collect::<Vec<_>>().join("\n")
}

/// String fields of a form, in document order. File inputs are skipped.
fn form_pairs(form: &HtmlFormElement) -> UiResult<Vec<(String, String)>> {
    let data = FormData::new_with_form(form)?;
    let mut pairs = Vec::new();
    let Some(entries) = js_sys::try_iter(&data)? else { return Ok(pairs) };
    for entry in entries {
        let Ok(pair) = entry?.dyn_into::<js_sys::Array>() else { continue };
        if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
            pairs.push((key, value));
        }
    }
    Ok(pairs)
}

async fn filter(app: &App, form: &HtmlFormElement) -> UiResult<()> {
    let query = encode_query(&form_pairs(form)?);
    let response = api::get(&app.config.catalog_filter_url(&query)).await?;
    let result: CatalogFilterResponse = response.json()?;
    log::debug!("Catalog filter returned {} venues", result.venues.len());

    let Some(grid) = dom::by_id(GRID_ID) else { return Ok(()) };
    grid.set_inner_html(&render_results(&result.venues));
    app.refresh_interactive(&grid);
    control::prepare_within(&grid);
    Ok(())
}

pub fn bind(app: &Rc<App>) {
    let Some(form) = dom::by_id(FORM_ID).and_then(|el| el.dyn_into::<HtmlFormElement>().ok()) else {
        return;
    };
    let app = app.clone();
    let target = form.clone();
    dom::listen(&form, "submit", move |ev: Event| {
        ev.prevent_default();
        let (app, form) = (app.clone(), target.clone());
        spawn_local(async move {
            if let Err(err) = filter(&app, &form).await {
                log::error!("Catalog filter failed: {}", err);
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> CatalogVenue {
        CatalogVenue {
            id: "7".into(),
            name: "Alpha Hall".into(),
            city: "Bandung".into(),
            category: "Futsal".into(),
            price: "150000".into(),
            url: "/venues/7/".into(),
            image_url: "/media/7.jpg".into(),
            description: String::new(),
            toggle_url: "/api/wishlist/7/toggle/".into(),
            wishlisted: false,
        }
    }

    #[test]
    fn test_empty_results_message() {
        assert_eq!(render_results(&[]), NO_RESULTS);
        assert!(NO_RESULTS.contains("No venues match your filters yet."));
    }

    #[test]
    fn test_card_carries_wishlist_dataset() {
        let html = render_catalog_card(&venue());
        assert!(html.contains(r#"data-venue="7""#));
        assert!(html.contains(r#"data-toggle-url="/api/wishlist/7/toggle/""#));
        assert!(html.contains(r#"aria-pressed="false""#));
        assert!(html.contains(r#"fill="none""#));
        assert!(html.contains("Rp 150.000"));
        assert!(!html.contains(ACTIVE_CLASS));
    }

    #[test]
    fn test_wishlisted_card_is_pressed() {
        let html = render_catalog_card(&CatalogVenue { wishlisted: true, ..venue() });
        assert!(html.contains(r#"aria-pressed="true""#));
        assert!(html.contains(r##"fill="#ef4444""##));
        assert!(html.contains(ACTIVE_CLASS));
    }

    #[test]
    fn test_card_escapes_venue_text() {
        let hostile = CatalogVenue {
            name: "<script>alert(1)</script>".into(),
            city: "\" onmouseover=\"x".into(),
            ..venue()
        };
        let html = render_catalog_card(&hostile);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("\" onmouseover=\""));
    }

    #[test]
    fn test_one_card_per_venue() {
        let html = render_results(&[venue(), CatalogVenue { id: "8".into(), ..venue() }]);
        assert_eq!(html.matches("<article").count(), 2);
    }
}
