//! Wishlist card synthesized on the client when the server sent no markup.

use leptos::mount::mount_to;
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom;
use crate::models::VenueRecord;
use crate::util::format_currency;

use super::control;

const CARD_CLASS: &str = "card-tilt group relative overflow-hidden rounded-3xl border border-white/10 bg-white/5 p-6 shadow-xl shadow-slate-950/40 backdrop-blur-xl";
const BUTTON_CLASS: &str = "wishlist-button wishlist-button--active rounded-full border border-white/20 bg-white/10 p-2 text-white transition hover:bg-white/20";
const PRICE_CLASS: &str = "rounded-full border border-white/20 bg-white/10 px-3 py-1 text-xs uppercase tracking-widest text-white/70";
const LINK_CLASS: &str = "interactive-glow rounded-2xl bg-white/10 px-4 py-2 text-sm font-semibold text-white transition hover:bg-white/20";

pub const HEART_PATH: &str = "M21 8.25c0-2.485-2.099-4.5-4.688-4.5-1.935 0-3.597 1.126-4.312 2.733-.715-1.607-2.377-2.733-4.313-2.733C5.1 3.75 3 5.765 3 8.25c0 7.22 9 12 9 12s9-4.78 9-12z";

/// Non-JS form action for a toggle endpoint
pub fn fallback_action(toggle_url: &str) -> String {
    toggle_url.replacen("/api/", "/", 1)
}

/// `Rp 1.500.000`, the raw price if it isn't numeric, or a bare `Rp`
pub fn price_label(price: &str) -> String {
    let formatted = format_currency(Some(price));
    if formatted.is_empty() {
        "Rp".to_string()
    } else {
        format!("Rp {}", formatted)
    }
}

/// Detail link, `#` when the venue has no page
pub fn card_href(url: &str) -> String {
    if url.is_empty() { "#".to_string() } else { url.to_string() }
}

#[component]
pub fn HeartIcon() -> impl IntoView {
    view! {
        <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" stroke-width="1.5" class="h-6 w-6">
            <path stroke-linecap="round" stroke-linejoin="round" d=HEART_PATH />
        </svg>
    }
}

/// A wishlisted venue as it appears in `[data-wishlist-grid]`
#[component]
pub fn WishlistCard(venue: VenueRecord, csrf_token: String, next: String) -> impl IntoView {
    let action = fallback_action(&venue.toggle_url);
    let price = price_label(&venue.price);
    let href = card_href(&venue.url);
    let csrf_input = (!csrf_token.is_empty())
        .then(move || view! { <input type="hidden" name="csrfmiddlewaretoken" value=csrf_token /> });
    let VenueRecord { id, name, city, category, price: raw_price, url, image, description, toggle_url } = venue;
    let (item_id, alt, image_src) = (id.clone(), name.clone(), image.clone());
    let (category_text, name_text, city_text) = (category.clone(), name.clone(), city.clone());
    let description_text = description.clone();

    view! {
        <article class=CARD_CLASS data-animate="" data-wishlist-item=item_id>
            <img src=image_src alt=alt class="h-48 w-full rounded-2xl object-cover" />
            <div class="mt-4 flex items-start justify-between">
                <div>
                    <p class="text-xs uppercase tracking-[0.4em] text-white/50">{category_text}</p>
                    <h3 class="text-xl font-semibold text-white">{name_text}</h3>
                    <p class="text-sm text-white/60">{city_text}</p>
                </div>
                <form method="post" action=action data-wishlist-form="">
                    {csrf_input}
                    <input type="hidden" name="next" value=next />
                    <button
                        type="button"
                        class=BUTTON_CLASS
                        aria-pressed="true"
                        data-wishlisted="true"
                        data-venue=id
                        data-venue-name=name
                        data-venue-city=city
                        data-venue-category=category
                        data-venue-price=raw_price
                        data-venue-url=url
                        data-venue-image=image
                        data-venue-description=description
                        data-toggle-url=toggle_url
                    >
                        <HeartIcon />
                    </button>
                </form>
            </div>
            <p class="mt-2 text-sm text-white/70">{description_text}</p>
            <div class="mt-4 flex items-center justify-between">
                <span class=PRICE_CLASS>{price}</span>
                <a href=href class=LINK_CLASS data-ripple="">"View product"</a>
            </div>
        </article>
    }
}

/// Render a card into a detached host and return its root element.
pub fn build(venue: VenueRecord, csrf_token: String, next: String) -> Option<Element> {
    let host = dom::create_element("div")?.dyn_into::<HtmlElement>().ok()?;
    mount_to(host.clone(), move || view! { <WishlistCard venue=venue csrf_token=csrf_token next=next /> })
        .forget();
    let card = host.first_element_child()?;
    for button in dom::query_all_within(&card, control::BUTTON_SELECTOR) {
        control::prepare(&button);
        control::render_state(&button, true);
    }
    Some(card)
}
