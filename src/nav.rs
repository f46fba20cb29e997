//! Navigation menu toggles.

use web_sys::MouseEvent;

use crate::dom;

/// Next `aria-expanded` value for a toggle button
pub fn next_expanded(current: &str) -> &'static str {
    if current == "true" { "false" } else { "true" }
}

/// Mark the body as scripted and bind `[data-nav-toggle]` buttons.
pub fn bind() {
    if let Some(body) = dom::body() {
        dom::add_class(&body, "js-enabled");
    }

    for button in dom::query_all("[data-nav-toggle]") {
        let controls = dom::attr(&button, "aria-controls");
        if controls.is_empty() {
            continue;
        }
        let Some(menu) = dom::by_id(&controls) else { continue };
        let toggle = button.clone();
        dom::listen(&button, "click", move |_: MouseEvent| {
            let expanded = next_expanded(&dom::attr(&toggle, "aria-expanded"));
            dom::set_attr(&toggle, "aria-expanded", expanded);
            let hidden = dom::has_class(&menu, "hidden");
            dom::toggle_class(&menu, "hidden", !hidden);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_expanded() {
        assert_eq!(next_expanded("true"), "false");
        assert_eq!(next_expanded("false"), "true");
        assert_eq!(next_expanded(""), "true");
    }
}
