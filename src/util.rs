//! Shared Utilities
//!
//! Cookie lookup, CSRF resolution, escaping and formatting helpers.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use wasm_bindgen::JsCast;
use web_sys::HtmlDocument;

use crate::dom;

/// Cookie holding Django's CSRF token
pub const CSRF_COOKIE: &str = "csrftoken";

/// Characters left untouched by `application/x-www-form-urlencoded`
const FORM_URLENCODED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'*').remove(b'-').remove(b'.').remove(b'_');

/// Find a cookie in a `document.cookie` string.
///
/// Returns `None` when the name is absent or appears more than once.
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    let haystack = format!("; {}", cookies);
    let needle = format!("; {}=", name);
    let mut parts = haystack.split(needle.as_str());
    let _before = parts.next()?;
    let value = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(value.split(';').next().unwrap_or_default().to_string())
}

/// CSRF token: `csrftoken` cookie, then `<meta name="csrf-token">`, else empty.
pub fn csrf_token() -> String {
    let cookies = dom::document()
        .and_then(|doc| doc.dyn_into::<HtmlDocument>().ok())
        .and_then(|doc| doc.cookie().ok())
        .unwrap_or_default();
    resolve_csrf(&cookies, meta_csrf_token())
}

fn meta_csrf_token() -> Option<String> {
    dom::query(r#"meta[name="csrf-token"]"#)?.get_attribute("content")
}

/// Cookie wins over the meta tag
pub fn resolve_csrf(cookies: &str, meta: Option<String>) -> String {
    get_cookie(cookies, CSRF_COOKIE)
        .filter(|token| !token.is_empty())
        .or(meta)
        .unwrap_or_default()
}

/// Escape text for interpolation into HTML markup and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escape a value for use inside a CSS selector.
pub fn escape_selector(value: &str) -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::css::escape(value)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        escape_selector_fallback(value)
    }
}

/// Backslash-escape control characters and ASCII punctuation
pub fn escape_selector_fallback(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        let code = ch as u32;
        let needs_escape = code <= 0x1f
            || (0x7f..=0x9f).contains(&code)
            || (ch.is_ascii_punctuation() && ch != '-' && ch != '_');
        if needs_escape {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// `[attr="value"]` selector with the value escaped
pub fn attr_selector(attr: &str, value: &str) -> String {
    format!(r#"[{}="{}"]"#, attr, escape_selector(value))
}

/// Format a price for display using Indonesian grouping (`1.000.000`).
///
/// Empty input yields an empty string; input that is not a number in the
/// browser's `Number()` sense is returned as-is.
pub fn format_currency(value: Option<&str>) -> String {
    let Some(raw) = value else { return String::new() };
    if raw.is_empty() {
        return String::new();
    }
    match parse_js_number(raw) {
        Some(number) => format_id_number(number),
        None => raw.to_string(),
    }
}

/// `Number(text)` semantics: surrounding whitespace is ignored, blank is zero,
/// `Infinity` and `0x`/`0o`/`0b` literals are accepted. `None` stands for NaN.
pub fn parse_js_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }

    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &trimmed[2..];
        if digits.is_empty() {
            return None;
        }
        return digits.chars().try_fold(0.0_f64, |acc, c| {
            c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
        });
    }

    let decimal_chars = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !decimal_chars {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// `id-ID` number formatting: `.` groups thousands, `,` separates up to three
/// decimals, ties round away from zero
pub fn format_id_number(number: f64) -> String {
    let sign = if number.is_sign_negative() { "-" } else { "" };
    if number.is_infinite() {
        return format!("{}∞", sign);
    }

    let (mut int_digits, mut frac_digits) = round_to_millis(number.abs());
    while frac_digits.last() == Some(&0) {
        frac_digits.pop();
    }
    if int_digits.is_empty() {
        int_digits.push(0);
    }

    let mut grouped = String::with_capacity(int_digits.len() * 2);
    for (i, digit) in int_digits.iter().enumerate() {
        if i > 0 && (int_digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(char::from(b'0' + digit));
    }
    if !frac_digits.is_empty() {
        grouped.push(',');
        grouped.extend(frac_digits.iter().map(|d| char::from(b'0' + d)));
    }
    format!("{}{}", sign, grouped)
}

/// Integer digits and exactly three fraction digits of `value`, rounded half
/// away from zero on its exact binary value
fn round_to_millis(value: f64) -> (Vec<u8>, Vec<u8>) {
    // 1100 places covers every fraction digit an f64 can have
    let exact = format!("{:.1100}", value);
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let mut digits: Vec<u8> = int_part.bytes().map(|b| b - b'0').collect();
    let int_len = digits.len();
    let mut frac = frac_part.bytes().map(|b| b - b'0');
    digits.extend(frac.by_ref().take(3));
    let round_up = frac.next().is_some_and(|d| d >= 5);

    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            return (digits[..int_len + 1].to_vec(), digits[int_len + 1..].to_vec());
        }
    }
    let frac_digits = digits.split_off(int_len);
    (digits, frac_digits)
}

/// `application/x-www-form-urlencoded` query string
pub fn encode_query<K, V>(pairs: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key.as_ref()), encode_component(value.as_ref())))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, FORM_URLENCODED).to_string().replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie() {
        let cookies = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(get_cookie(cookies, "csrftoken"), Some("tok123".to_string()));
        assert_eq!(get_cookie(cookies, "sessionid"), Some("abc".to_string()));
        assert_eq!(get_cookie(cookies, "missing"), None);
        // Prefix of another name must not match
        assert_eq!(get_cookie("xcsrftoken=nope", "csrftoken"), None);
    }

    #[test]
    fn test_csrf_resolution_order() {
        assert_eq!(resolve_csrf("csrftoken=fromcookie", Some("frommeta".into())), "fromcookie");
        assert_eq!(resolve_csrf("other=1", Some("frommeta".into())), "frommeta");
        assert_eq!(resolve_csrf("", None), "");
    }

    #[test]
    fn test_escape_html() {
        let escaped = escape_html("<script>");
        assert!(!escaped.contains('<'));
        assert!(!escaped.contains('>'));
        assert_eq!(escaped, "&lt;script&gt;");
        assert_eq!(escape_html(r#"Tom & "Jerry's""#), "Tom &amp; &quot;Jerry&#39;s&quot;");
    }

    #[test]
    fn test_escape_selector_fallback() {
        assert_eq!(escape_selector_fallback("42"), "42");
        assert_eq!(escape_selector_fallback(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape_selector_fallback("x.y#z"), r"x\.y\#z");
        assert_eq!(escape_selector_fallback("slug-name_1"), "slug-name_1");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Some("1000000")), "1.000.000");
        assert_eq!(format_currency(Some("150000.00")), "150.000");
        assert_eq!(format_currency(Some("1500.5")), "1.500,5");
        assert_eq!(format_currency(Some("999")), "999");
        assert_eq!(format_currency(None), "");
        assert_eq!(format_currency(Some("")), "");
        assert_eq!(format_currency(Some("abc")), "abc");
        assert_eq!(format_currency(Some("inf")), "inf");
    }

    #[test]
    fn test_format_currency_follows_number_parsing() {
        assert_eq!(format_currency(Some("0x10")), "16");
        assert_eq!(format_currency(Some("0b101")), "5");
        assert_eq!(format_currency(Some("0xZZ")), "0xZZ");
        assert_eq!(format_currency(Some("Infinity")), "∞");
        assert_eq!(format_currency(Some("-Infinity")), "-∞");
        assert_eq!(format_currency(Some("-0")), "-0");
        assert_eq!(format_currency(Some("  ")), "0");
        assert_eq!(format_currency(Some("1e6")), "1.000.000");
    }

    #[test]
    fn test_ties_round_away_from_zero() {
        assert_eq!(format_id_number(0.0625), "0,063");
        assert_eq!(format_id_number(-0.0625), "-0,063");
        assert_eq!(format_id_number(999.99999), "1.000");
        assert_eq!(format_id_number(1.0004), "1");
    }

    #[test]
    fn test_format_id_number_negative_and_rounding() {
        assert_eq!(format_id_number(-1234.5678), "-1.234,568");
        assert_eq!(format_id_number(0.0), "0");
    }

    #[test]
    fn test_encode_query() {
        let pairs = [("city", "Bandung Barat"), ("category", "futsal&mini"), ("q", "")];
        assert_eq!(encode_query(&pairs), "city=Bandung+Barat&category=futsal%26mini&q=");
    }
}
