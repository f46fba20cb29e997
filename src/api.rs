//! HTTP API client.
//!
//! Wraps `fetch` for the site's same-origin endpoints. Responses are read in
//! full and returned as an [`HttpResponse`] so callers can interpret status,
//! redirects and content type before decoding JSON.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Headers, HtmlFormElement, Request, RequestCredentials, RequestInit, Response};

use crate::dom;
use crate::error::{describe_js, UiError, UiResult};

/// Header Django uses to recognise AJAX requests
pub const REQUESTED_WITH: (&str, &str) = ("X-Requested-With", "XMLHttpRequest");

/// A fully-read response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub ok: bool,
    pub redirected: bool,
    /// Final URL after redirects
    pub url: String,
    pub content_type: String,
    pub body: String,
}

impl HttpResponse {
    pub fn is_json(&self) -> bool {
        self.content_type.contains("application/json")
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> UiResult<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Fail with [`UiError::Status`] for non-2xx responses
    pub fn require_ok(&self) -> UiResult<&Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(UiError::Status(self.status))
        }
    }
}

/// POST a form's fields as multipart form data.
pub async fn post_form(url: &str, form: &HtmlFormElement) -> UiResult<HttpResponse> {
    let body = FormData::new_with_form(form)?;
    let headers = Headers::new()?;
    headers.set(REQUESTED_WITH.0, REQUESTED_WITH.1)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_credentials(RequestCredentials::SameOrigin);
    opts.set_headers(&headers);
    opts.set_body(&body);

    send(url, &opts).await
}

/// POST a JSON body, adding `X-CSRFToken` when a token is known.
pub async fn post_json<T: Serialize>(url: &str, payload: &T, csrf_token: &str) -> UiResult<HttpResponse> {
    let body = serde_json::to_string(payload).map_err(|e| UiError::Malformed(e.to_string()))?;
    let headers = Headers::new()?;
    headers.set(REQUESTED_WITH.0, REQUESTED_WITH.1)?;
    headers.set("Content-Type", "application/json")?;
    headers.set("Accept", "application/json")?;
    if !csrf_token.is_empty() {
        headers.set("X-CSRFToken", csrf_token)?;
    }

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_credentials(RequestCredentials::SameOrigin);
    opts.set_headers(&headers);
    opts.set_body(&JsValue::from_str(&body));

    send(url, &opts).await
}

/// GET with the AJAX marker header.
pub async fn get(url: &str) -> UiResult<HttpResponse> {
    let headers = Headers::new()?;
    headers.set(REQUESTED_WITH.0, REQUESTED_WITH.1)?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_headers(&headers);

    send(url, &opts).await
}

async fn send(url: &str, opts: &RequestInit) -> UiResult<HttpResponse> {
    let request = Request::new_with_str_and_init(url, opts)?;
    let window = dom::window().ok_or_else(|| UiError::Dom("no window".into()))?;

    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| UiError::Network(describe_js(&e)))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| UiError::Network("response is not a Response".into()))?;

    let text = JsFuture::from(resp.text()?)
        .await
        .map_err(|e| UiError::Network(describe_js(&e)))?;

    Ok(HttpResponse {
        status: resp.status(),
        ok: resp.ok(),
        redirected: resp.redirected(),
        url: resp.url(),
        content_type: resp.headers().get("content-type").ok().flatten().unwrap_or_default(),
        body: text.as_string().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_require_ok() {
        let ok = HttpResponse { status: 200, ok: true, ..Default::default() };
        assert!(ok.require_ok().is_ok());
        let failed = HttpResponse { status: 502, ..Default::default() };
        assert_eq!(failed.require_ok().unwrap_err(), UiError::Status(502));
    }

    #[test]
    fn test_json_content_type_detection() {
        let resp = HttpResponse {
            content_type: "application/json; charset=utf-8".into(),
            body: r#"{"a": 1}"#.into(),
            ..Default::default()
        };
        assert!(resp.is_json());
        let value: Value = resp.json().unwrap();
        assert_eq!(value["a"], 1);
    }

    #[test]
    fn test_bad_json_is_malformed() {
        let resp = HttpResponse { body: "<html>".into(), ..Default::default() };
        assert!(matches!(resp.json::<Value>(), Err(UiError::Malformed(_))));
    }
}
