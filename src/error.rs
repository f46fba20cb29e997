//! UI Errors
//!
//! Failures raised by network-backed controllers. They are logged with full
//! detail and mapped to fixed toast messages by the caller.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Common result type for controller operations
pub type UiResult<T> = Result<T, UiError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UiError {
    /// `fetch` rejected before any response arrived
    #[error("network request failed: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("server responded with status {0}")]
    Status(u16),

    /// The server redirected the request, meaning the user must log in
    #[error("authentication required (redirected to {location})")]
    AuthRequired { location: String },

    #[error("unexpected content type: {0:?}")]
    UnexpectedContent(String),

    /// JSON parse failure or missing fields
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Well-formed response reporting `success: false`
    #[error("server rejected the request")]
    Rejected,

    /// A DOM or JS call threw
    #[error("DOM operation failed: {0}")]
    Dom(String),
}

impl UiError {
    /// Redirect failures are silent: the browser is already navigating away.
    pub fn redirect_location(&self) -> Option<&str> {
        match self {
            UiError::AuthRequired { location } => Some(location),
            _ => None,
        }
    }
}

impl From<JsValue> for UiError {
    fn from(value: JsValue) -> Self {
        UiError::Dom(describe_js(&value))
    }
}

impl From<serde_json::Error> for UiError {
    fn from(err: serde_json::Error) -> Self {
        UiError::Malformed(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for UiError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        UiError::Malformed(err.to_string())
    }
}

/// Best-effort text for a thrown JS value
pub fn describe_js(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
