//! Request and response shapes exchanged with the HTTP trigger.

use std::collections::BTreeMap;

use base64::Engine;
use error::AppError;
use serde::{Deserialize, Serialize};

/// Content type of every non-empty response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Normalized HTTP request delivered by the trigger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// HTTP method, e.g. `GET`
    pub http_method: String,
    /// Request path, e.g. `/token`
    pub path: String,
    /// Request headers; triggers send `null` when there are none
    #[serde(default)]
    pub headers: Option<BTreeMap<String, String>>,
    /// Raw request body
    #[serde(default)]
    pub body: Option<String>,
    /// Whether `body` is base64-encoded
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl Request {
    /// Create a request without headers or body.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            http_method: method.into(),
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set the body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Look up a header value. Header names are case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .as_ref()?
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body text, empty when absent. Base64 bodies are decoded first.
    pub fn body_text(&self) -> Result<String, AppError> {
        let body = self.body.as_deref().unwrap_or_default();
        if !self.is_base64_encoded {
            return Ok(body.to_string());
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(body)
            .map_err(|e| AppError::InvalidJson(format!("body is not valid base64: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::InvalidJson(format!("body is not valid UTF-8: {e}")))
    }
}

/// Response handed back to the trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl Response {
    /// Response with an empty body.
    pub fn empty(status_code: u16) -> Self {
        Self {
            status_code,
            headers: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// Response whose body is `value` encoded as JSON plus a trailing newline.
    pub fn json<T: Serialize + ?Sized>(status_code: u16, value: &T) -> Result<Self, AppError> {
        let mut body = serde_json::to_string(value)
            .map_err(|e| AppError::Internal(format!("failed to encode response body: {e}")))?;
        body.push('\n');

        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());

        Ok(Self {
            status_code,
            headers,
            body,
        })
    }

    /// Empty response carrying the status code of `err`.
    pub fn from_error(err: &AppError) -> Self {
        Self::empty(err.status_code())
    }
}
