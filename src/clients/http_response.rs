//! HTTP response types and body interpretation.
//!
//! This module provides the [`HttpResponse`] produced by a transport, the
//! [`Payload`] extracted from it, and [`parse_body`], which decides how a
//! body is read based on status and content type.

use bytes::Bytes;
use reqwest::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::clients::errors::RestError;

/// Content types whose bodies are parsed as JSON.
const JSON_CONTENT_TYPES: [&str; 2] = ["application/json", "application/hal+json"];

/// An HTTP response returned by a [`Transport`](crate::Transport).
///
/// The body can be read exactly once: [`text`](Self::text),
/// [`json`](Self::json) and [`bytes`](Self::bytes) consume the response.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    status: u16,
    status_text: String,
    headers: HeaderMap,
    url: Url,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a new response.
    ///
    /// The status text defaults to the canonical reason phrase of `status`
    /// and can be replaced with [`with_status_text`](Self::with_status_text).
    #[must_use]
    pub fn new(status: u16, headers: HeaderMap, url: Url, body: impl Into<Bytes>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            status,
            status_text,
            headers,
            url,
            body: body.into(),
        }
    }

    /// Replaces the status text.
    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the HTTP status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns the response headers.
    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value by case-insensitive name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the final URL of the response.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Reads the body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Reads the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json(self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Reads the raw body bytes.
    #[must_use]
    pub fn bytes(self) -> Bytes {
        self.body
    }
}

/// The logical payload of a response.
///
/// Serializes as the JSON value or plain string it holds.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// A body read as text.
    Text(String),
    /// A body parsed as JSON.
    Json(serde_json::Value),
}

impl Payload {
    /// Returns an empty text payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Returns `true` for an empty text payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(text) if text.is_empty())
    }

    /// Returns the JSON value, if the body was parsed as JSON.
    #[must_use]
    pub const fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text, if the body was read as text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Json(_) => None,
        }
    }

    /// Converts the payload into a JSON value; text becomes a JSON string.
    #[must_use]
    pub fn into_json(self) -> serde_json::Value {
        match self {
            Self::Json(value) => value,
            Self::Text(text) => serde_json::Value::String(text),
        }
    }

    /// Deserializes the payload into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Deserialization`] if the payload does not match `T`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rest_api::Payload;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct User {
    ///     id: u64,
    /// }
    ///
    /// let payload = Payload::Json(serde_json::json!({"id": 7}));
    /// let user: User = payload.deserialize().unwrap();
    /// assert_eq!(user.id, 7);
    /// ```
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, RestError> {
        serde_json::from_value(self.into_json())
            .map_err(|source| RestError::Deserialization { source })
    }
}

/// Returns `true` if the content type denotes a JSON body.
#[must_use]
pub fn is_json_content_type(content_type: &str) -> bool {
    JSON_CONTENT_TYPES
        .iter()
        .any(|json| content_type.starts_with(json))
}

/// Extracts the logical payload of a response.
///
/// The decision is made in order:
///
/// 1. Status 204, a `Content-Length` of exactly `"0"`, or no `Content-Type`:
///    the body is read as text (usually empty).
/// 2. A `Content-Type` starting with `application/json` or
///    `application/hal+json`: the body is parsed as JSON.
/// 3. Anything else: the body is read as text.
///
/// The same rule applies to success and error responses.
///
/// # Errors
///
/// Returns [`RestError::MalformedBody`] if a JSON body cannot be parsed.
pub fn parse_body(response: HttpResponse) -> Result<Payload, RestError> {
    let content_type = response
        .headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let empty_length = response
        .headers
        .get(CONTENT_LENGTH)
        .is_some_and(|v| v.as_bytes() == b"0");

    let content_type = match content_type {
        Some(content_type) if response.status != 204 && !empty_length => content_type,
        _ => return Ok(Payload::Text(response.text())),
    };

    if !is_json_content_type(&content_type) {
        return Ok(Payload::Text(response.text()));
    }

    let url = response.url.clone();
    response.json().map(Payload::Json).map_err(|source| {
        tracing::warn!("Malformed {} body received from {}: {}", content_type, url, source);
        RestError::MalformedBody {
            content_type,
            source,
        }
    })
}
