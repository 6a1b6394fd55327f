//! Request descriptor types and request normalization.
//!
//! This module provides the [`RequestDescriptor`] built for every call, the
//! [`QueryParams`] multi-map and [`Body`] policy it carries, and
//! [`RequestInit`] for per-call extras such as headers.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, IntoHeaderName, CONTENT_TYPE};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::clients::errors::RestError;

/// HTTP methods supported by the REST client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns the method as a [`reqwest::Method`].
    #[must_use]
    pub const fn as_method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Patch => write!(f, "PATCH"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// An ordered multi-map of query parameters.
///
/// Whatever shape the caller supplies (a map, a list of pairs, a query string
/// or nothing at all) is normalized into this type. Keys may repeat and
/// insertion order is preserved.
///
/// # Example
///
/// ```rust
/// use rest_api::QueryParams;
///
/// let params: QueryParams = "tag=a&tag=b&limit=10".parse().unwrap();
/// assert_eq!(params.get_all("tag").collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(params.get("limit"), Some("10"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses a query string such as `a=1&b=2`.
    ///
    /// A leading `?` is ignored and names and values are form-url-decoded.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Appends a parameter, keeping any existing values for the same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.push((name.into(), value.into()));
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns every value for `name`, in insertion order.
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over all pairs in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.0.iter()
    }

    /// Returns the number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for QueryParams {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for QueryParams {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> From<&[(K, V)]> for QueryParams {
    fn from(pairs: &[(K, V)]) -> Self {
        pairs
            .iter()
            .map(|(k, v)| (k.as_ref(), v.as_ref()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<BTreeMap<K, V>> for QueryParams {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

/// Entries are sorted by name so that the resulting query string is stable.
impl<K: Into<String> + Ord, V: Into<String>> From<HashMap<K, V>> for QueryParams {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect::<BTreeMap<_, _>>().into()
    }
}

impl From<()> for QueryParams {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl<P: Into<Self>> From<Option<P>> for QueryParams {
    fn from(params: Option<P>) -> Self {
        params.map_or_else(Self::new, Into::into)
    }
}

impl From<&str> for QueryParams {
    fn from(query: &str) -> Self {
        Self::parse(query)
    }
}

impl From<String> for QueryParams {
    fn from(query: String) -> Self {
        Self::parse(&query)
    }
}

impl FromStr for QueryParams {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl<'a> IntoIterator for &'a QueryParams {
    type Item = &'a (String, String);
    type IntoIter = std::slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for QueryParams {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A request body, classified before serialization.
///
/// Only [`Body::Structured`] is serialized to JSON by the client; every other
/// variant is sent exactly as given, with no `Content-Type` inferred.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Body {
    /// No body.
    #[default]
    Absent,
    /// Text sent verbatim, e.g. an already serialized payload.
    Text(String),
    /// Raw bytes sent verbatim.
    Binary(Bytes),
    /// Structured data serialized as JSON at dispatch time.
    Structured(serde_json::Value),
}

impl Body {
    /// Converts any serializable value into a body.
    ///
    /// Values serializing to a JSON object or array become
    /// [`Body::Structured`]. Scalars become [`Body::Text`] and JSON `null`
    /// becomes [`Body::Absent`].
    ///
    /// # Errors
    ///
    /// Returns [`RestError::Serialization`] if `value` cannot be represented
    /// as JSON (for example a map with non-string keys).
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, RestError> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|source| RestError::Serialization { source })
    }

    /// Returns `true` if there is no body.
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Only objects and arrays are structured. Strings pass through as text, and
/// numbers and booleans as their literal text.
impl From<serde_json::Value> for Body {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Absent,
            serde_json::Value::String(text) => Self::Text(text),
            value @ (serde_json::Value::Bool(_) | serde_json::Value::Number(_)) => {
                Self::Text(value.to_string())
            }
            value @ (serde_json::Value::Object(_) | serde_json::Value::Array(_)) => {
                Self::Structured(value)
            }
        }
    }
}

impl From<String> for Body {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Body {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Self::Binary(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(bytes))
    }
}

impl<T: Into<Self>> From<Option<T>> for Body {
    fn from(body: Option<T>) -> Self {
        body.map_or(Self::Absent, Into::into)
    }
}

/// Serializes a body for dispatch.
///
/// Structured data becomes a JSON string and, only when no content type is
/// already present, sets `Content-Type: application/json`. Other bodies pass
/// through untouched.
pub fn serialize_body(body: Body, headers: &mut HeaderMap) -> Option<Bytes> {
    match body {
        Body::Absent => None,
        Body::Text(text) => Some(Bytes::from(text)),
        Body::Binary(bytes) => Some(bytes),
        Body::Structured(value) => {
            if !headers.contains_key(CONTENT_TYPE) {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            }
            Some(Bytes::from(value.to_string()))
        }
    }
}

/// Per-call extras merged into a [`RequestDescriptor`].
///
/// Fields explicitly set here replace the arguments given to the verb method.
///
/// # Example
///
/// ```rust
/// use rest_api::RequestInit;
/// use reqwest::header::{HeaderValue, ACCEPT};
///
/// let init = RequestInit::new()
///     .header(ACCEPT, HeaderValue::from_static("application/hal+json"))
///     .try_header("X-Request-Id", "abc-123")
///     .unwrap();
///
/// assert_eq!(init.headers.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestInit {
    /// Headers added to the request.
    pub headers: HeaderMap,
    /// Query parameters replacing the verb's `params` argument.
    pub params: Option<QueryParams>,
    /// Body replacing the verb's `body` argument.
    pub body: Option<Body>,
    /// Cancellation signal handed to the transport untouched.
    pub signal: Option<CancellationToken>,
}

impl RequestInit {
    /// Creates an empty init.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single header.
    #[must_use]
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Adds a single header from strings.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidHeader`] if the name or value is not a
    /// valid HTTP header.
    pub fn try_header(mut self, name: &str, value: &str) -> Result<Self, RestError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Sets all headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets query parameters, replacing any given to the verb method.
    #[must_use]
    pub fn params(mut self, params: impl Into<QueryParams>) -> Self {
        self.params = Some(params.into());
        self
    }

    /// Sets the body, replacing any given to the verb method.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the cancellation signal passed through to the transport.
    #[must_use]
    pub fn signal(mut self, signal: CancellationToken) -> Self {
        self.signal = Some(signal);
        self
    }
}

/// A single outgoing request before URL resolution and dispatch.
///
/// A descriptor is created fresh for every call. Only normalization and the
/// [`before_send`](crate::Hooks::before_send) hook may change it; it is then
/// consumed into a [`TransportRequest`](crate::TransportRequest).
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The path, relative to the base URL or absolute.
    pub path: String,
    /// Normalized query parameters appended to the resolved URL.
    pub params: QueryParams,
    /// Request headers (case-insensitive, possibly empty).
    pub headers: HeaderMap,
    /// The request body.
    pub body: Body,
    /// Cancellation signal handed to the transport untouched.
    pub signal: Option<CancellationToken>,
}

impl RequestDescriptor {
    /// Creates a descriptor with no params, headers or body.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            headers: HeaderMap::new(),
            body: Body::Absent,
            signal: None,
        }
    }

    /// Builds a descriptor from verb arguments and an optional init.
    ///
    /// The verb arguments are defaults: `params` and `body` set on `init`
    /// replace them. Headers and the signal always come from `init`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rest_api::{Body, HttpMethod, QueryParams, RequestDescriptor};
    ///
    /// let request = RequestDescriptor::build(
    ///     HttpMethod::Get,
    ///     "/users",
    ///     [("active", "true")],
    ///     Body::Absent,
    ///     None,
    /// );
    /// assert_eq!(request.params.get("active"), Some("true"));
    /// assert!(request.headers.is_empty());
    /// ```
    #[must_use]
    pub fn build(
        method: HttpMethod,
        path: impl Into<String>,
        params: impl Into<QueryParams>,
        body: impl Into<Body>,
        init: Option<RequestInit>,
    ) -> Self {
        let init = init.unwrap_or_default();
        Self {
            method,
            path: path.into(),
            params: init.params.unwrap_or_else(|| params.into()),
            headers: init.headers,
            body: init.body.unwrap_or_else(|| body.into()),
            signal: init.signal,
        }
    }

    /// Inserts a header, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::InvalidHeader`] if the name or value is not a
    /// valid HTTP header.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), RestError> {
        let (name, value) = parse_header(name, value)?;
        self.headers.insert(name, value);
        Ok(())
    }

    /// Returns a header value by case-insensitive name, if it is valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue), RestError> {
    let invalid = || RestError::InvalidHeader {
        name: name.to_string(),
    };
    let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
    let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
    Ok((header_name, header_value))
}
