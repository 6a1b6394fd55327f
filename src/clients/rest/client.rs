//! REST client implementation.
//!
//! This module provides the [`RestClient`] type, which runs every call through
//! the request pipeline: normalization, hooks, URL resolution, dispatch and
//! response interpretation.

use crate::clients::errors::RestError;
use crate::clients::hooks::{DefaultHooks, Hooks};
use crate::clients::http_client::HttpClient;
use crate::clients::http_request::{Body, HttpMethod, QueryParams, RequestDescriptor, RequestInit};
use crate::clients::http_response::Payload;
use crate::clients::transport::{Transport, TransportRequest};
use crate::clients::url_resolver::append_params;
use crate::config::{BaseUrl, ClientConfig};

/// REST client for JSON-oriented APIs.
///
/// Provides `get`, `post`, `put`, `patch` and `delete` methods that resolve
/// the path against the configured base URL, send the request through the
/// transport and return the parsed [`Payload`].
///
/// `GET` and `DELETE` take query parameters as their second argument;
/// `POST`, `PUT` and `PATCH` take a body.
///
/// # Thread Safety
///
/// `RestClient` is `Send + Sync` whenever its transport and hooks are.
/// Concurrent calls share nothing but the immutable base URL.
///
/// # Example
///
/// ```rust,ignore
/// use rest_api::{BaseUrl, ClientConfig, RestClient};
/// use serde_json::json;
///
/// let config = ClientConfig::builder()
///     .base_url(BaseUrl::new("https://api.example.com/v1")?)
///     .build()?;
///
/// let client = RestClient::new(&config);
///
/// // GET https://api.example.com/v1/users?active=true
/// let users = client.get("/users", [("active", "true")], None).await?;
///
/// // POST with a JSON body
/// let order = client.post("orders", json!({"id": 1}), None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RestClient<T = HttpClient, H = DefaultHooks> {
    /// The transport performing network calls.
    transport: T,
    /// The lifecycle hooks.
    hooks: H,
    /// Base URL that relative paths resolve against.
    base_url: Option<BaseUrl>,
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};

impl RestClient {
    /// Creates a client using the bundled [`HttpClient`] transport.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(HttpClient::new(config), config)
    }
}

impl<T: Transport> RestClient<T> {
    /// Creates a client using a custom transport.
    #[must_use]
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            transport,
            hooks: DefaultHooks,
            base_url: config.base_url().cloned(),
        }
    }
}

impl<T: Transport, H: Hooks> RestClient<T, H> {
    /// Replaces the lifecycle hooks.
    #[must_use]
    pub fn with_hooks<H2: Hooks>(self, hooks: H2) -> RestClient<T, H2> {
        RestClient {
            transport: self.transport,
            hooks,
            base_url: self.base_url,
        }
    }

    /// Returns a client with a different base URL.
    ///
    /// The base URL of an existing client never changes.
    #[must_use]
    pub fn with_base_url(self, base_url: Option<BaseUrl>) -> Self {
        Self { base_url, ..self }
    }

    /// Returns the base URL, if configured.
    #[must_use]
    pub const fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    /// Returns the lifecycle hooks.
    #[must_use]
    pub const fn hooks(&self) -> &H {
        &self.hooks
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends a GET request to the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The request path, relative to the base URL or absolute
    /// * `params` - Query parameters (a map, pairs, a query string or `()`)
    /// * `init` - Optional per-call headers, overrides and signal
    ///
    /// # Errors
    ///
    /// Returns [`RestError`] if the URL cannot be resolved, the transport
    /// fails, the response is not 2xx, or the body cannot be parsed.
    pub async fn get(
        &self,
        path: &str,
        params: impl Into<QueryParams>,
        init: Option<RequestInit>,
    ) -> Result<Payload, RestError> {
        let request = RequestDescriptor::build(HttpMethod::Get, path, params, Body::Absent, init);
        self.fetch(request).await
    }

    /// Sends a POST request with the given body.
    ///
    /// Structured bodies are serialized as JSON.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn post(
        &self,
        path: &str,
        body: impl Into<Body>,
        init: Option<RequestInit>,
    ) -> Result<Payload, RestError> {
        let request = RequestDescriptor::build(HttpMethod::Post, path, (), body, init);
        self.fetch(request).await
    }

    /// Sends a PUT request with the given body.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn put(
        &self,
        path: &str,
        body: impl Into<Body>,
        init: Option<RequestInit>,
    ) -> Result<Payload, RestError> {
        let request = RequestDescriptor::build(HttpMethod::Put, path, (), body, init);
        self.fetch(request).await
    }

    /// Sends a PATCH request with the given body.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn patch(
        &self,
        path: &str,
        body: impl Into<Body>,
        init: Option<RequestInit>,
    ) -> Result<Payload, RestError> {
        let request = RequestDescriptor::build(HttpMethod::Patch, path, (), body, init);
        self.fetch(request).await
    }

    /// Sends a DELETE request to the specified path.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get).
    pub async fn delete(
        &self,
        path: &str,
        params: impl Into<QueryParams>,
        init: Option<RequestInit>,
    ) -> Result<Payload, RestError> {
        let request =
            RequestDescriptor::build(HttpMethod::Delete, path, params, Body::Absent, init);
        self.fetch(request).await
    }

    /// Runs a descriptor through the full pipeline.
    ///
    /// Exactly one transport attempt is made. Query parameters are appended
    /// to any query already present in the path.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get). Errors raised by hooks are returned unchanged.
    pub async fn fetch(&self, mut request: RequestDescriptor) -> Result<Payload, RestError> {
        self.hooks.before_send(&mut request).await?;

        let mut url = self.hooks.resolve_url(&request, self.base_url.as_ref())?;
        append_params(&mut url, &request.params);

        let request = TransportRequest::from_descriptor(request, url);
        tracing::debug!("Dispatching {} {}", request.method, request.url);

        match self.transport.send(&request).await {
            Ok(response) => self.hooks.on_response(response, &request).await,
            Err(error) => {
                tracing::debug!(
                    "Transport failed for {} {}: {}",
                    request.method,
                    request.url,
                    error
                );
                self.hooks.on_error(error, &request).await
            }
        }
    }
}
