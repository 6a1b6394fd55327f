//! Reqwest-backed transport.
//!
//! This module provides [`HttpClient`], the default [`Transport`] used by
//! [`RestClient::new`](crate::RestClient::new).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::clients::errors::TransportError;
use crate::clients::http_response::HttpResponse;
use crate::clients::transport::{Transport, TransportRequest};
use crate::config::ClientConfig;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP transport backed by [`reqwest`].
///
/// The client adds default `User-Agent` and `Accept` headers unless the
/// request already carries them, applies the configured timeout, and honors
/// the request's cancellation signal.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust
/// use rest_api::{ClientConfig, HttpClient};
///
/// let config = ClientConfig::builder()
///     .user_agent_prefix("MyApp/1.0")
///     .build()
///     .unwrap();
///
/// let client = HttpClient::new(&config);
/// let user_agent = client.default_headers().get("user-agent").unwrap();
/// assert!(user_agent.to_str().unwrap().starts_with("MyApp/1.0 | "));
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Default headers added to requests that do not set them.
    default_headers: HeaderMap,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new transport from the client configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created. This should
    /// only happen if TLS initialization fails.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let mut builder = reqwest::Client::builder().use_rustls_tls();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().expect("Failed to create HTTP client");

        Self::from_client(client, config)
    }

    /// Creates a transport around an existing [`reqwest::Client`].
    ///
    /// The configured timeout is not applied; the given client's own
    /// settings are used as-is.
    #[must_use]
    pub fn from_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            default_headers: Self::build_default_headers(config),
        }
    }

    /// Returns the default headers for this transport.
    #[must_use]
    pub const fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    fn build_default_headers(config: &ClientConfig) -> HeaderMap {
        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}REST API Client v{SDK_VERSION} | Rust {rust_version}");

        let mut headers = HeaderMap::new();
        match HeaderValue::from_str(&user_agent) {
            Ok(value) => {
                headers.insert(USER_AGENT, value);
            }
            Err(_) => tracing::warn!("Ignoring invalid user agent prefix {:?}", user_agent_prefix),
        }
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    async fn execute(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError> {
        let mut headers = request.headers.clone();
        for (name, value) in &self.default_headers {
            if !headers.contains_key(name) {
                headers.insert(name.clone(), value.clone());
            }
        }

        let mut builder = self
            .client
            .request(request.method.as_method(), request.url.clone())
            .headers(headers);

        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let res = builder.send().await.map_err(map_reqwest_error)?;

        let status = res.status();
        let headers = res.headers().clone();
        let url = res.url().clone();
        let reason = reason_phrase(&res);
        let body = res.bytes().await.map_err(map_reqwest_error)?;

        let response = HttpResponse::new(status.as_u16(), headers, url, body);
        Ok(match reason {
            Some(reason) => response.with_status_text(reason),
            None => response,
        })
    }
}

/// Returns the reason phrase sent by the server when it differs from the
/// canonical one. Hyper only records non-canonical phrases.
fn reason_phrase(res: &reqwest::Response) -> Option<String> {
    res.extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .map(|reason| String::from_utf8_lossy(reason.as_bytes()).into_owned())
}

#[async_trait]
impl Transport for HttpClient {
    async fn send(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!("Sending {} request to {}", request.method, request.url);

        let response = match &request.signal {
            Some(signal) => {
                tokio::select! {
                    () = signal.cancelled() => Err(TransportError::Cancelled),
                    result = self.execute(request) => result,
                }
            }
            None => self.execute(request).await,
        }?;

        tracing::debug!(
            "Received {} response from {}",
            response.status(),
            response.url()
        );

        Ok(response)
    }
}

/// Maps a reqwest error to a [`TransportError`].
fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(Box::new(err))
    }
}
