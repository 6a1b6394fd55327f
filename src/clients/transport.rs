//! The transport abstraction that performs the actual network call.
//!
//! The request pipeline never talks to the network itself. It hands a fully
//! prepared [`TransportRequest`] to an injected [`Transport`] and interprets
//! whatever [`HttpResponse`] comes back.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::clients::errors::TransportError;
use crate::clients::http_request::{serialize_body, HttpMethod, RequestDescriptor};
use crate::clients::http_response::HttpResponse;

/// A fully resolved request, ready for the transport.
#[derive(Clone, Debug)]
pub struct TransportRequest {
    /// The HTTP method.
    pub method: HttpMethod,
    /// The absolute URL, including appended query parameters.
    pub url: Url,
    /// Request headers.
    pub headers: HeaderMap,
    /// The serialized body, if any.
    pub body: Option<Bytes>,
    /// Cancellation signal passed through from the caller untouched.
    pub signal: Option<CancellationToken>,
}

impl TransportRequest {
    /// Consumes a descriptor, serializing its body for dispatch to `url`.
    #[must_use]
    pub fn from_descriptor(descriptor: RequestDescriptor, url: Url) -> Self {
        let RequestDescriptor {
            method,
            mut headers,
            body,
            signal,
            ..
        } = descriptor;
        let body = serialize_body(body, &mut headers);

        Self {
            method,
            url,
            headers,
            body,
            signal,
        }
    }
}

/// Trait for pluggable transports.
///
/// Exactly one call to [`send`](Self::send) is made per logical request.
/// Timeouts and cancellation are the transport's responsibility.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use rest_api::{HttpResponse, Transport, TransportError, TransportRequest};
///
/// struct Offline;
///
/// #[async_trait]
/// impl Transport for Offline {
///     async fn send(&self, _request: &TransportRequest) -> Result<HttpResponse, TransportError> {
///         Err(TransportError::Connection("offline".to_string()))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a request and returns the response.
    ///
    /// Any HTTP status counts as a response; only failures to obtain one are
    /// errors.
    async fn send(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: &TransportRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
