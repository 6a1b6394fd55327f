//! Lifecycle hooks for customizing the request pipeline.
//!
//! A [`RestClient`](crate::RestClient) is parameterized over a [`Hooks`]
//! implementation. Every hook has a default, so an implementation only
//! overrides what it needs; [`DefaultHooks`] overrides nothing.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use rest_api::{Hooks, RequestDescriptor, RestError};
//!
//! struct BearerAuth {
//!     token: String,
//! }
//!
//! #[async_trait]
//! impl Hooks for BearerAuth {
//!     async fn before_send(&self, request: &mut RequestDescriptor) -> Result<(), RestError> {
//!         request.set_header("Authorization", &format!("Bearer {}", self.token))
//!     }
//! }
//! ```

use async_trait::async_trait;
use url::Url;

use crate::clients::errors::{ClientError, RestError, TransportError};
use crate::clients::http_request::RequestDescriptor;
use crate::clients::http_response::{parse_body, HttpResponse, Payload};
use crate::clients::transport::TransportRequest;
use crate::clients::url_resolver::resolve_url;
use crate::config::BaseUrl;

/// Override points of the request pipeline.
///
/// The hooks run in this order for each call:
///
/// 1. [`before_send`](Self::before_send) with the normalized descriptor
/// 2. [`resolve_url`](Self::resolve_url) to compute the target URL
/// 3. the transport call
/// 4. [`on_response`](Self::on_response) if a response was obtained, which by
///    default delegates to [`parse_body`](Self::parse_body) or
///    [`error_from_response`](Self::error_from_response), or
///    [`on_error`](Self::on_error) if the transport failed
///
/// Errors returned from any hook reach the caller unchanged.
#[async_trait]
pub trait Hooks: Send + Sync {
    /// Called once per request after normalization, before URL resolution.
    ///
    /// May change headers, params or body in place.
    async fn before_send(&self, _request: &mut RequestDescriptor) -> Result<(), RestError> {
        Ok(())
    }

    /// Resolves the request path against the base URL.
    ///
    /// Query parameters are appended afterwards by the client.
    fn resolve_url(
        &self,
        request: &RequestDescriptor,
        base_url: Option<&BaseUrl>,
    ) -> Result<Url, RestError> {
        resolve_url(&request.path, base_url)
    }

    /// Interprets a response obtained from the transport.
    ///
    /// By default a 2xx response yields its parsed body and anything else
    /// becomes the error built by [`error_from_response`](Self::error_from_response).
    async fn on_response(
        &self,
        response: HttpResponse,
        _request: &TransportRequest,
    ) -> Result<Payload, RestError> {
        if response.is_ok() {
            self.parse_body(response).await
        } else {
            Err(self.error_from_response(response).await)
        }
    }

    /// Extracts the payload of a response.
    async fn parse_body(&self, response: HttpResponse) -> Result<Payload, RestError> {
        parse_body(response)
    }

    /// Builds the error for a non-2xx response.
    ///
    /// Implementations can branch on
    /// [`ErrorCategory`](crate::ErrorCategory) to return their own error
    /// types for authentication or authorization failures.
    async fn error_from_response(&self, response: HttpResponse) -> RestError {
        match ClientError::from_response(response).await {
            Ok(error) => error.into(),
            Err(malformed) => malformed,
        }
    }

    /// Called when the transport failed to produce a response.
    ///
    /// The default returns the error unchanged.
    async fn on_error(
        &self,
        error: TransportError,
        _request: &TransportRequest,
    ) -> Result<Payload, RestError> {
        Err(error.into())
    }
}

/// Hooks with every default behavior.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultHooks;

impl Hooks for DefaultHooks {}
