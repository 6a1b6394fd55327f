//! Client types for REST API communication.
//!
//! This module provides the request pipeline: request descriptors and their
//! normalization, URL resolution, the transport abstraction, lifecycle hooks,
//! response interpretation and error construction.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`RestClient`]: Verb methods and the request pipeline
//! - [`RequestDescriptor`]: A single outgoing request before dispatch
//! - [`RequestInit`]: Per-call headers, overrides and cancellation signal
//! - [`QueryParams`]: Ordered multi-map of query parameters
//! - [`Body`]: Request body classified as text, binary or structured data
//! - [`Transport`]: The injected capability performing network calls
//! - [`HttpClient`]: The bundled reqwest transport
//! - [`Hooks`]: Override points of the pipeline
//! - [`HttpResponse`] and [`Payload`]: A response and its parsed body
//! - [`ClientError`] and [`RestError`]: Error types
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_api::clients::{RestClient, RequestInit};
//! use rest_api::{BaseUrl, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1")?)
//!     .build()?;
//!
//! let client = RestClient::new(&config);
//!
//! let init = RequestInit::new().try_header("X-Request-Id", "abc-123")?;
//! let payload = client.get("users", [("active", "true")], Some(init)).await?;
//! ```
//!
//! # Retry Behavior
//!
//! There is none. Each call makes exactly one transport attempt, and every
//! failure is returned to the caller.

mod errors;
mod hooks;
mod http_client;
mod http_request;
mod http_response;
pub mod rest;
mod transport;
mod url_resolver;

pub use errors::{
    ClientError, ErrorCategory, ErrorExtensions, ResponseMetadata, RestError, TransportError,
};
pub use hooks::{DefaultHooks, Hooks};
pub use http_client::{HttpClient, SDK_VERSION};
pub use http_request::{
    serialize_body, Body, HttpMethod, QueryParams, RequestDescriptor, RequestInit,
};
pub use http_response::{is_json_content_type, parse_body, HttpResponse, Payload};
pub use transport::{Transport, TransportRequest};
pub use url_resolver::{append_params, normalize_base, resolve_url};

pub use rest::RestClient;
