//! # REST API Client
//!
//! An extensible base for building typed clients around JSON-oriented REST
//! services.
//!
//! ## Overview
//!
//! This crate provides:
//! - Path resolution against an optional, immutable base URL
//! - Query parameter normalization into an ordered multi-map
//! - JSON serialization of structured request bodies
//! - Response interpretation by status and content type
//! - A uniform [`ClientError`] for non-2xx responses, carrying the response
//!   URL, status, status text and parsed body
//! - Lifecycle [`Hooks`] for customizing requests, responses and errors
//! - A pluggable [`Transport`], with a reqwest-backed [`HttpClient`] included
//!
//! ## Quick Start
//!
//! ```rust
//! use rest_api::{BaseUrl, ClientConfig, RestClient};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let client = RestClient::new(&config);
//! assert_eq!(client.base_url().unwrap().as_str(), "https://api.example.com/v1/");
//! ```
//!
//! ## Making Requests
//!
//! ```rust,ignore
//! use serde_json::json;
//!
//! // GET https://api.example.com/v1/users?active=true
//! let users = client.get("/users", [("active", "true")], None).await?;
//!
//! // POST {"id":1} with Content-Type: application/json
//! let order = client.post("orders", json!({"id": 1}), None).await?;
//! ```
//!
//! ## Handling Errors
//!
//! ```rust,ignore
//! use rest_api::RestError;
//!
//! match client.post("orders", json!({"id": 1}), None).await {
//!     Ok(payload) => println!("Created: {payload:?}"),
//!     Err(RestError::Response(error)) => {
//!         // "500: Internal Server Error"
//!         println!("{error}");
//!         println!("Body: {:?}", error.extensions.response.body);
//!     }
//!     Err(other) => println!("Request failed: {other}"),
//! }
//! ```
//!
//! ## Customizing the Pipeline
//!
//! ```rust,ignore
//! use async_trait::async_trait;
//! use rest_api::{Hooks, RequestDescriptor, RestClient, RestError};
//!
//! struct ApiKeyAuth(String);
//!
//! #[async_trait]
//! impl Hooks for ApiKeyAuth {
//!     async fn before_send(&self, request: &mut RequestDescriptor) -> Result<(), RestError> {
//!         request.set_header("X-Api-Key", &self.0)
//!     }
//! }
//!
//! let client = RestClient::new(&config).with_hooks(ApiKeyAuth("secret".to_string()));
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: The base URL is validated on construction
//! - **Thread-safe**: The client is `Send + Sync` and shares no mutable state
//! - **Async-first**: Designed for use with Tokio async runtime
//! - **No hidden retries**: Each call makes exactly one transport attempt

pub mod clients;
pub mod config;
pub mod error;

// Re-export public types at crate root for convenience
pub use config::{BaseUrl, ClientConfig, ClientConfigBuilder};
pub use error::ConfigError;

pub use clients::{
    parse_body, resolve_url, Body, ClientError, DefaultHooks, ErrorCategory, Hooks, HttpClient,
    HttpMethod, HttpResponse, Payload, QueryParams, RequestDescriptor, RequestInit, RestClient,
    RestError, Transport, TransportError, TransportRequest,
};
