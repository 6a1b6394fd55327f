//! High-level REST client.
//!
//! This module provides [`RestClient`], built on top of a pluggable
//! [`Transport`](crate::clients::Transport) and customizable through
//! [`Hooks`](crate::clients::Hooks).
//!
//! # Overview
//!
//! Every verb method builds a fresh [`RequestDescriptor`](crate::clients::RequestDescriptor)
//! and runs it through [`RestClient::fetch`]:
//!
//! 1. `before_send` may modify the descriptor
//! 2. the path is resolved against the base URL and params are appended
//! 3. structured bodies are serialized as JSON
//! 4. the transport is called exactly once
//! 5. 2xx responses yield their parsed body, anything else a
//!    [`ClientError`](crate::clients::ClientError)
//!
//! # Path Resolution
//!
//! - One leading slash is ignored: `/users` and `users` are the same path
//! - The base URL always behaves as if it ended with `/`
//! - Without a base URL, paths must be absolute URLs
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_api::{BaseUrl, ClientConfig, RestClient};
//!
//! let config = ClientConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1")?)
//!     .build()?;
//!
//! let client = RestClient::new(&config);
//! let user = client.get("users/42", (), None).await?;
//! ```

mod client;

pub use client::RestClient;
