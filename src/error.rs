//! Error types for client configuration.
//!
//! This module contains the error type returned while building a
//! [`ClientConfig`](crate::ClientConfig) or validating a [`BaseUrl`](crate::BaseUrl).
//!
//! # Error Handling
//!
//! All configuration constructors return `Result<T, ConfigError>` to enable
//! fail-fast validation. Request-time failures use
//! [`RestError`](crate::RestError) instead.
//!
//! # Example
//!
//! ```rust
//! use rest_api::{BaseUrl, ConfigError};
//!
//! let result = BaseUrl::new("not a url");
//! assert!(matches!(result, Err(ConfigError::InvalidBaseUrl { .. })));
//! ```

use thiserror::Error;

/// Errors that can occur during client configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The base URL is not an absolute URL that paths can be resolved against.
    #[error("Invalid base URL '{url}': {reason}. Please provide an absolute URL with scheme (e.g., 'https://api.example.com/v1').")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
        /// Why the URL was rejected.
        reason: String,
    },

    /// The transport timeout is zero.
    #[error("Timeout must be greater than zero.")]
    InvalidTimeout,
}
