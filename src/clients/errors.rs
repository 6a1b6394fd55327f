//! Error types for the request pipeline.
//!
//! # Error Handling
//!
//! The client uses specific error types for different failure scenarios:
//!
//! - [`ClientError`]: A non-2xx response, carrying the response metadata and parsed body
//! - [`TransportError`]: The transport could not produce a response at all
//! - [`RestError`]: Unified error type returned by every client operation
//!
//! # Example
//!
//! ```rust,ignore
//! use rest_api::{RestClient, RestError};
//!
//! match client.get("users", (), None).await {
//!     Ok(payload) => println!("Users: {payload:?}"),
//!     Err(RestError::Response(e)) => {
//!         println!("API error {}: {:?}", e.status(), e.body());
//!     }
//!     Err(RestError::Transport(e)) => {
//!         println!("Network error: {e}");
//!     }
//!     Err(other) => println!("Request failed: {other}"),
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::clients::http_response::{parse_body, HttpResponse, Payload};

/// Classification of a non-success response.
///
/// Authentication and authorization failures share the same error shape as
/// every other status; the category only lets custom hooks branch on them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 401 Unauthorized.
    Authentication,
    /// 403 Forbidden.
    Authorization,
    /// Any other non-2xx status.
    Other,
}

impl ErrorCategory {
    /// Returns the category for a status code.
    #[must_use]
    pub const fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Authentication,
            403 => Self::Authorization,
            _ => Self::Other,
        }
    }
}

/// Metadata of the response a [`ClientError`] was built from.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    /// The final URL of the response.
    pub url: String,
    /// The HTTP status code.
    pub status: u16,
    /// The HTTP status text (reason phrase).
    pub status_text: String,
    /// The parsed response body.
    pub body: Payload,
}

/// Extension data attached to a [`ClientError`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorExtensions {
    /// The response the error was built from.
    pub response: ResponseMetadata,
}

/// Error built from a non-2xx response.
///
/// The message is always `"<status>: <statusText>"`.
///
/// # Example
///
/// ```rust
/// use rest_api::{ClientError, ErrorCategory, Payload};
///
/// let error = ClientError::new("https://api.example.com/me", 401, "Unauthorized", Payload::empty());
/// assert_eq!(error.to_string(), "401: Unauthorized");
/// assert_eq!(error.category(), ErrorCategory::Authentication);
/// ```
#[derive(Clone, Debug, PartialEq, Error, Serialize)]
#[error("{message}")]
pub struct ClientError {
    /// The error message, `"<status>: <statusText>"`.
    pub message: String,
    /// The response metadata.
    pub extensions: ErrorExtensions,
}

impl ClientError {
    /// Creates an error from response metadata and an already parsed body.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
        body: Payload,
    ) -> Self {
        let status_text = status_text.into();
        Self {
            message: format!("{status}: {status_text}"),
            extensions: ErrorExtensions {
                response: ResponseMetadata {
                    url: url.into(),
                    status,
                    status_text,
                    body,
                },
            },
        }
    }

    /// Builds an error from a non-2xx response, parsing its body.
    ///
    /// # Errors
    ///
    /// Returns [`RestError::MalformedBody`] if the body is declared as JSON
    /// but cannot be parsed.
    pub async fn from_response(response: HttpResponse) -> Result<Self, RestError> {
        let url = response.url().to_string();
        let status = response.status();
        let status_text = response.status_text().to_string();

        tracing::debug!("Received error response {} {} from {}", status, status_text, url);

        let body = parse_body(response)?;
        Ok(Self::new(url, status, status_text, body))
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.extensions.response.status
    }

    /// Returns the HTTP status text.
    #[must_use]
    pub fn status_text(&self) -> &str {
        &self.extensions.response.status_text
    }

    /// Returns the response URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.extensions.response.url
    }

    /// Returns the parsed response body.
    #[must_use]
    pub const fn body(&self) -> &Payload {
        &self.extensions.response.body
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        ErrorCategory::from_status(self.status())
    }
}

/// Error returned when the transport could not obtain a response.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The connection could not be established.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The request was cancelled through its signal.
    #[error("Request was cancelled")]
    Cancelled,

    /// Any other transport failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Unified error type for all client operations.
///
/// Errors raised by hooks are returned exactly as the hook produced them.
#[derive(Debug, Error)]
pub enum RestError {
    /// The request path could not be resolved into a URL.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        /// The path that failed to resolve.
        url: String,
        /// The underlying parse error.
        source: url::ParseError,
    },

    /// The transport failed before a response was obtained.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A non-2xx response was received.
    #[error(transparent)]
    Response(Box<ClientError>),

    /// A body declared as JSON could not be parsed.
    #[error("Malformed {content_type} body: {source}")]
    MalformedBody {
        /// The declared content type.
        content_type: String,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// A request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {source}")]
    Serialization {
        /// The underlying serialization error.
        source: serde_json::Error,
    },

    /// A payload could not be converted into the requested type.
    #[error("Failed to deserialize response payload: {source}")]
    Deserialization {
        /// The underlying deserialization error.
        source: serde_json::Error,
    },

    /// A header name or value is not valid HTTP.
    #[error("Invalid header '{name}'")]
    InvalidHeader {
        /// The offending header name.
        name: String,
    },

    /// An error raised by a custom hook.
    #[error(transparent)]
    Hook(Box<dyn std::error::Error + Send + Sync>),
}

impl RestError {
    /// Returns the response error, if this is one.
    #[must_use]
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Response(error) => Some(error.as_ref()),
            _ => None,
        }
    }

    /// Returns the HTTP status of a response error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.client_error().map(ClientError::status)
    }
}

impl From<ClientError> for RestError {
    fn from(error: ClientError) -> Self {
        Self::Response(Box::new(error))
    }
}
