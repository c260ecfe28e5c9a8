//! Network-related error types.
//!
//! These cover fetches that threw before any response arrived. A response
//! with a bad status is a server error, not a network error.

use thiserror::Error;

use crate::traits::HttpError;

/// Network-specific error variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NetworkError {
    /// Connection to the server failed.
    #[error("Connection to {url} failed: {message}")]
    ConnectionFailed { url: String, message: String },

    /// Request timed out at the transport.
    #[error("Request to {url} timed out: {message}")]
    Timeout { url: String, message: String },

    /// The request URL could not be built.
    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// Generic transport error.
    #[error("Network error calling {url}: {message}")]
    Other { url: String, message: String },
}

impl NetworkError {
    /// Classify a transport error for the given URL.
    pub fn from_http(url: &str, err: HttpError) -> Self {
        let url = url.to_string();
        match err {
            HttpError::ConnectionFailed(message) => NetworkError::ConnectionFailed { url, message },
            HttpError::Timeout(message) => NetworkError::Timeout { url, message },
            HttpError::InvalidUrl(message) => NetworkError::InvalidUrl { url, message },
            HttpError::Other(message) => NetworkError::Other { url, message },
        }
    }

    /// Check if this error is likely transient.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, NetworkError::InvalidUrl { .. })
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            NetworkError::ConnectionFailed { .. } => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            NetworkError::Timeout { .. } => {
                "The server took too long to respond. Please try again.".to_string()
            }
            NetworkError::InvalidUrl { url, .. } => {
                format!("The server address '{}' is not valid.", url)
            }
            NetworkError::Other { message, .. } => format!("Network error: {}", message),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed { .. } => "E_NET_CONN",
            NetworkError::Timeout { .. } => "E_NET_TIMEOUT",
            NetworkError::InvalidUrl { .. } => "E_NET_URL",
            NetworkError::Other { .. } => "E_NET_OTHER",
        }
    }
}
