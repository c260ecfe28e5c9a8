//! Unified error type for liftlog.

use thiserror::Error;

use super::category::ErrorCategory;
use super::context::ErrorContext;
use super::network::NetworkError;
use super::validation::ValidationError;

/// Unified error type for the data layer.
///
/// `Clone` so one failure can be recorded in a store's error slot and also
/// handed back to the caller of a mutation.
#[derive(Debug, Clone, Error)]
pub enum LiftlogError {
    /// No session: the backend answered 401, or `/api/me` had no user.
    #[error("Not signed in")]
    Unauthenticated,

    /// The request failed before any response arrived.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// The backend answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Input rejected on the client; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The body did not match the endpoint's schema.
    #[error("Invalid response from {endpoint}: {message}")]
    InvalidResponse { endpoint: String, message: String },

    /// The resource does not offer this operation.
    #[error("{resource} does not support {operation}")]
    Unsupported {
        resource: &'static str,
        operation: &'static str,
    },

    /// Wrapped error with additional context.
    #[error("{error} {context}")]
    WithContext {
        error: Box<LiftlogError>,
        context: ErrorContext,
    },
}

impl LiftlogError {
    /// Build a server error, preferring a `message` field from a JSON body.
    pub fn server(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    "Unknown error".to_string()
                } else {
                    body.chars().take(200).collect()
                }
            });
        LiftlogError::Server { status, message }
    }

    /// Get the category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LiftlogError::Unauthenticated => ErrorCategory::Auth,
            LiftlogError::Network(_) => ErrorCategory::Network,
            LiftlogError::Server { status: 403, .. } => ErrorCategory::Auth,
            LiftlogError::Server { .. } => ErrorCategory::Server,
            LiftlogError::Validation(_) => ErrorCategory::User,
            LiftlogError::InvalidResponse { .. } | LiftlogError::Unsupported { .. } => {
                ErrorCategory::Client
            }
            LiftlogError::WithContext { error, .. } => error.category(),
        }
    }

    /// Check if this error is worth a manual retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            LiftlogError::Network(err) => err.is_retryable(),
            LiftlogError::Server { status, .. } => *status >= 500 || *status == 429,
            LiftlogError::WithContext { error, .. } => error.is_retryable(),
            _ => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            LiftlogError::Unauthenticated => "Please sign in to continue.".to_string(),
            LiftlogError::Network(err) => err.user_message(),
            LiftlogError::Server { status, message } => match *status {
                400 | 409 | 422 => message.clone(),
                403 => "You don't have permission for this action.".to_string(),
                404 => "The requested record was not found.".to_string(),
                500..=599 => "The server is experiencing issues. Please try again later.".to_string(),
                _ => format!("The server returned an error (HTTP {}).", status),
            },
            LiftlogError::Validation(err) => err.user_message(),
            LiftlogError::InvalidResponse { .. } => {
                "Received an unexpected response from the server.".to_string()
            }
            LiftlogError::Unsupported { .. } => "This action is not available.".to_string(),
            LiftlogError::WithContext { error, .. } => error.user_message(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LiftlogError::Unauthenticated => "E_AUTH_NONE",
            LiftlogError::Network(err) => err.error_code(),
            LiftlogError::Server { .. } => "E_SERVER",
            LiftlogError::Validation(err) => err.error_code(),
            LiftlogError::InvalidResponse { .. } => "E_INVALID_RESPONSE",
            LiftlogError::Unsupported { .. } => "E_UNSUPPORTED",
            LiftlogError::WithContext { error, .. } => error.error_code(),
        }
    }

    /// Attach context to this error.
    pub fn with_context(self, ctx: ErrorContext) -> Self {
        LiftlogError::WithContext {
            error: Box::new(self),
            context: ctx,
        }
    }

    /// Get the context if this error has one attached.
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            LiftlogError::WithContext { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Get the inner error without context.
    pub fn inner(&self) -> &LiftlogError {
        match self {
            LiftlogError::WithContext { error, .. } => error.inner(),
            _ => self,
        }
    }

    /// Check if this error means there is no usable session.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self.inner(), LiftlogError::Unauthenticated)
    }

    /// Get the recovery hint for this error.
    pub fn recovery_hint(&self) -> &'static str {
        self.category().recovery_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_prefers_message_field() {
        let err = LiftlogError::server(400, r#"{"message":"Email already registered"}"#);
        assert!(matches!(
            err,
            LiftlogError::Server { status: 400, ref message } if message == "Email already registered"
        ));
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_server_falls_back_to_body() {
        let err = LiftlogError::server(500, "boom");
        assert_eq!(err.to_string(), "Server error (500): boom");
        let err = LiftlogError::server(502, "");
        assert_eq!(err.to_string(), "Server error (502): Unknown error");
    }

    #[test]
    fn test_categories() {
        assert_eq!(LiftlogError::Unauthenticated.category(), ErrorCategory::Auth);
        assert_eq!(
            LiftlogError::from(ValidationError::MissingField { field: "name" }).category(),
            ErrorCategory::User
        );
        assert_eq!(LiftlogError::server(503, "").category(), ErrorCategory::Server);
        assert!(LiftlogError::server(503, "").is_retryable());
        assert!(!LiftlogError::server(404, "").is_retryable());
    }

    #[test]
    fn test_context_is_transparent_for_classification() {
        let err = LiftlogError::Unauthenticated
            .with_context(ErrorContext::new("refresh").with_resource("workouts"));
        assert!(err.is_unauthenticated());
        assert_eq!(err.error_code(), "E_AUTH_NONE");
        assert_eq!(err.context().map(|c| c.operation.as_str()), Some("refresh"));
        assert_eq!(err.to_string(), "Not signed in [refresh workouts]");
    }
}
