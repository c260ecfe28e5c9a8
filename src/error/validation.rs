//! Client-side validation failures.
//!
//! Raised before any request is sent, so the form that produced them can
//! stay open and show the message.

use thiserror::Error;

/// A user-facing input problem.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required form field was empty.
    #[error("{field} is required")]
    MissingField { field: &'static str },

    /// A field had a value outside its allowed range.
    #[error("{field} is out of range: {message}")]
    OutOfRange {
        field: &'static str,
        message: String,
    },

    /// The current user may not perform this action.
    #[error("Not allowed: {action}")]
    NotPermitted { action: &'static str },

    /// The action referred to a record that is not in the collection.
    #[error("No {resource} with id {id}")]
    UnknownRecord { resource: &'static str, id: u64 },
}

impl ValidationError {
    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ValidationError::MissingField { field } => format!("Please fill in the {} field.", field),
            ValidationError::OutOfRange { field, message } => {
                format!("The {} value is not valid: {}.", field, message)
            }
            ValidationError::NotPermitted { action } => {
                format!("You don't have permission to {}.", action)
            }
            ValidationError::UnknownRecord { resource, .. } => {
                format!("That {} no longer exists. Refresh and try again.", resource)
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "E_VAL_MISSING",
            ValidationError::OutOfRange { .. } => "E_VAL_RANGE",
            ValidationError::NotPermitted { .. } => "E_VAL_PERM",
            ValidationError::UnknownRecord { .. } => "E_VAL_UNKNOWN",
        }
    }

    /// Fail with [`ValidationError::MissingField`] if `value` is blank.
    pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::MissingField { field })
        } else {
            Ok(())
        }
    }
}
