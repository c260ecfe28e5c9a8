//! Error context for enriched error information.
//!
//! Stores attach a context naming the operation and resource before they
//! record an error in their slot, so a page-level error view can say what
//! failed without knowing which store it came from.

use chrono::{DateTime, Utc};

/// Context information attached to errors.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorContext {
    /// Operation that failed, e.g. "refresh" or "delete".
    pub operation: String,

    /// Resource the operation targeted, e.g. "workouts".
    pub resource: Option<String>,

    /// Record id, for operations scoped to one record.
    pub record_id: Option<u64>,

    /// Timestamp when the error occurred.
    pub timestamp: DateTime<Utc>,
}

impl ErrorContext {
    /// Create a new ErrorContext for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            resource: None,
            record_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Set the resource for this context.
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Set the record id for this context.
    pub fn with_record_id(mut self, id: u64) -> Self {
        self.record_id = Some(id);
        self
    }

    /// Get a formatted context string suitable for logging.
    pub fn to_log_string(&self) -> String {
        let mut parts = vec![format!("operation={}", self.operation)];

        if let Some(ref resource) = self.resource {
            parts.push(format!("resource={}", resource));
        }

        if let Some(id) = self.record_id {
            parts.push(format!("record_id={}", id));
        }

        parts.push(format!("timestamp={}", self.timestamp.to_rfc3339()));

        parts.join(" ")
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}", self.operation)?;

        if let Some(ref resource) = self.resource {
            write!(f, " {}", resource)?;
        }

        if let Some(id) = self.record_id {
            write!(f, " #{}", id)?;
        }

        write!(f, "]")
    }
}
