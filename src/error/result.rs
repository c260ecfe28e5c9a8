//! Result type alias for liftlog operations.

use super::context::ErrorContext;
use super::liftlog_error::LiftlogError;

/// Type alias for Results using LiftlogError.
pub type LiftlogResult<T> = Result<T, LiftlogError>;

/// Extension trait for Result types to add context to errors.
pub trait ResultExt<T> {
    /// Add context to an error if the result is Err.
    fn context(self, ctx: ErrorContext) -> LiftlogResult<T>;

    /// Add context using a closure (only called on error).
    fn with_context<F>(self, f: F) -> LiftlogResult<T>
    where
        F: FnOnce() -> ErrorContext;
}

impl<T> ResultExt<T> for LiftlogResult<T> {
    fn context(self, ctx: ErrorContext) -> LiftlogResult<T> {
        self.map_err(|e| e.with_context(ctx))
    }

    fn with_context<F>(self, f: F) -> LiftlogResult<T>
    where
        F: FnOnce() -> ErrorContext,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_context_only_on_error() {
        let ok: LiftlogResult<u8> = Ok(1);
        let ok = ok.with_context(|| panic!("must not be called"));
        assert_eq!(ok.unwrap(), 1);

        let err: LiftlogResult<u8> = Err(LiftlogError::Unauthenticated);
        let err = err.context(ErrorContext::new("create")).unwrap_err();
        assert_eq!(err.context().unwrap().operation, "create");
    }
}
