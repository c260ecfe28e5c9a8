//! Trait abstractions for dependency injection and testability.
//!
//! - [`HttpClient`] - HTTP client operations (GET, POST, PATCH, DELETE)

pub mod http;

pub use http::{Headers, HttpClient, HttpError, Response};
