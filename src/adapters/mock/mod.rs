//! Mock implementations for testing.
//!
//! - [`MockHttpClient`] - HTTP client with configurable, queueable and delayable responses

pub mod http;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
