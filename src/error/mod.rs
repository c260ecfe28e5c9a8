//! Unified error handling for liftlog.
//!
//! | Category | Source | Retryable |
//! |----------|--------|-----------|
//! | Auth | no session / 401 / 403 | No |
//! | Network | request threw before a response | Yes |
//! | Server | non-2xx response | 5xx and 429 |
//! | User | client-side validation, nothing sent | No |
//! | Client | undecodable body, unsupported operation | No |
//!
//! "Retryable" only informs the message shown; nothing in the data layer
//! retries on its own.

mod category;
mod context;
mod liftlog_error;
mod network;
mod result;
mod validation;

pub use category::ErrorCategory;
pub use context::ErrorContext;
pub use liftlog_error::LiftlogError;
pub use network::NetworkError;
pub use result::{LiftlogResult, ResultExt};
pub use validation::ValidationError;
