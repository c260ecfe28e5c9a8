//! liftlog - client-side data layer and CLI for a workout tracker.
//!
//! The library exposes the REST client, the resource stores and the page
//! orchestrators so they can be driven from integration tests or another
//! front end.

pub mod adapters;
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod traits;
pub mod view_state;
