//! Data synchronization layer
//!
//! - SessionStore: who is signed in, plus login/register/logout
//! - ResourceStore: one identity-scoped collection with CRUD and a detail slot
//! - sources: the backend binding for each collection
//! - TotalsAggregator: client-side totals fanned out over workout details
//! - ChatStore: the assistant conversation for the signed-in user

pub mod aggregate;
pub mod chat;
pub mod resource;
pub mod session;
pub mod sources;

pub use aggregate::{compute_totals, Totals, TotalsAggregator};
pub use chat::{ChatSnapshot, ChatStore};
pub use resource::{CollectionSnapshot, DetailSlot, ResourceSource, ResourceStore};
pub use session::{SessionSnapshot, SessionStore};
pub use sources::{
    ExerciseSource, ExerciseStore, MostUsedSource, MostUsedStore, ProgressSource, ProgressStore,
    WorkoutListing, WorkoutSource, WorkoutStore,
};
