//! Page orchestrators.
//!
//! Each page composes the session with the stores it needs, folds their
//! loading and error slots into one [`PagePhase`], and owns the purely
//! local UI state: active filter, page number, open form, selected
//! detail. Filtering and pagination are synchronous slices over the
//! fetched collection and never touch the network.
//!
//! The session is handed to each page explicitly; pages never look it up.
//!
//! ## Components
//!
//! - [`PagePhase`]: `NoIdentity -> Loading -> Ready | Errored` state machine
//! - [`Paginator`]: one-based page cursor
//! - [`CategoryFilter`]: exercise category filter
//! - [`DashboardPage`], [`ExercisesPage`], [`WorkoutsPage`], [`ProgressPage`]
//! - [`ChatPage`]: assistant conversation, greeting when there is nothing stored

pub mod chat_view;
pub mod dashboard_view;
pub mod exercises_view;
mod filter;
pub mod page;
mod pagination;
pub mod progress_view;
pub mod workouts_view;

pub use chat_view::ChatPage;
pub use dashboard_view::DashboardPage;
pub use exercises_view::{ExerciseForm, ExercisesPage};
pub use filter::CategoryFilter;
pub use page::{
    combine_loading, first_error, DependencyStatus, PageEvent, PagePhase,
};
pub use pagination::Paginator;
pub use progress_view::ProgressPage;
pub use workouts_view::{WorkoutForm, WorkoutsPage};
