//! Wire schemas for every backend endpoint.
//!
//! Responses are normalized on receipt (see [`wire`]) so the stores and
//! pages only ever see one shape per record.

pub mod chat;
pub mod exercise;
pub mod progress;
pub mod user;
pub mod wire;
pub mod workout;

pub use chat::{ChatMessage, ChatReply, ChatRequest, ChatRole};
pub use exercise::{Category, Exercise, ExerciseInput, MostUsedExercise, Visibility};
pub use progress::{ChartRange, ProgressPoint};
pub(crate) use user::MeResponse;
pub use user::{LoginRequest, RegisterRequest, User};
pub use wire::ListEnvelope;
pub use workout::{
    format_date, ExerciseEntry, Workout, WorkoutDetail, WorkoutExerciseInput, WorkoutInput,
    MAX_RATING,
};

/// A record with a server-assigned identifier.
pub trait Record {
    fn id(&self) -> u64;
}
