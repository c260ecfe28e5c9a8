//! Backend bindings for each resource store.

use async_trait::async_trait;

use super::resource::{ResourceSource, ResourceStore};
use crate::api::FitnessApi;
use crate::error::LiftlogResult;
use crate::models::{
    Exercise, ExerciseInput, MostUsedExercise, ProgressPoint, Workout, WorkoutDetail,
    WorkoutInput,
};
use crate::traits::HttpClient;

/// Exercises owned by a user, keyed by username.
pub struct ExerciseSource<C: HttpClient> {
    api: FitnessApi<C>,
}

impl<C: HttpClient> ExerciseSource<C> {
    pub fn new(api: FitnessApi<C>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: HttpClient> ResourceSource for ExerciseSource<C> {
    type Key = String;
    type Item = Exercise;
    type Input = ExerciseInput;
    type Detail = Exercise;

    const NAME: &'static str = "exercises";

    async fn list(&self, username: &String) -> LiftlogResult<Vec<Exercise>> {
        self.api.list_exercises(username).await
    }

    async fn create(&self, username: &String, input: &ExerciseInput) -> LiftlogResult<()> {
        self.api.create_exercise(username, input).await
    }

    async fn update(&self, id: u64, input: &ExerciseInput) -> LiftlogResult<()> {
        self.api.update_exercise(id, input).await
    }

    async fn delete(&self, id: u64) -> LiftlogResult<()> {
        self.api.delete_exercise(id).await
    }

    async fn details(&self, id: u64) -> LiftlogResult<Exercise> {
        self.api.exercise_details(id).await
    }
}

/// Which workout list endpoint a [`WorkoutSource`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutListing {
    /// `/workouts/{userId}`
    All,
    /// `/recentworkouts/{userId}`
    Recent,
}

/// Workouts owned by a user, keyed by user id. Workouts cannot be edited.
pub struct WorkoutSource<C: HttpClient> {
    api: FitnessApi<C>,
    listing: WorkoutListing,
}

impl<C: HttpClient> WorkoutSource<C> {
    pub fn new(api: FitnessApi<C>, listing: WorkoutListing) -> Self {
        Self { api, listing }
    }

    pub fn listing(&self) -> WorkoutListing {
        self.listing
    }
}

#[async_trait]
impl<C: HttpClient> ResourceSource for WorkoutSource<C> {
    type Key = u64;
    type Item = Workout;
    type Input = WorkoutInput;
    type Detail = WorkoutDetail;

    const NAME: &'static str = "workouts";

    async fn list(&self, user_id: &u64) -> LiftlogResult<Vec<Workout>> {
        match self.listing {
            WorkoutListing::All => self.api.list_workouts(*user_id).await,
            WorkoutListing::Recent => self.api.recent_workouts(*user_id).await,
        }
    }

    async fn create(&self, user_id: &u64, input: &WorkoutInput) -> LiftlogResult<()> {
        self.api.create_workout(*user_id, input).await
    }

    async fn delete(&self, id: u64) -> LiftlogResult<()> {
        self.api.delete_workout(id).await
    }

    async fn details(&self, id: u64) -> LiftlogResult<WorkoutDetail> {
        self.api.workout_details(id).await
    }
}

/// Server-aggregated most used exercises, keyed by user id. Read-only.
pub struct MostUsedSource<C: HttpClient> {
    api: FitnessApi<C>,
}

impl<C: HttpClient> MostUsedSource<C> {
    pub fn new(api: FitnessApi<C>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: HttpClient> ResourceSource for MostUsedSource<C> {
    type Key = u64;
    type Item = MostUsedExercise;
    type Input = ();
    type Detail = ();

    const NAME: &'static str = "most used exercises";

    async fn list(&self, user_id: &u64) -> LiftlogResult<Vec<MostUsedExercise>> {
        self.api.most_used_exercises(*user_id).await
    }
}

/// Progress series keyed by exercise id. Read-only.
pub struct ProgressSource<C: HttpClient> {
    api: FitnessApi<C>,
}

impl<C: HttpClient> ProgressSource<C> {
    pub fn new(api: FitnessApi<C>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<C: HttpClient> ResourceSource for ProgressSource<C> {
    type Key = u64;
    type Item = ProgressPoint;
    type Input = ();
    type Detail = ();

    const NAME: &'static str = "progress";

    async fn list(&self, exercise_id: &u64) -> LiftlogResult<Vec<ProgressPoint>> {
        self.api.exercise_progress(*exercise_id).await
    }
}

pub type ExerciseStore<C> = ResourceStore<ExerciseSource<C>>;
pub type WorkoutStore<C> = ResourceStore<WorkoutSource<C>>;
pub type MostUsedStore<C> = ResourceStore<MostUsedSource<C>>;
pub type ProgressStore<C> = ResourceStore<ProgressSource<C>>;

impl<C: HttpClient> ResourceStore<ExerciseSource<C>> {
    pub fn exercises(api: FitnessApi<C>) -> Self {
        Self::new(ExerciseSource::new(api))
    }
}

impl<C: HttpClient> ResourceStore<WorkoutSource<C>> {
    pub fn workouts(api: FitnessApi<C>, listing: WorkoutListing) -> Self {
        Self::new(WorkoutSource::new(api, listing))
    }
}

impl<C: HttpClient> ResourceStore<MostUsedSource<C>> {
    pub fn most_used(api: FitnessApi<C>) -> Self {
        Self::new(MostUsedSource::new(api))
    }
}

impl<C: HttpClient> ResourceStore<ProgressSource<C>> {
    pub fn progress(api: FitnessApi<C>) -> Self {
        Self::new(ProgressSource::new(api))
    }
}
