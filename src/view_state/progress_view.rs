//! Progress page: pick an exercise, chart its series over a range.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use super::page::{advance, identity_missing, settle, DependencyStatus, PageEvent, PagePhase};
use crate::api::FitnessApi;
use crate::error::{LiftlogResult, ValidationError};
use crate::models::{ChartRange, Exercise, ProgressPoint};
use crate::state::{ExerciseStore, ProgressStore, SessionStore};
use crate::traits::HttpClient;

pub struct ProgressPage<C: HttpClient> {
    session: Arc<SessionStore<C>>,
    exercises: ExerciseStore<C>,
    progress: ProgressStore<C>,
    range: ChartRange,
    phase: PagePhase,
}

impl<C: HttpClient> ProgressPage<C> {
    pub fn new(session: Arc<SessionStore<C>>, api: FitnessApi<C>) -> Self {
        Self {
            session,
            exercises: ExerciseStore::exercises(api.clone()),
            progress: ProgressStore::progress(api),
            range: ChartRange::default(),
            phase: PagePhase::default(),
        }
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub async fn load(&mut self) {
        self.session.ensure_resolved().await;
        self.sync_identity().await;
    }

    /// Load the user's exercises, then the series of the selected one
    /// (the first exercise unless a still-present one is selected).
    pub async fn sync_identity(&mut self) {
        let session = self.session.snapshot();
        let Some(username) = session.user.as_ref().map(|u| u.username.clone()) else {
            self.exercises.set_key(None).await;
            self.progress.set_key(None).await;
            advance(&mut self.phase, identity_missing(&session));
            return;
        };

        if self.exercises.key().as_ref() != Some(&username) {
            advance(&mut self.phase, PageEvent::IdentityResolved);
            self.exercises.set_key(Some(username)).await;
            self.progress.set_key(self.default_selection()).await;
            self.settle();
        }
    }

    pub async fn refresh(&mut self) {
        if self.session.user().is_none() {
            self.session.retry_failed().await;
            self.sync_identity().await;
            return;
        }
        advance(&mut self.phase, PageEvent::RefreshStarted);
        if self.phase.is_loading() {
            self.exercises.refresh().await;
            let selection = self.default_selection();
            if selection == self.progress.key() {
                self.progress.refresh().await;
            } else {
                self.progress.set_key(selection).await;
            }
            self.settle();
        }
    }

    fn default_selection(&self) -> Option<u64> {
        let exercises = self.exercises.items();
        match self.progress.key() {
            Some(id) if exercises.iter().any(|e| e.id == id) => Some(id),
            _ => exercises.first().map(|e| e.id),
        }
    }

    fn settle(&mut self) {
        let deps = [
            DependencyStatus::from(&self.exercises.snapshot()),
            DependencyStatus::from(&self.progress.snapshot()),
        ];
        advance(&mut self.phase, settle(&deps));
    }

    pub fn exercises(&self) -> Vec<Exercise> {
        self.exercises.items()
    }

    pub fn selected(&self) -> Option<u64> {
        self.progress.key()
    }

    /// Switch the charted exercise; the series refetches for the new id.
    pub async fn select_exercise(&mut self, id: u64) -> LiftlogResult<()> {
        if !self.exercises.items().iter().any(|e| e.id == id) {
            return Err(ValidationError::UnknownRecord {
                resource: "exercise",
                id,
            }
            .into());
        }
        if self.progress.key() != Some(id) {
            advance(&mut self.phase, PageEvent::RefreshStarted);
            self.progress.set_key(Some(id)).await;
            self.settle();
        }
        Ok(())
    }

    pub fn range(&self) -> ChartRange {
        self.range
    }

    pub fn set_range(&mut self, range: ChartRange) {
        self.range = range;
    }

    /// Points inside the selected range ending at `now`, oldest first.
    pub fn visible_points(&self, now: DateTime<Utc>) -> Vec<ProgressPoint> {
        self.range.filter_points(&self.progress.items(), now)
    }
}
