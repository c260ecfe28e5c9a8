//! Dashboard: recent workouts, most used exercises and lifetime totals.
//!
//! Most used exercises come aggregated from the server. Totals are derived
//! on the client from the recent workouts' details.

use std::sync::Arc;

use super::page::{
    advance, combine_loading, identity_missing, settle, DependencyStatus, PageEvent, PagePhase,
};
use crate::api::FitnessApi;
use crate::models::{MostUsedExercise, User, Workout};
use crate::state::{
    MostUsedStore, SessionStore, Totals, TotalsAggregator, WorkoutListing, WorkoutStore,
};
use crate::traits::HttpClient;

pub struct DashboardPage<C: HttpClient> {
    session: Arc<SessionStore<C>>,
    recent: WorkoutStore<C>,
    most_used: MostUsedStore<C>,
    totals: TotalsAggregator,
    phase: PagePhase,
}

impl<C: HttpClient> DashboardPage<C> {
    pub fn new(session: Arc<SessionStore<C>>, api: FitnessApi<C>) -> Self {
        Self {
            session,
            recent: WorkoutStore::workouts(api.clone(), WorkoutListing::Recent),
            most_used: MostUsedStore::most_used(api),
            totals: TotalsAggregator::new(),
            phase: PagePhase::default(),
        }
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub async fn load(&mut self) {
        self.session.ensure_resolved().await;
        self.sync_identity().await;
    }

    /// Both stores follow the user id; they fetch concurrently.
    pub async fn sync_identity(&mut self) {
        let session = self.session.snapshot();
        let Some(user_id) = session.user.as_ref().map(|u| u.id) else {
            tokio::join!(self.recent.set_key(None), self.most_used.set_key(None));
            self.totals.sync(&self.recent).await;
            advance(&mut self.phase, identity_missing(&session));
            return;
        };

        if self.recent.key() != Some(user_id) || self.most_used.key() != Some(user_id) {
            advance(&mut self.phase, PageEvent::IdentityResolved);
            tokio::join!(
                self.recent.set_key(Some(user_id)),
                self.most_used.set_key(Some(user_id))
            );
            self.totals.sync(&self.recent).await;
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
            tokio::join!(self.recent.refresh(), self.most_used.refresh());
            self.totals.sync(&self.recent).await;
            self.settle();
        }
    }

    fn dependencies(&self) -> [DependencyStatus; 2] {
        [
            DependencyStatus::from(&self.recent.snapshot()),
            DependencyStatus::from(&self.most_used.snapshot()),
        ]
    }

    fn settle(&mut self) {
        let deps = self.dependencies();
        advance(&mut self.phase, settle(&deps));
    }

    /// Any dependency still in flight.
    pub fn is_loading(&self) -> bool {
        self.session.is_loading() || combine_loading(&self.dependencies())
    }

    pub fn recent_workouts(&self) -> Vec<Workout> {
        self.recent.items()
    }

    pub fn most_used(&self) -> Vec<MostUsedExercise> {
        self.most_used.items()
    }

    /// Totals as of the last recomputation.
    pub fn totals(&self) -> Totals {
        self.totals.totals()
    }

    /// Whether the totals match the current recent-workouts list.
    pub fn totals_are_current(&self) -> bool {
        self.totals.is_current(&self.recent)
    }
}
