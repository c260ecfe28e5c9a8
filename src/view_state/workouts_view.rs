//! Workouts page: paginated history, a create form and a detail modal.

use std::sync::Arc;

use super::page::{advance, identity_missing, settle, DependencyStatus, PageEvent, PagePhase};
use super::pagination::Paginator;
use crate::api::FitnessApi;
use crate::error::{LiftlogError, LiftlogResult};
use crate::models::{Workout, WorkoutDetail, WorkoutExerciseInput, WorkoutInput};
use crate::state::{DetailSlot, SessionStore, WorkoutListing, WorkoutStore};
use crate::traits::HttpClient;

#[derive(Debug, Clone, Default)]
pub struct WorkoutForm {
    pub input: WorkoutInput,
    pub error: Option<LiftlogError>,
}

impl WorkoutForm {
    pub fn add_line(&mut self, line: WorkoutExerciseInput) {
        self.input.exercises.push(line);
    }

    /// Remove the line at `index`; out of range is ignored.
    pub fn remove_line(&mut self, index: usize) {
        if index < self.input.exercises.len() {
            self.input.exercises.remove(index);
        }
    }
}

pub struct WorkoutsPage<C: HttpClient> {
    session: Arc<SessionStore<C>>,
    store: WorkoutStore<C>,
    pager: Paginator,
    form: Option<WorkoutForm>,
    phase: PagePhase,
}

impl<C: HttpClient> WorkoutsPage<C> {
    pub fn new(session: Arc<SessionStore<C>>, api: FitnessApi<C>, page_size: usize) -> Self {
        Self {
            session,
            store: WorkoutStore::workouts(api, WorkoutListing::All),
            pager: Paginator::new(page_size),
            form: None,
            phase: PagePhase::default(),
        }
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub fn store(&self) -> &WorkoutStore<C> {
        &self.store
    }

    pub async fn load(&mut self) {
        self.session.ensure_resolved().await;
        self.sync_identity().await;
    }

    pub async fn sync_identity(&mut self) {
        let session = self.session.snapshot();
        let Some(user_id) = session.user.as_ref().map(|u| u.id) else {
            self.store.set_key(None).await;
            advance(&mut self.phase, identity_missing(&session));
            return;
        };

        if self.store.key() != Some(user_id) {
            advance(&mut self.phase, PageEvent::IdentityResolved);
            self.store.set_key(Some(user_id)).await;
            self.settle();
        }
    }

    /// Manual retry. A session that failed to resolve is retried first;
    /// the list is only fetched once a user is known.
    pub async fn refresh(&mut self) {
        if self.session.user().is_none() {
            self.session.retry_failed().await;
            self.sync_identity().await;
            return;
        }
        advance(&mut self.phase, PageEvent::RefreshStarted);
        if self.phase.is_loading() {
            self.store.refresh().await;
            self.settle();
        }
    }

    fn settle(&mut self) {
        let deps = [DependencyStatus::from(&self.store.snapshot())];
        advance(&mut self.phase, settle(&deps));
    }

    // ---- list ----------------------------------------------------------

    pub fn workouts(&self) -> Vec<Workout> {
        self.store.items()
    }

    pub fn visible(&self) -> Vec<Workout> {
        let items = self.store.items();
        self.pager.slice(&items).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.store.items().len())
    }

    pub fn go_to_page(&mut self, page: usize) {
        let len = self.store.items().len();
        self.pager.go_to(page, len);
    }

    pub fn next_page(&mut self) {
        let len = self.store.items().len();
        self.pager.next(len);
    }

    pub fn prev_page(&mut self) {
        let len = self.store.items().len();
        self.pager.prev(len);
    }

    // ---- form ----------------------------------------------------------

    pub fn form(&self) -> Option<&WorkoutForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut WorkoutForm> {
        self.form.as_mut()
    }

    pub fn open_form(&mut self) {
        self.form = Some(WorkoutForm::default());
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate and create. The form closes only on success.
    pub async fn submit_form(&mut self) -> LiftlogResult<()> {
        let Some(form) = self.form.as_ref() else {
            return Ok(());
        };
        let input = form.input.clone();

        let result = match input.validate() {
            Err(e) => Err(LiftlogError::from(e)),
            Ok(()) => self.store.create(&input).await,
        };

        match result {
            Ok(()) => {
                self.form = None;
                advance(&mut self.phase, PageEvent::RefreshStarted);
                self.settle();
                Ok(())
            }
            Err(e) => {
                if let Some(form) = self.form.as_mut() {
                    form.error = Some(e.clone());
                }
                Err(e)
            }
        }
    }

    // ---- delete & detail -----------------------------------------------

    pub async fn delete(&mut self, id: u64) -> LiftlogResult<()> {
        self.store.delete(id).await?;
        let len = self.store.items().len();
        let page = self.pager.page();
        self.pager.go_to(page, len);
        Ok(())
    }

    /// Open the detail modal, replacing any open one.
    pub async fn view_details(&self, id: u64) {
        self.store.fetch_details(id).await;
    }

    pub fn close_details(&self) {
        self.store.clear_details();
    }

    pub fn detail(&self) -> DetailSlot<WorkoutDetail> {
        self.store.detail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockHttpClient, MockResponse};
    use serde_json::json;
    use std::time::Duration;

    const BASE: &str = "http://api.test";

    fn page() -> (WorkoutsPage<MockHttpClient>, MockHttpClient) {
        let mock = MockHttpClient::new();
        mock.set_response(
            &format!("{}/api/me", BASE),
            MockResponse::json(json!({"user": {"id": 4, "username": "bo"}})),
        );
        let api = FitnessApi::new(BASE, mock.clone());
        let session = Arc::new(SessionStore::new(api.clone()));
        (WorkoutsPage::new(session, api, 6), mock)
    }

    fn history(n: u64) -> MockResponse {
        let rows: Vec<_> = (1..=n)
            .map(|id| json!({"id": id, "nombre": format!("W{}", id), "fecha": "2024-05-01"}))
            .collect();
        MockResponse::json(json!({ "results": rows }))
    }

    #[tokio::test]
    async fn test_paginates_by_six() {
        let (mut page, mock) = page();
        mock.set_response(&format!("{}/workouts/4", BASE), history(13));
        page.load().await;

        assert_eq!(page.total_pages(), 3);
        page.next_page();
        page.next_page();
        page.next_page();
        assert_eq!(page.page(), 3);
        assert_eq!(page.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_after_session_failure_needs_a_user() {
        let mock = MockHttpClient::new();
        let me = format!("{}/api/me", BASE);
        mock.push_response(&me, MockResponse::status(500));
        mock.push_response(&me, MockResponse::status(500));
        let api = FitnessApi::new(BASE, mock.clone());
        let mut page = WorkoutsPage::new(Arc::new(SessionStore::new(api.clone())), api, 6);

        page.load().await;
        assert!(page.phase().error().is_some());

        page.refresh().await;
        assert!(!page.phase().is_ready());
        assert!(page.phase().error().is_some());
        assert!(mock
            .get_requests()
            .iter()
            .all(|r| !r.url.contains("/workouts/")));

        mock.push_response(
            &me,
            MockResponse::json(json!({"user": {"id": 4, "username": "bo"}})),
        );
        mock.set_response(&format!("{}/workouts/4", BASE), history(2));
        page.refresh().await;
        assert!(page.phase().is_ready());
        assert_eq!(page.workouts().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_last_item_on_page_steps_back() {
        let (mut page, mock) = page();
        mock.set_response(&format!("{}/workouts/4", BASE), history(7));
        mock.set_response(&format!("{}/workouts/delete/7", BASE), MockResponse::status(204));
        page.load().await;
        page.go_to_page(2);

        page.delete(7).await.unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.workouts().len(), 6);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_form_open() {
        let (mut page, mock) = page();
        mock.set_response(&format!("{}/workouts/4", BASE), history(1));
        mock.set_response(
            &format!("{}/workouts/new", BASE),
            MockResponse::status_json(500, json!({"error": "db down"})),
        );
        page.load().await;

        page.open_form();
        let form = page.form_mut().unwrap();
        form.input.name = "Push".to_string();
        form.input.date = "2024-05-02".to_string();
        form.add_line(WorkoutExerciseInput {
            exercise_id: 1,
            weight: 40.0,
            reps: 10,
            sets: 3,
        });

        let err = page.submit_form().await.unwrap_err();
        assert!(matches!(err.inner(), LiftlogError::Server { status: 500, .. }));
        assert!(page.form().unwrap().error.is_some());
        assert_eq!(page.workouts().len(), 1);
    }

    #[tokio::test]
    async fn test_later_detail_replaces_slower_earlier_one() {
        let (mut page, mock) = page();
        mock.set_response(&format!("{}/workouts/4", BASE), history(2));
        mock.set_response(
            &format!("{}/workouts/details/1", BASE),
            MockResponse::json(json!({"id": 1, "ejercicios": []})).delayed(Duration::from_millis(50)),
        );
        mock.set_response(
            &format!("{}/workouts/details/2", BASE),
            MockResponse::json(json!({"id": 2, "ejercicios": [{"peso": 10, "repeticiones": 1, "series": 1}]})),
        );
        page.load().await;

        tokio::join!(page.view_details(1), page.view_details(2));
        let slot = page.detail();
        assert_eq!(slot.selected, Some(2));
        assert_eq!(slot.value.map(|d| d.id), Some(2));

        page.close_details();
        assert!(page.detail().value.is_none());
    }
}
