//! Exercises page: catalog list with category filter, pagination, an
//! add/edit form and admin-only management actions.

use std::sync::Arc;

use super::filter::CategoryFilter;
use super::page::{advance, identity_missing, settle, DependencyStatus, PageEvent, PagePhase};
use super::pagination::Paginator;
use crate::api::FitnessApi;
use crate::error::{LiftlogError, LiftlogResult, ValidationError};
use crate::models::{Category, Exercise, ExerciseInput};
use crate::state::{DetailSlot, ExerciseStore, SessionStore};
use crate::traits::HttpClient;

/// Open add/edit form.
#[derive(Debug, Clone, Default)]
pub struct ExerciseForm {
    /// `Some(id)` when editing an existing exercise
    pub editing: Option<u64>,
    pub input: ExerciseInput,
    /// Last submit failure; the form stays open while this is set
    pub error: Option<LiftlogError>,
}

impl ExerciseForm {
    pub fn is_edit(&self) -> bool {
        self.editing.is_some()
    }
}

pub struct ExercisesPage<C: HttpClient> {
    session: Arc<SessionStore<C>>,
    store: ExerciseStore<C>,
    filter: CategoryFilter,
    pager: Paginator,
    form: Option<ExerciseForm>,
    phase: PagePhase,
}

impl<C: HttpClient> ExercisesPage<C> {
    pub fn new(session: Arc<SessionStore<C>>, api: FitnessApi<C>, page_size: usize) -> Self {
        Self {
            session,
            store: ExerciseStore::exercises(api),
            filter: CategoryFilter::default(),
            pager: Paginator::new(page_size),
            form: None,
            phase: PagePhase::default(),
        }
    }

    pub fn phase(&self) -> &PagePhase {
        &self.phase
    }

    pub fn store(&self) -> &ExerciseStore<C> {
        &self.store
    }

    /// Resolve the session if needed and load the catalog for the user.
    pub async fn load(&mut self) {
        self.session.ensure_resolved().await;
        self.sync_identity().await;
    }

    /// Follow the session: a new username refetches, no user empties the
    /// list without a request.
    pub async fn sync_identity(&mut self) {
        let session = self.session.snapshot();
        let Some(username) = session.user.as_ref().map(|u| u.username.clone()) else {
            self.store.set_key(None).await;
            advance(&mut self.phase, identity_missing(&session));
            return;
        };

        if self.store.key().as_ref() != Some(&username) {
            advance(&mut self.phase, PageEvent::IdentityResolved);
            self.store.set_key(Some(username)).await;
            self.settle();
        }
    }

    /// Explicit manual refresh.
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

    pub fn category(&self) -> Category {
        self.filter.selected()
    }

    /// Change the filter and go back to the first page.
    pub fn set_category(&mut self, category: Category) {
        self.filter.set(category);
        self.pager.reset();
    }

    /// Every exercise passing the current filter.
    pub fn filtered(&self) -> Vec<Exercise> {
        let items = self.store.items();
        self.filter.apply(&items).into_iter().cloned().collect()
    }

    /// The current page of the filtered list.
    pub fn visible(&self) -> Vec<Exercise> {
        let filtered = self.filtered();
        self.pager.slice(&filtered).to_vec()
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total_pages(self.filtered().len())
    }

    pub fn go_to_page(&mut self, page: usize) {
        let len = self.filtered().len();
        self.pager.go_to(page, len);
    }

    pub fn next_page(&mut self) {
        let len = self.filtered().len();
        self.pager.next(len);
    }

    pub fn prev_page(&mut self) {
        let len = self.filtered().len();
        self.pager.prev(len);
    }

    // ---- permissions ---------------------------------------------------

    pub fn can_manage(&self) -> bool {
        self.session
            .user()
            .map(|u| u.can_manage_exercises())
            .unwrap_or(false)
    }

    fn require_manage(&self, action: &'static str) -> Result<(), ValidationError> {
        if self.can_manage() {
            Ok(())
        } else {
            Err(ValidationError::NotPermitted { action })
        }
    }

    fn find(&self, id: u64) -> Result<Exercise, ValidationError> {
        self.store
            .items()
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(ValidationError::UnknownRecord {
                resource: "exercise",
                id,
            })
    }

    // ---- form ----------------------------------------------------------

    pub fn form(&self) -> Option<&ExerciseForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ExerciseForm> {
        self.form.as_mut()
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(ExerciseForm::default());
    }

    /// Open the form pre-filled from an existing exercise. Admin only.
    pub fn open_edit_form(&mut self, id: u64) -> LiftlogResult<()> {
        self.require_manage("edit exercises")?;
        let exercise = self.find(id)?;
        self.form = Some(ExerciseForm {
            editing: Some(id),
            input: ExerciseInput::from_exercise(&exercise),
            error: None,
        });
        Ok(())
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Validate and send the open form.
    ///
    /// On success the form closes and the list has been refetched. On
    /// failure the form stays open with the error attached, and the error
    /// is returned.
    pub async fn submit_form(&mut self) -> LiftlogResult<()> {
        let Some(form) = self.form.as_ref() else {
            return Ok(());
        };
        let editing = form.editing;
        let input = form.input.clone();

        let result = match input.validate() {
            Err(e) => Err(LiftlogError::from(e)),
            Ok(()) => match editing {
                Some(id) => self.store.update(id, &input).await,
                None => self.store.create(&input).await,
            },
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

    /// Delete an exercise. Admin only.
    pub async fn delete(&mut self, id: u64) -> LiftlogResult<()> {
        self.require_manage("delete exercises")?;
        self.store.delete(id).await?;
        let len = self.filtered().len();
        let page = self.pager.page();
        self.pager.go_to(page, len);
        Ok(())
    }

    pub async fn view_details(&self, id: u64) {
        self.store.fetch_details(id).await;
    }

    pub fn close_details(&self) {
        self.store.clear_details();
    }

    pub fn detail(&self) -> DetailSlot<Exercise> {
        self.store.detail()
    }
}
