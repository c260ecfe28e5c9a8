//! Session resource accessor.
//!
//! Resolves the current user from the ambient cookie once, and owns the
//! login, register and logout actions. Every other store takes its
//! identity key from here; pages receive the session explicitly.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};
use tracing::{debug, info};

use crate::api::FitnessApi;
use crate::error::{ErrorContext, LiftlogError, LiftlogResult, ValidationError};
use crate::models::{LoginRequest, RegisterRequest, User};
use crate::traits::HttpClient;

/// Point-in-time copy of the session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<LiftlogError>,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        // Nothing is known until the first resolution completes.
        Self {
            user: None,
            is_loading: true,
            error: None,
        }
    }
}

impl SessionSnapshot {
    /// Settled with no user: downstream stores must not fetch.
    pub fn has_no_session(&self) -> bool {
        self.user.is_none() && !self.is_loading
    }
}

pub struct SessionStore<C: HttpClient> {
    api: FitnessApi<C>,
    state: RwLock<SessionSnapshot>,
    started: AtomicBool,
    ticket: AtomicU64,
}

impl<C: HttpClient> SessionStore<C> {
    pub fn new(api: FitnessApi<C>) -> Self {
        Self {
            api,
            state: RwLock::new(SessionSnapshot::default()),
            started: AtomicBool::new(false),
            ticket: AtomicU64::new(0),
        }
    }

    pub fn api(&self) -> &FitnessApi<C> {
        &self.api
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionSnapshot> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn user(&self) -> Option<User> {
        self.snapshot().user
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot().is_loading
    }

    pub fn error(&self) -> Option<LiftlogError> {
        self.snapshot().error
    }

    /// Identity key for username-scoped stores.
    pub fn username(&self) -> Option<String> {
        self.user().map(|u| u.username)
    }

    /// Identity key for user-id-scoped stores.
    pub fn user_id(&self) -> Option<u64> {
        self.user().map(|u| u.id)
    }

    /// Resolve the session on first call; later calls return immediately.
    pub async fn ensure_resolved(&self) {
        if !self.started.swap(true, Ordering::SeqCst) {
            self.resolve().await;
        }
    }

    /// Ask `/api/me` who is signed in.
    ///
    /// 401 or no user leaves `user` empty without an error. Any other
    /// failure empties `user` and records the error. Never retries.
    pub async fn resolve(&self) {
        self.started.store(true, Ordering::SeqCst);
        let ticket = self.ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.write_state().is_loading = true;

        let result = self.api.me().await;

        if ticket != self.ticket.load(Ordering::SeqCst) {
            debug!(ticket, "discarding superseded session resolution");
            return;
        }

        let mut state = self.write_state();
        state.is_loading = false;
        match result {
            Ok(Some(user)) => {
                info!(user_id = user.id, username = %user.username, "session resolved");
                state.user = Some(user);
                state.error = None;
            }
            Ok(None) => {
                info!("no active session");
                state.user = None;
                state.error = None;
            }
            Err(e) => {
                debug!(error = %e, "session resolution failed");
                state.user = None;
                state.error = Some(e.with_context(ErrorContext::new("resolve").with_resource("session")));
            }
        }
    }

    /// Resolve again if the last resolution failed and left no user.
    pub async fn retry_failed(&self) {
        let state = self.snapshot();
        if state.user.is_none() && state.error.is_some() {
            self.resolve().await;
        }
    }

    /// Record a rejected form. Nothing was sent, so the loading flag
    /// belongs to whatever request is still in flight.
    fn reject(&self, operation: &str, error: ValidationError) -> LiftlogError {
        let error = LiftlogError::from(error)
            .with_context(ErrorContext::new(operation).with_resource("session"));
        self.write_state().error = Some(error.clone());
        error
    }

    fn fail(&self, operation: &str, error: LiftlogError) -> LiftlogError {
        let error = error.with_context(ErrorContext::new(operation).with_resource("session"));
        let mut state = self.write_state();
        state.is_loading = false;
        state.error = Some(error.clone());
        error
    }

    /// Sign in, then re-resolve the session.
    ///
    /// Empty fields fail validation before anything is sent.
    pub async fn login(&self, email: &str, password: &str) -> LiftlogResult<()> {
        let request = LoginRequest::new(email.trim(), password);
        if let Err(e) = request.validate() {
            return Err(self.reject("login", e));
        }

        self.write_state().is_loading = true;
        if let Err(e) = self.api.login(&request).await {
            return Err(self.fail("login", e));
        }

        self.resolve().await;
        let state = self.snapshot();
        if let Some(error) = state.error {
            return Err(error);
        }
        if state.user.is_none() {
            return Err(self.fail("login", LiftlogError::Unauthenticated));
        }
        Ok(())
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, request: &RegisterRequest) -> LiftlogResult<()> {
        if let Err(e) = request.validate() {
            return Err(self.reject("register", e));
        }

        self.write_state().is_loading = true;
        match self.api.register(request).await {
            Ok(()) => {
                let mut state = self.write_state();
                state.is_loading = false;
                state.error = None;
                info!(username = %request.username, "account registered");
                Ok(())
            }
            Err(e) => Err(self.fail("register", e)),
        }
    }

    /// Sign out. On failure the user stays signed in.
    pub async fn logout(&self) -> LiftlogResult<()> {
        self.write_state().is_loading = true;
        match self.api.logout().await {
            Ok(()) => {
                // Invalidate any in-flight resolution.
                self.ticket.fetch_add(1, Ordering::SeqCst);
                let mut state = self.write_state();
                state.user = None;
                state.error = None;
                state.is_loading = false;
                info!("signed out");
                Ok(())
            }
            Err(e) => Err(self.fail("logout", e)),
        }
    }
}
