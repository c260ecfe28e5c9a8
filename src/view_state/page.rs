//! Page phase machine and dependency folding.

use crate::error::LiftlogError;
use crate::state::{CollectionSnapshot, SessionSnapshot};

// ============================================================================
// PagePhase
// ============================================================================

/// Lifecycle of a collection-bearing page.
///
/// ```text
/// NoIdentity --IdentityResolved--> Loading --LoadSucceeded--> Ready
///                                     |                         |
///                                LoadFailed               RefreshStarted
///                                     v                         |
///                                  Errored <----LoadFailed--- Loading
/// ```
///
/// `Errored` is never left on its own; only a new identity or an explicit
/// refresh moves it back to `Loading`.
#[derive(Debug, Clone, Default)]
pub enum PagePhase {
    #[default]
    NoIdentity,
    Loading,
    Ready,
    Errored(LiftlogError),
}

/// Inputs that drive [`PagePhase`].
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// An identity became available or changed
    IdentityResolved,
    /// The session settled without a user, or the user signed out
    IdentityLost,
    /// Resolving the session itself failed
    SessionFailed(LiftlogError),
    /// A refresh was triggered explicitly (or after a mutation)
    RefreshStarted,
    LoadSucceeded,
    LoadFailed(LiftlogError),
}

impl PagePhase {
    pub fn transition(self, event: PageEvent) -> PagePhase {
        use PageEvent as E;
        use PagePhase as P;
        match (self, event) {
            (_, E::IdentityLost) => P::NoIdentity,
            (_, E::SessionFailed(e)) => P::Errored(e),
            (_, E::IdentityResolved) => P::Loading,
            (P::NoIdentity, E::RefreshStarted) => P::NoIdentity,
            (_, E::RefreshStarted) => P::Loading,
            (P::Loading, E::LoadSucceeded) => P::Ready,
            (P::Loading, E::LoadFailed(e)) => P::Errored(e),
            (phase, _) => phase,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PagePhase::Loading)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, PagePhase::Ready)
    }

    pub fn error(&self) -> Option<&LiftlogError> {
        match self {
            PagePhase::Errored(e) => Some(e),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PagePhase::NoIdentity => "signed out",
            PagePhase::Loading => "loading",
            PagePhase::Ready => "ready",
            PagePhase::Errored(_) => "error",
        }
    }
}

// ============================================================================
// Dependency folding
// ============================================================================

/// Loading flag and error slot of one thing a page depends on.
#[derive(Debug, Clone, Default)]
pub struct DependencyStatus {
    pub is_loading: bool,
    pub error: Option<LiftlogError>,
}

impl From<&SessionSnapshot> for DependencyStatus {
    fn from(session: &SessionSnapshot) -> Self {
        Self {
            is_loading: session.is_loading,
            error: session.error.clone(),
        }
    }
}

impl<T> From<&CollectionSnapshot<T>> for DependencyStatus {
    fn from(snapshot: &CollectionSnapshot<T>) -> Self {
        Self {
            is_loading: snapshot.is_loading,
            error: snapshot.error.clone(),
        }
    }
}

/// Advance `phase` in place.
pub fn advance(phase: &mut PagePhase, event: PageEvent) {
    *phase = std::mem::take(phase).transition(event);
}

/// Event for a session that settled without a user.
pub fn identity_missing(session: &SessionSnapshot) -> PageEvent {
    match &session.error {
        Some(e) => PageEvent::SessionFailed(e.clone()),
        None => PageEvent::IdentityLost,
    }
}

/// The page is loading while any dependency is.
pub fn combine_loading(deps: &[DependencyStatus]) -> bool {
    deps.iter().any(|d| d.is_loading)
}

/// First error in dependency order.
pub fn first_error(deps: &[DependencyStatus]) -> Option<LiftlogError> {
    deps.iter().find_map(|d| d.error.clone())
}

/// Event that settles a load, given everything the page depends on.
pub fn settle(deps: &[DependencyStatus]) -> PageEvent {
    match first_error(deps) {
        Some(e) => PageEvent::LoadFailed(e),
        None => PageEvent::LoadSucceeded,
    }
}
