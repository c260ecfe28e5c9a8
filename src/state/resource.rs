//! Generic resource store.
//!
//! One store owns one collection of records scoped by an identity key
//! (a username, a user id, an exercise id). It tracks a loading flag and
//! an error slot for the collection, plus an independent slot for a
//! single selected detail.
//!
//! Refreshes are tagged with a ticket taken before the request is sent.
//! When a response arrives, it is applied only if its ticket is still the
//! most recently issued one; anything older is dropped. Two overlapping
//! refreshes therefore always settle on the one issued last, whatever
//! order the responses arrive in.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{ErrorContext, LiftlogError, LiftlogResult};
use crate::models::Record;

// ============================================================================
// ResourceSource
// ============================================================================

/// Backend operations for one kind of resource.
///
/// Only `list` is required. The other operations default to
/// [`LiftlogError::Unsupported`].
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Identity the collection is scoped by.
    type Key: Clone + PartialEq + Debug + Send + Sync;
    type Item: Clone + Send + Sync;
    /// Body for create and update.
    type Input: Send + Sync;
    type Detail: Clone + Send + Sync;

    /// Resource name used in logs and error context.
    const NAME: &'static str;

    async fn list(&self, key: &Self::Key) -> LiftlogResult<Vec<Self::Item>>;

    async fn create(&self, _key: &Self::Key, _input: &Self::Input) -> LiftlogResult<()> {
        Err(LiftlogError::Unsupported {
            resource: Self::NAME,
            operation: "create",
        })
    }

    async fn update(&self, _id: u64, _input: &Self::Input) -> LiftlogResult<()> {
        Err(LiftlogError::Unsupported {
            resource: Self::NAME,
            operation: "update",
        })
    }

    async fn delete(&self, _id: u64) -> LiftlogResult<()> {
        Err(LiftlogError::Unsupported {
            resource: Self::NAME,
            operation: "delete",
        })
    }

    async fn details(&self, _id: u64) -> LiftlogResult<Self::Detail> {
        Err(LiftlogError::Unsupported {
            resource: Self::NAME,
            operation: "details",
        })
    }
}

// ============================================================================
// State containers
// ============================================================================

#[derive(Debug)]
struct CollectionState<T> {
    items: Vec<T>,
    is_loading: bool,
    error: Option<LiftlogError>,
}

impl<T> Default for CollectionState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            error: None,
        }
    }
}

/// The single selected detail and its own fetch state.
#[derive(Debug, Clone)]
pub struct DetailSlot<D> {
    /// Id of the record the slot refers to, set as soon as a fetch starts
    pub selected: Option<u64>,
    pub value: Option<D>,
    pub is_loading: bool,
    pub error: Option<LiftlogError>,
}

impl<D> Default for DetailSlot<D> {
    fn default() -> Self {
        Self {
            selected: None,
            value: None,
            is_loading: false,
            error: None,
        }
    }
}

/// Point-in-time copy of a store's collection state.
#[derive(Debug, Clone)]
pub struct CollectionSnapshot<T> {
    pub items: Vec<T>,
    pub is_loading: bool,
    pub error: Option<LiftlogError>,
    /// Bumped every time `items` changes
    pub generation: u64,
}

// ============================================================================
// ResourceStore
// ============================================================================

pub struct ResourceStore<S: ResourceSource> {
    source: S,
    key: RwLock<Option<S::Key>>,
    state: RwLock<CollectionState<S::Item>>,
    detail: RwLock<DetailSlot<S::Detail>>,
    /// Last refresh ticket handed out
    refresh_ticket: AtomicU64,
    /// Last detail ticket handed out; closing the detail also takes one
    detail_ticket: AtomicU64,
    generation: AtomicU64,
}

impl<S: ResourceSource> ResourceStore<S> {
    /// Create a store with no identity and an empty collection.
    pub fn new(source: S) -> Self {
        Self {
            source,
            key: RwLock::new(None),
            state: RwLock::new(CollectionState::default()),
            detail: RwLock::new(DetailSlot::default()),
            refresh_ticket: AtomicU64::new(0),
            detail_ticket: AtomicU64::new(0),
            generation: AtomicU64::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CollectionState<S::Item>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CollectionState<S::Item>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_detail(&self) -> RwLockWriteGuard<'_, DetailSlot<S::Detail>> {
        self.detail.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn context(operation: &str) -> ErrorContext {
        ErrorContext::new(operation).with_resource(S::NAME)
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    // ---- accessors -----------------------------------------------------

    pub fn key(&self) -> Option<S::Key> {
        self.key.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.read_state().items.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.read_state().is_loading
    }

    pub fn error(&self) -> Option<LiftlogError> {
        self.read_state().error.clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> CollectionSnapshot<S::Item> {
        let state = self.read_state();
        CollectionSnapshot {
            items: state.items.clone(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            generation: self.generation(),
        }
    }

    pub fn detail(&self) -> DetailSlot<S::Detail> {
        self.detail
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ---- identity ------------------------------------------------------

    /// Change the identity key. A different key triggers a refresh; the
    /// same key is a no-op.
    pub async fn set_key(&self, key: Option<S::Key>) {
        let changed = {
            let mut current = self.key.write().unwrap_or_else(PoisonError::into_inner);
            if *current == key {
                false
            } else {
                debug!(resource = S::NAME, ?key, "identity changed");
                *current = key;
                true
            }
        };
        if changed {
            self.refresh().await;
        }
    }

    // ---- collection ----------------------------------------------------

    /// Refetch the collection for the current key.
    ///
    /// With no key the collection becomes empty and no request is sent.
    /// A failure is recorded in the error slot and the previous items are
    /// kept. Responses to superseded refreshes are discarded.
    pub async fn refresh(&self) {
        let ticket = self.refresh_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(key) = self.key() else {
            let mut state = self.write_state();
            state.items.clear();
            state.is_loading = false;
            state.error = None;
            drop(state);
            self.bump_generation();
            return;
        };

        self.write_state().is_loading = true;
        let result = self.source.list(&key).await;

        let latest = self.refresh_ticket.load(Ordering::SeqCst);
        if ticket != latest {
            debug!(resource = S::NAME, ticket, latest, "discarding superseded refresh");
            return;
        }

        let mut state = self.write_state();
        state.is_loading = false;
        match result {
            Ok(items) => {
                debug!(resource = S::NAME, count = items.len(), "refreshed");
                state.items = items;
                state.error = None;
                drop(state);
                self.bump_generation();
            }
            Err(e) => {
                debug!(resource = S::NAME, error = %e, "refresh failed, keeping previous items");
                state.error = Some(e.with_context(Self::context("refresh")));
            }
        }
    }

    fn record_error(&self, error: LiftlogError) -> LiftlogError {
        self.write_state().error = Some(error.clone());
        error
    }

    fn require_key(&self, operation: &str) -> LiftlogResult<S::Key> {
        self.key().ok_or_else(|| {
            self.record_error(LiftlogError::Unauthenticated.with_context(Self::context(operation)))
        })
    }

    /// Create a record for the current key, then refetch so server-assigned
    /// fields show up. Failures are recorded and returned.
    pub async fn create(&self, input: &S::Input) -> LiftlogResult<()> {
        let key = self.require_key("create")?;
        match self.source.create(&key, input).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(e.with_context(Self::context("create")))),
        }
    }

    /// Update one record, then refetch. Failures are recorded and returned.
    pub async fn update(&self, id: u64, input: &S::Input) -> LiftlogResult<()> {
        match self.source.update(id, input).await {
            Ok(()) => {
                self.refresh().await;
                Ok(())
            }
            Err(e) => Err(self.record_error(
                e.with_context(Self::context("update").with_record_id(id)),
            )),
        }
    }

    /// Delete a record. It leaves the collection only after the backend
    /// confirms; on failure the collection is untouched and the error is
    /// recorded and returned.
    pub async fn delete(&self, id: u64) -> LiftlogResult<()>
    where
        S::Item: Record,
    {
        match self.source.delete(id).await {
            Ok(()) => {
                // A list requested before the delete may still hold the record.
                self.refresh_ticket.fetch_add(1, Ordering::SeqCst);
                let mut state = self.write_state();
                state.items.retain(|item| item.id() != id);
                state.is_loading = false;
                state.error = None;
                drop(state);
                self.bump_generation();
                debug!(resource = S::NAME, id, "deleted");
                Ok(())
            }
            Err(e) => Err(self.record_error(
                e.with_context(Self::context("delete").with_record_id(id)),
            )),
        }
    }

    // ---- detail --------------------------------------------------------

    /// Load one record's detail into the detail slot, replacing whatever
    /// was selected. The collection is not touched.
    pub async fn fetch_details(&self, id: u64) {
        let ticket = self.detail_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut slot = self.write_detail();
            slot.selected = Some(id);
            slot.value = None;
            slot.is_loading = true;
            slot.error = None;
        }

        let result = self.source.details(id).await;

        if ticket != self.detail_ticket.load(Ordering::SeqCst) {
            debug!(resource = S::NAME, id, "discarding superseded detail");
            return;
        }

        let mut slot = self.write_detail();
        slot.is_loading = false;
        match result {
            Ok(detail) => slot.value = Some(detail),
            Err(e) => {
                slot.error =
                    Some(e.with_context(Self::context("details").with_record_id(id)))
            }
        }
    }

    /// Close the detail view. An in-flight detail fetch is discarded.
    pub fn clear_details(&self) {
        self.detail_ticket.fetch_add(1, Ordering::SeqCst);
        *self.write_detail() = DetailSlot::default();
    }
}
