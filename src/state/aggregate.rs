//! Client-side totals derived from a workout collection.
//!
//! The list view of a workout does not carry its exercise lines, so the
//! totals need one detail request per workout. Requests run concurrently
//! and a failed one counts as zero instead of failing the whole total.

use futures::future::join_all;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

use super::resource::{ResourceSource, ResourceStore};
use crate::models::{ExerciseEntry, Record, Workout, WorkoutDetail};

/// Derived dashboard totals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of `weight * reps * sets` over every exercise line
    pub total_weight: f64,
    /// Number of exercise lines across all workouts
    pub total_exercises: usize,
}

impl Totals {
    /// Reduce a flattened list of exercise lines.
    pub fn from_entries<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ExerciseEntry>,
    {
        entries.into_iter().fold(Totals::default(), |acc, entry| Totals {
            total_weight: acc.total_weight + entry.volume(),
            total_exercises: acc.total_exercises + 1,
        })
    }
}

/// Fetch every workout's detail concurrently and reduce.
///
/// An empty slice returns zero totals without sending anything.
pub async fn compute_totals<S>(source: &S, workouts: &[Workout]) -> Totals
where
    S: ResourceSource<Detail = WorkoutDetail>,
{
    if workouts.is_empty() {
        return Totals::default();
    }

    let requests = workouts.iter().map(|workout| async move {
        match source.details(workout.id()).await {
            Ok(detail) => detail.exercises,
            Err(e) => {
                warn!(workout_id = workout.id(), error = %e, "workout detail failed, counting it as zero");
                Vec::new()
            }
        }
    });
    let details = join_all(requests).await;

    Totals::from_entries(details.iter().flatten())
}

#[derive(Debug, Default)]
struct Computed {
    /// Store generation the totals were computed from
    generation: Option<u64>,
    totals: Totals,
}

/// Keeps [`Totals`] in step with a workout store.
///
/// Reads the store, never writes it. Recomputes only when the store's
/// collection has changed since the last computation.
#[derive(Debug, Default)]
pub struct TotalsAggregator {
    computed: Mutex<Computed>,
}

impl TotalsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals as of the last recomputation.
    pub fn totals(&self) -> Totals {
        self.computed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .totals
    }

    /// Whether the totals reflect the store's current collection.
    pub fn is_current<S>(&self, store: &ResourceStore<S>) -> bool
    where
        S: ResourceSource,
    {
        self.computed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
            == Some(store.generation())
    }

    /// Recompute if the store's collection changed since last time.
    pub async fn sync<S>(&self, store: &ResourceStore<S>) -> Totals
    where
        S: ResourceSource<Item = Workout, Detail = WorkoutDetail>,
    {
        let snapshot = store.snapshot();
        if self.is_current(store) {
            return self.totals();
        }

        debug!(
            generation = snapshot.generation,
            workouts = snapshot.items.len(),
            "recomputing totals"
        );
        let totals = compute_totals(store.source(), &snapshot.items).await;

        let mut computed = self.computed.lock().unwrap_or_else(PoisonError::into_inner);
        // A slower, older computation must not overwrite a newer one.
        if computed.generation.map_or(true, |g| g <= snapshot.generation) {
            computed.generation = Some(snapshot.generation);
            computed.totals = totals;
        }
        computed.totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LiftlogError, LiftlogResult};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn workout(id: u64) -> Workout {
        serde_json::from_value(serde_json::json!({"id": id, "name": format!("w{}", id)})).unwrap()
    }

    fn entry(weight: f64, reps: f64, sets: f64) -> ExerciseEntry {
        ExerciseEntry {
            weight: Some(weight),
            reps: Some(reps),
            sets: Some(sets),
            ..Default::default()
        }
    }

    #[derive(Default)]
    struct DetailTable {
        details: HashMap<u64, Vec<ExerciseEntry>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResourceSource for DetailTable {
        type Key = u64;
        type Item = Workout;
        type Input = ();
        type Detail = WorkoutDetail;

        const NAME: &'static str = "workouts";

        async fn list(&self, _key: &u64) -> LiftlogResult<Vec<Workout>> {
            let mut ids: Vec<u64> = self.details.keys().copied().collect();
            ids.sort();
            Ok(ids.into_iter().map(workout).collect())
        }

        async fn details(&self, id: u64) -> LiftlogResult<WorkoutDetail> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.details.get(&id) {
                Some(exercises) => Ok(WorkoutDetail {
                    id,
                    exercises: exercises.clone(),
                    ..Default::default()
                }),
                None => Err(LiftlogError::server(404, "")),
            }
        }
    }

    #[tokio::test]
    async fn test_empty_collection_is_zero_without_requests() {
        let source = DetailTable::default();
        let totals = compute_totals(&source, &[]).await;
        assert_eq!(totals, Totals::default());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_workouts_sum_volume() {
        let mut source = DetailTable::default();
        source.details.insert(1, vec![entry(100.0, 5.0, 3.0)]);
        source.details.insert(2, vec![entry(50.0, 10.0, 2.0)]);

        let totals = compute_totals(&source, &[workout(1), workout(2)]).await;
        assert_eq!(totals.total_weight, 2500.0);
        assert_eq!(totals.total_exercises, 2);
    }

    #[tokio::test]
    async fn test_failed_detail_contributes_zero() {
        let mut source = DetailTable::default();
        source.details.insert(1, vec![entry(100.0, 5.0, 3.0), ExerciseEntry::default()]);

        let totals = compute_totals(&source, &[workout(1), workout(99)]).await;
        assert_eq!(totals.total_weight, 1500.0);
        assert_eq!(totals.total_exercises, 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_sync_recomputes_only_on_change() {
        let mut source = DetailTable::default();
        source.details.insert(1, vec![entry(10.0, 10.0, 1.0)]);
        let store = ResourceStore::new(source);
        let aggregator = TotalsAggregator::new();

        store.set_key(Some(7)).await;
        assert_eq!(aggregator.sync(&store).await.total_weight, 100.0);
        assert!(aggregator.is_current(&store));

        aggregator.sync(&store).await;
        assert_eq!(store.source().calls.load(Ordering::SeqCst), 1);

        store.refresh().await;
        assert!(!aggregator.is_current(&store));
        aggregator.sync(&store).await;
        assert_eq!(store.source().calls.load(Ordering::SeqCst), 2);
    }
}
