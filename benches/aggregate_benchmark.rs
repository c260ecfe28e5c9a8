//! Benchmarks for the synchronous derivations a page recomputes on every
//! render: totals over workout details, and category filter plus pagination.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use liftlog::models::{Category, Exercise, WorkoutDetail};
use liftlog::state::Totals;
use liftlog::view_state::{CategoryFilter, Paginator};
use serde_json::json;

const CATEGORIES: [&str; 6] = ["Chest", "Back", "Legs", "Arms", "Shoulders", "Other"];

fn generate_details(workouts: usize, lines: usize) -> Vec<WorkoutDetail> {
    (0..workouts)
        .map(|id| {
            let entries: Vec<_> = (0..lines)
                .map(|i| json!({"peso": 20 + i * 5, "repeticiones": 8, "series": 3}))
                .collect();
            serde_json::from_value(json!({"id": id, "ejercicios": entries}))
                .expect("valid workout detail")
        })
        .collect()
}

fn generate_exercises(count: usize) -> Vec<Exercise> {
    (0..count)
        .map(|id| {
            let category = CATEGORIES[id % CATEGORIES.len()];
            serde_json::from_value(json!({
                "id": id,
                "name": format!("Exercise {}", id),
                "category": [category]
            }))
            .expect("valid exercise")
        })
        .collect()
}

fn bench_totals(c: &mut Criterion) {
    let mut group = c.benchmark_group("totals_from_entries");

    for workouts in [6, 50, 500].iter() {
        let details = generate_details(*workouts, 8);
        group.throughput(Throughput::Elements((*workouts * 8) as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_workouts", workouts)),
            &details,
            |b, details| {
                b.iter(|| {
                    let totals =
                        Totals::from_entries(details.iter().flat_map(|d| d.exercises.iter()));
                    black_box(totals)
                });
            },
        );
    }

    group.finish();
}

fn bench_filter_and_paginate(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_and_paginate");

    for count in [25, 250, 2500].iter() {
        let exercises = generate_exercises(*count);
        let filter = CategoryFilter::new(Category::Legs);
        let mut pager = Paginator::new(12);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_exercises", count)),
            &exercises,
            |b, exercises| {
                b.iter(|| {
                    let filtered = filter.apply(black_box(exercises));
                    pager.go_to(2, filtered.len());
                    black_box(pager.slice(&filtered).len())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_totals, bench_filter_and_paginate);

criterion_main!(benches);
