//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use liftlog::adapters::{MockHttpClient, MockResponse};
use liftlog::api::FitnessApi;
use liftlog::state::SessionStore;
use serde_json::{json, Value};
use std::sync::Arc;

pub const BASE: &str = "http://api.test";

pub fn url(path: &str) -> String {
    format!("{}{}", BASE, path)
}

/// A mock backend where `/api/me` reports the given user.
pub fn signed_in(id: u64, username: &str, admin: bool) -> MockHttpClient {
    let mock = MockHttpClient::new();
    mock.set_response(
        &url("/api/me"),
        MockResponse::json(json!({"user": {"id": id, "username": username, "admin": admin}})),
    );
    mock
}

pub fn signed_out() -> MockHttpClient {
    let mock = MockHttpClient::new();
    mock.set_response(&url("/api/me"), MockResponse::status(401));
    mock
}

pub fn api(mock: &MockHttpClient) -> FitnessApi<MockHttpClient> {
    FitnessApi::new(BASE, mock.clone())
}

pub fn session(mock: &MockHttpClient) -> Arc<SessionStore<MockHttpClient>> {
    Arc::new(SessionStore::new(api(mock)))
}

pub fn exercise_rows(n: u64, category: &str) -> Value {
    let rows: Vec<_> = (1..=n)
        .map(|id| json!({"id": id, "name": format!("Exercise {}", id), "category": [category]}))
        .collect();
    json!({ "results": rows })
}

pub fn workout_rows(ids: &[u64]) -> Value {
    let rows: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "nombre": format!("Workout {}", id), "fecha": "2024-05-01"}))
        .collect();
    json!({ "results": rows })
}

pub fn workout_detail(id: u64, lines: &[(f64, f64, f64)]) -> Value {
    let entries: Vec<_> = lines
        .iter()
        .map(|(peso, reps, series)| json!({"peso": peso, "repeticiones": reps, "series": series}))
        .collect();
    json!({"id": id, "ejercicios": entries})
}
