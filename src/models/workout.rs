//! Workout sessions and their exercise lines.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::wire::{lenient_f64, lenient_id, lenient_id_or_zero, lenient_string, lenient_u32};
use super::Record;
use crate::error::ValidationError;

/// Highest star rating a workout can carry.
pub const MAX_RATING: u32 = 5;

/// Render a backend date as `YYYY-MM-DD`.
///
/// Accepts RFC 3339 timestamps and plain dates; anything else is returned
/// unchanged, and a missing date renders as `N/A`.
pub fn format_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return "N/A".to_string();
    };
    parse_date(raw)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// A workout as listed by `/workouts/{userId}` and `/recentworkouts/{userId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Workout {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(default, alias = "nombre", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(default, alias = "valoracion", deserialize_with = "lenient_u32")]
    pub rating: u32,
    #[serde(default, alias = "comentarios")]
    pub comments: Option<String>,
    #[serde(default, alias = "numero_ejercicios", deserialize_with = "lenient_u32")]
    pub exercise_count: u32,
}

impl Workout {
    pub fn formatted_date(&self) -> String {
        format_date(self.date.as_deref())
    }

    /// Rating clamped to the star scale.
    pub fn stars(&self) -> u32 {
        self.rating.min(MAX_RATING)
    }
}

impl Record for Workout {
    fn id(&self) -> u64 {
        self.id
    }
}

/// One exercise line inside a workout detail.
///
/// Numeric fields stay `None` when the backend omits them or sends
/// something unparseable; consumers treat `None` as zero.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ExerciseEntry {
    #[serde(default, deserialize_with = "lenient_id_or_zero")]
    pub id: u64,
    #[serde(default, alias = "nombre", alias = "ejercicio_nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "peso", deserialize_with = "lenient_f64")]
    pub weight: Option<f64>,
    #[serde(default, alias = "repeticiones", deserialize_with = "lenient_f64")]
    pub reps: Option<f64>,
    #[serde(default, alias = "series", deserialize_with = "lenient_f64")]
    pub sets: Option<f64>,
    #[serde(default, alias = "rm_estimado", deserialize_with = "lenient_f64")]
    pub estimated_one_rep_max: Option<f64>,
}

impl ExerciseEntry {
    /// `weight * reps * sets`, each missing factor counted as zero.
    pub fn volume(&self) -> f64 {
        self.weight.unwrap_or(0.0) * self.reps.unwrap_or(0.0) * self.sets.unwrap_or(0.0)
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed exercise")
    }
}

/// `/workouts/details/{id}` body.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WorkoutDetail {
    #[serde(default, deserialize_with = "lenient_id_or_zero")]
    pub id: u64,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "fecha")]
    pub date: Option<String>,
    #[serde(default, alias = "valoracion", deserialize_with = "lenient_u32")]
    pub rating: u32,
    #[serde(default, alias = "comentarios")]
    pub comments: Option<String>,
    #[serde(default, alias = "ejercicios")]
    pub exercises: Vec<ExerciseEntry>,
}

impl WorkoutDetail {
    pub fn formatted_date(&self) -> String {
        format_date(self.date.as_deref())
    }

    /// Sum of every line's volume.
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseEntry::volume).sum()
    }
}

/// One exercise line in the create-workout form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutExerciseInput {
    #[serde(rename = "ejercicioId")]
    pub exercise_id: u64,
    #[serde(rename = "peso")]
    pub weight: f64,
    #[serde(rename = "repeticiones")]
    pub reps: u32,
    #[serde(rename = "series")]
    pub sets: u32,
}

/// Body for creating a workout. The user id is attached by the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WorkoutInput {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "fecha")]
    pub date: String,
    #[serde(rename = "valoracion")]
    pub rating: u32,
    #[serde(rename = "comentarios", skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(rename = "ejercicios")]
    pub exercises: Vec<WorkoutExerciseInput>,
}

impl WorkoutInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::require("date", &self.date)?;
        if parse_date(self.date.trim()).is_none() {
            return Err(ValidationError::OutOfRange {
                field: "date",
                message: format!("'{}' is not a date", self.date),
            });
        }
        if self.rating > MAX_RATING {
            return Err(ValidationError::OutOfRange {
                field: "rating",
                message: format!("{} is above {}", self.rating, MAX_RATING),
            });
        }
        if self.exercises.is_empty() {
            return Err(ValidationError::MissingField { field: "exercises" });
        }
        if let Some(line) = self
            .exercises
            .iter()
            .find(|line| !line.weight.is_finite() || line.weight < 0.0)
        {
            return Err(ValidationError::OutOfRange {
                field: "weight",
                message: format!("{} is not a valid weight", line.weight),
            });
        }
        Ok(())
    }
}
