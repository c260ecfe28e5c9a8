//! Exercise catalog records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::wire::{
    category_names, lenient_id, lenient_id_or_zero, lenient_string, lenient_u32,
    lenient_visibility,
};
use super::Record;
use crate::error::ValidationError;

/// The fixed category catalog. `All` exists only as a filter choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    All,
    Chest,
    Back,
    Legs,
    Arms,
    Shoulders,
    Other,
}

impl Category {
    /// Every category, `All` first.
    pub const CATALOG: [Category; 7] = [
        Category::All,
        Category::Chest,
        Category::Back,
        Category::Legs,
        Category::Arms,
        Category::Shoulders,
        Category::Other,
    ];

    /// Categories a record can actually carry (everything but `All`).
    pub fn assignable() -> &'static [Category] {
        &Self::CATALOG[1..]
    }

    pub fn id(&self) -> u64 {
        match self {
            Category::All => 0,
            Category::Chest => 1,
            Category::Back => 2,
            Category::Legs => 3,
            Category::Arms => 4,
            Category::Shoulders => 5,
            Category::Other => 6,
        }
    }

    pub fn from_id(id: u64) -> Option<Category> {
        Self::CATALOG.iter().copied().find(|c| c.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::All => "All",
            Category::Chest => "Chest",
            Category::Back => "Back",
            Category::Legs => "Legs",
            Category::Arms => "Arms",
            Category::Shoulders => "Shoulders",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::CATALOG
            .iter()
            .copied()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "category",
                message: format!("unknown category '{}'", s),
            })
    }
}

/// Who can see an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Private => "private",
            Visibility::Public => "public",
        }
    }
}

/// An exercise as listed by `/exercises/{username}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Exercise {
    #[serde(deserialize_with = "lenient_id")]
    pub id: u64,
    #[serde(default, alias = "nombre", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(
        default,
        alias = "visibilidad",
        deserialize_with = "lenient_visibility"
    )]
    pub visibility: Visibility,
    #[serde(
        default,
        rename = "category",
        alias = "categories",
        alias = "categorias",
        deserialize_with = "category_names"
    )]
    pub categories: Vec<String>,
    #[serde(default, alias = "musculos", deserialize_with = "category_names")]
    pub muscles: Vec<String>,
}

impl Exercise {
    /// True if the exercise carries `category` (by name, case-insensitive).
    /// `All` matches everything.
    pub fn in_category(&self, category: Category) -> bool {
        category == Category::All
            || self
                .categories
                .iter()
                .any(|c| c.eq_ignore_ascii_case(category.name()))
    }
}

impl Record for Exercise {
    fn id(&self) -> u64 {
        self.id
    }
}

/// Body for creating or updating an exercise. The owner's username is
/// attached by the store on create.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExerciseInput {
    pub name: String,
    pub visibility: Visibility,
    /// Muscle ids.
    pub muscles: Vec<u64>,
    /// Category ids from [`Category`].
    #[serde(rename = "category")]
    pub categories: Vec<u64>,
}

impl ExerciseInput {
    /// Pre-fill a form from an existing record. Unknown category names are
    /// dropped.
    pub fn from_exercise(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            visibility: exercise.visibility,
            muscles: Vec::new(),
            categories: exercise
                .categories
                .iter()
                .filter_map(|name| name.parse::<Category>().ok())
                .filter(|c| *c != Category::All)
                .map(|c| c.id())
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        if self.categories.is_empty() {
            return Err(ValidationError::MissingField { field: "category" });
        }
        if let Some(bad) = self
            .categories
            .iter()
            .find(|id| !matches!(Category::from_id(**id), Some(c) if c != Category::All))
        {
            return Err(ValidationError::OutOfRange {
                field: "category",
                message: format!("unknown category id {}", bad),
            });
        }
        Ok(())
    }
}

/// Server-side aggregate from `/exercises/mostused/{userId}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MostUsedExercise {
    #[serde(default, alias = "ejercicio_id", alias = "exerciseId", deserialize_with = "lenient_id_or_zero")]
    pub exercise_id: u64,
    #[serde(alias = "ejercicio", alias = "nombre", alias = "name")]
    pub exercise: String,
    #[serde(default, alias = "veces_realizado", alias = "count", deserialize_with = "lenient_u32")]
    pub times_performed: u32,
}

impl Record for MostUsedExercise {
    fn id(&self) -> u64 {
        self.exercise_id
    }
}
