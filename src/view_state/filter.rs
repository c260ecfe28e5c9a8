//! Category filter for the exercise list.

use crate::models::{Category, Exercise};

/// Active category filter; [`Category::All`] passes everything through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryFilter {
    selected: Category,
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self {
            selected: Category::All,
        }
    }
}

impl CategoryFilter {
    pub fn new(selected: Category) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> Category {
        self.selected
    }

    pub fn set(&mut self, category: Category) {
        self.selected = category;
    }

    /// Exercises carrying the selected category, in their original order.
    pub fn apply<'a>(&self, exercises: &'a [Exercise]) -> Vec<&'a Exercise> {
        exercises
            .iter()
            .filter(|e| e.in_category(self.selected))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(id: u64, categories: &[&str]) -> Exercise {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": format!("e{}", id),
            "category": categories,
        }))
        .unwrap()
    }

    #[test]
    fn test_all_returns_everything() {
        let list = vec![exercise(1, &["Chest"]), exercise(2, &[]), exercise(3, &["Legs"])];
        let filtered = CategoryFilter::default().apply(&list);
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().zip(&list).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_filters_by_category_name() {
        let list = vec![
            exercise(1, &["Chest", "Arms"]),
            exercise(2, &["Legs"]),
            exercise(3, &["arms"]),
        ];
        let ids: Vec<u64> = CategoryFilter::new(Category::Arms)
            .apply(&list)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}
