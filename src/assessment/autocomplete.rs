//! Food name autocomplete for the meal step.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::models::MealSlot;

/// Most suggestions shown for one input.
const MAX_SUGGESTIONS: usize = 10;

/// Entry in the food catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodItem {
    pub food_name: String,
    pub public_food_key: String,
}

/// Identifies one food-name input: a meal slot and the row within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SuggestionKey {
    pub meal: MealSlot,
    pub row: usize,
}

impl fmt::Display for SuggestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.meal.key(), self.row)
    }
}

/// Catalog items whose name contains `query`, ignoring case.
///
/// Queries of one character or less produce nothing.
pub fn filter_catalog(catalog: &[FoodItem], query: &str) -> Vec<FoodItem> {
    let query = query.trim();
    if query.chars().count() <= 1 {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    catalog
        .iter()
        .filter(|item| item.food_name.to_lowercase().contains(&needle))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

/// Open suggestion lists, one per input key.
#[derive(Debug, Default)]
pub struct SuggestionBoard {
    lists: HashMap<SuggestionKey, Vec<FoodItem>>,
}

impl SuggestionBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh the list for `key` after a keystroke. Other keys are untouched.
    pub fn on_input(&mut self, key: SuggestionKey, query: &str, catalog: &[FoodItem]) -> Vec<FoodItem> {
        let matches = filter_catalog(catalog, query);
        if matches.is_empty() {
            self.lists.remove(&key);
        } else {
            self.lists.insert(key, matches.clone());
        }
        matches
    }

    pub fn get(&self, key: &SuggestionKey) -> Option<&[FoodItem]> {
        self.lists.get(key).map(Vec::as_slice)
    }

    /// Close the list for `key`, returning what it held.
    pub fn take(&mut self, key: &SuggestionKey) -> Option<Vec<FoodItem>> {
        self.lists.remove(key)
    }

    /// Close every list whose input is not `target`.
    pub fn close_except(&mut self, target: Option<&SuggestionKey>) {
        self.lists.retain(|key, _| Some(key) == target);
    }

    pub fn clear(&mut self) {
        self.lists.clear();
    }

    /// Open lists keyed by their display form (`breakfast-0`).
    pub fn open_lists(&self) -> HashMap<String, Vec<FoodItem>> {
        self.lists
            .iter()
            .map(|(key, items)| (key.to_string(), items.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}
