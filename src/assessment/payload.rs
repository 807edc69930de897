//! Builds the submitted health profile and its nutrient API payload.

use std::collections::BTreeMap;

use super::models::{ApiData, Draft, HealthProfile, MealItem, SmokingStatus};

/// Quantities are always sent in grams.
const UNIT: &str = "g";

impl HealthProfile {
    /// Flatten a draft into a profile, keeping only complete food rows.
    pub fn from_draft(draft: &Draft) -> Self {
        let sex = draft.gender.map(|g| g.sex()).unwrap_or_default();

        // Frequency only means something for current smokers
        let smoking_frequency = match draft.smoking_status {
            Some(SmokingStatus::CurrentSmoker) => draft.smoking_frequency,
            _ => None,
        };

        Self {
            age: draft.age,
            gender: draft.gender,
            bmi: draft.bmi,
            current_weight: draft.current_weight,
            smoking_status: draft.smoking_status,
            smoking_frequency,
            alcohol_consumption: draft.alcohol_consumption,
            meal_preferences: draft.meal_preferences.clone(),
            meal_food_list: draft.meal_food_list.clone(),
            api_data: ApiData {
                sex,
                age: draft.age,
                meals: build_meals(draft),
            },
        }
    }
}

/// Meal key -> complete food items, for every selected meal slot.
pub fn build_meals(draft: &Draft) -> BTreeMap<String, Vec<MealItem>> {
    draft
        .meal_preferences
        .iter()
        .map(|meal| {
            let items = draft
                .meal_food_list
                .get(meal)
                .map(|rows| {
                    rows.iter()
                        .filter(|entry| entry.is_complete())
                        .map(|entry| MealItem {
                            public_food_key: entry.id.trim().to_string(),
                            quantity: parse_quantity(&entry.quantity),
                            unit: UNIT.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            (meal.key(), items)
        })
        .collect()
}

/// Leading integer of a typed quantity ("50g" -> 50). Anything that does
/// not start with a number, or parses to zero, counts as 1. Digit runs too
/// long for an `i64` saturate at its bounds.
pub fn parse_quantity(raw: &str) -> i64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    let digits = &digits[..end];
    if digits.is_empty() {
        return 1;
    }

    // Only overflow can fail here
    let n = match digits.parse::<i64>() {
        Ok(n) => sign * n,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    };
    if n == 0 {
        1
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::models::{FoodEntry, Gender, MealSlot, SmokingFrequency};

    fn entry(name: &str, quantity: &str, id: &str) -> FoodEntry {
        FoodEntry {
            name: name.into(),
            quantity: quantity.into(),
            id: id.into(),
        }
    }

    #[test]
    fn test_incomplete_rows_dropped() {
        let mut draft = Draft::default();
        draft.meal_preferences.insert(MealSlot::Breakfast);
        draft.meal_food_list.insert(
            MealSlot::Breakfast,
            vec![entry("Oats", "50", "F1"), entry("", "", "")],
        );

        let profile = HealthProfile::from_draft(&draft);
        let breakfast = &profile.api_data.meals["breakfast"];

        assert_eq!(
            breakfast,
            &vec![MealItem {
                public_food_key: "F1".into(),
                quantity: 50,
                unit: "g".into(),
            }]
        );
    }

    #[test]
    fn test_unselected_meals_skipped() {
        let mut draft = Draft::default();
        draft.meal_preferences.insert(MealSlot::EveningSnacks);
        draft
            .meal_food_list
            .insert(MealSlot::Lunch, vec![entry("Rice", "100", "F9")]);

        let meals = build_meals(&draft);

        assert_eq!(meals.len(), 1);
        assert!(meals["evening_snacks"].is_empty());
        assert!(!meals.contains_key("lunch"));
    }

    #[test]
    fn test_sex_lowercased() {
        let draft = Draft {
            gender: Some(Gender::Male),
            ..Draft::default()
        };
        assert_eq!(HealthProfile::from_draft(&draft).api_data.sex, "male");
    }

    #[test]
    fn test_frequency_only_for_current_smokers() {
        let draft = Draft {
            smoking_status: Some(SmokingStatus::ExSmoker),
            smoking_frequency: Some(SmokingFrequency::Daily),
            ..Draft::default()
        };
        assert_eq!(HealthProfile::from_draft(&draft).smoking_frequency, None);

        let draft = Draft {
            smoking_status: Some(SmokingStatus::CurrentSmoker),
            ..draft
        };
        assert_eq!(
            HealthProfile::from_draft(&draft).smoking_frequency,
            Some(SmokingFrequency::Daily)
        );
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("50"), 50);
        assert_eq!(parse_quantity(" 120g"), 120);
        assert_eq!(parse_quantity("2.5"), 2);
        assert_eq!(parse_quantity("abc"), 1);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-3"), -3);
        assert_eq!(parse_quantity(""), 1);
    }

    #[test]
    fn test_parse_quantity_saturates() {
        assert_eq!(parse_quantity("99999999999999999999g"), i64::MAX);
        assert_eq!(parse_quantity("-99999999999999999999"), i64::MIN);
        assert_eq!(parse_quantity("9223372036854775807"), i64::MAX);
    }
}
