//! Data types for the health assessment wizard.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Wizard step, in the order the user walks through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Age,
    Gender,
    Bmi,
    Weight,
    Lifestyle,
    Meals,
}

impl Step {
    /// All steps in order.
    pub const ALL: [Step; 6] = [
        Step::Age,
        Step::Gender,
        Step::Bmi,
        Step::Weight,
        Step::Lifestyle,
        Step::Meals,
    ];

    /// Zero-based position of this step.
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn is_last(self) -> bool {
        self == Step::Meals
    }

    /// Following step, saturating at the last one.
    pub fn next(self) -> Step {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Step::Meals)
    }

    /// Preceding step, or `None` on the first one.
    pub fn prev(self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    #[serde(rename = "Non-binary")]
    NonBinary,
    #[serde(rename = "Prefer not to say")]
    PreferNotToSay,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::NonBinary => "Non-binary",
            Self::PreferNotToSay => "Prefer not to say",
        }
    }

    /// Lowercased label, as sent in `sex` fields.
    pub fn sex(self) -> String {
        self.label().to_lowercase()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmokingStatus {
    #[serde(rename = "Never Smoked")]
    NeverSmoked,
    #[serde(rename = "Ex-Smoker")]
    ExSmoker,
    #[serde(rename = "Current Smoker")]
    CurrentSmoker,
}

impl SmokingStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NeverSmoked => "Never Smoked",
            Self::ExSmoker => "Ex-Smoker",
            Self::CurrentSmoker => "Current Smoker",
        }
    }
}

/// How often a current smoker smokes.
///
/// The form displays these with a " per week" suffix; parsing strips it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SmokingFrequency {
    OneToTwoDays,
    ThreeToSixDays,
    Daily,
}

impl SmokingFrequency {
    pub fn label(self) -> &'static str {
        match self {
            Self::OneToTwoDays => "1-2 days",
            Self::ThreeToSixDays => "3-6 days",
            Self::Daily => "Daily",
        }
    }

    /// Label as shown to the user: "1-2 days per week", but just "Daily".
    pub fn display_label(self) -> String {
        match self {
            Self::Daily => self.label().to_string(),
            _ => format!("{} per week", self.label()),
        }
    }
}

impl FromStr for SmokingFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = trimmed.strip_suffix(" per week").unwrap_or(trimmed);
        match value {
            "1-2 days" => Ok(Self::OneToTwoDays),
            "3-6 days" => Ok(Self::ThreeToSixDays),
            "Daily" => Ok(Self::Daily),
            other => Err(format!("unknown smoking frequency: {other}")),
        }
    }
}

impl TryFrom<String> for SmokingFrequency {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SmokingFrequency> for String {
    fn from(value: SmokingFrequency) -> Self {
        value.label().to_string()
    }
}

/// Meal slot a user can log food against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealSlot {
    Breakfast,
    Brunch,
    Lunch,
    Dinner,
    #[serde(rename = "Evening Snacks")]
    EveningSnacks,
}

impl MealSlot {
    pub fn label(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Brunch => "Brunch",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::EveningSnacks => "Evening Snacks",
        }
    }

    /// Normalized key used in the nutrient API payload (`evening_snacks`).
    pub fn key(self) -> String {
        self.label().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One food row as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    /// Food catalog key, set when a suggestion is chosen
    #[serde(default)]
    pub id: String,
}

impl FoodEntry {
    /// Rows missing any of name, quantity or catalog key are left out of submissions.
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.quantity.trim().is_empty() && !self.id.trim().is_empty()
    }
}

/// Working copy of the assessment, owned by the wizard while it is open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Draft {
    pub step: Step,
    pub age: i32,
    pub gender: Option<Gender>,
    pub bmi: f64,
    pub current_weight: f64,
    pub smoking_status: Option<SmokingStatus>,
    pub smoking_frequency: Option<SmokingFrequency>,
    /// Standard drinks per week
    pub alcohol_consumption: i32,
    pub meal_preferences: BTreeSet<MealSlot>,
    pub meal_food_list: BTreeMap<MealSlot, Vec<FoodEntry>>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            step: Step::Age,
            age: 23,
            gender: Some(Gender::Male),
            bmi: 22.0,
            current_weight: 70.0,
            smoking_status: None,
            smoking_frequency: None,
            alcohol_consumption: 0,
            meal_preferences: BTreeSet::new(),
            meal_food_list: BTreeMap::new(),
        }
    }
}

impl Draft {
    pub fn food_entry_mut(&mut self, meal: MealSlot, row: usize) -> Option<&mut FoodEntry> {
        self.meal_food_list.get_mut(&meal).and_then(|rows| rows.get_mut(row))
    }
}

/// One food item in the nutrient API payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealItem {
    pub public_food_key: String,
    pub quantity: i64,
    pub unit: String,
}

/// Payload shape expected by the nutrient intake API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiData {
    pub sex: String,
    pub age: i32,
    pub meals: BTreeMap<String, Vec<MealItem>>,
}

/// Immutable snapshot produced when the wizard is submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthProfile {
    pub age: i32,
    pub gender: Option<Gender>,
    pub bmi: f64,
    pub current_weight: f64,
    pub smoking_status: Option<SmokingStatus>,
    pub smoking_frequency: Option<SmokingFrequency>,
    pub alcohol_consumption: i32,
    pub meal_preferences: BTreeSet<MealSlot>,
    pub meal_food_list: BTreeMap<MealSlot, Vec<FoodEntry>>,
    pub api_data: ApiData,
}

impl HealthProfile {
    /// Whether the profile has everything the health detail page needs.
    pub fn is_complete(&self) -> bool {
        self.age > 0
            && self.age < 120
            && self.gender.is_some()
            && self.smoking_status.is_some()
            && !self.api_data.sex.is_empty()
            && !self.api_data.meals.is_empty()
    }
}
