//! Assessment wizard state machine.
//!
//! The wizard is a linear stepper. Every user action is an [`Event`] and
//! [`transition`] maps the current state and an event to the next state,
//! plus the submitted profile when the final step completes.

use serde::{Deserialize, Serialize};

use super::models::{
    Draft, FoodEntry, Gender, HealthProfile, MealSlot, SmokingFrequency, SmokingStatus, Step,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "draft", rename_all = "snake_case")]
pub enum WizardState {
    Closed,
    Open(Draft),
}

impl WizardState {
    pub fn draft(&self) -> Option<&Draft> {
        match self {
            Self::Open(draft) => Some(draft),
            Self::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }
}

/// User action applied to the wizard.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Open,
    Next,
    Back,
    /// Completes the wizard on the final step; acts as `Next` before it.
    Submit,
    Close,
    FieldChanged { change: FieldChange },
}

/// A single edit to the draft.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FieldChange {
    Age(i32),
    Gender(Option<Gender>),
    Bmi(f64),
    CurrentWeight(f64),
    SmokingStatus(Option<SmokingStatus>),
    SmokingFrequency(Option<SmokingFrequency>),
    AlcoholConsumption(i32),
    ToggleMeal(MealSlot),
    AddFoodRow(MealSlot),
    RemoveFoodRow { meal: MealSlot, row: usize },
    FoodName { meal: MealSlot, row: usize, name: String },
    FoodQuantity { meal: MealSlot, row: usize, quantity: String },
    FoodSelected { meal: MealSlot, row: usize, name: String, id: String },
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: WizardState,
    pub submitted: Option<HealthProfile>,
}

impl Transition {
    fn to(state: WizardState) -> Self {
        Self {
            state,
            submitted: None,
        }
    }
}

/// Whether the draft satisfies the validator for `step`.
pub fn can_advance(step: Step, draft: &Draft) -> bool {
    match step {
        Step::Age => draft.age > 0 && draft.age < 120,
        Step::Gender => draft.gender.is_some(),
        Step::Bmi => (15.0..=50.0).contains(&draft.bmi),
        Step::Weight => (30.0..=200.0).contains(&draft.current_weight),
        Step::Lifestyle => draft.smoking_status.is_some() && draft.alcohol_consumption >= 0,
        Step::Meals => !draft.meal_preferences.is_empty(),
    }
}

/// Apply `event` to `state`.
pub fn transition(state: WizardState, event: Event) -> Transition {
    let open = match (state, event) {
        (_, Event::Open) => return Transition::to(WizardState::Open(Draft::default())),
        (WizardState::Closed, _) => return Transition::to(WizardState::Closed),
        (WizardState::Open(_), Event::Close) => return Transition::to(WizardState::Closed),
        (WizardState::Open(draft), event) => (draft, event),
    };

    match open {
        (draft, Event::Next) => Transition::to(WizardState::Open(advance(draft))),
        (draft, Event::Back) => match draft.step.prev() {
            Some(step) => Transition::to(WizardState::Open(Draft { step, ..draft })),
            None => Transition::to(WizardState::Closed),
        },
        (draft, Event::Submit) if !draft.step.is_last() => {
            Transition::to(WizardState::Open(advance(draft)))
        }
        (draft, Event::Submit) => {
            if can_advance(draft.step, &draft) {
                let profile = HealthProfile::from_draft(&draft);
                tracing::debug!(meals = profile.api_data.meals.len(), "Assessment submitted");
                Transition {
                    state: WizardState::Closed,
                    submitted: Some(profile),
                }
            } else {
                Transition::to(WizardState::Open(draft))
            }
        }
        (mut draft, Event::FieldChanged { change }) => {
            apply_change(&mut draft, change);
            Transition::to(WizardState::Open(draft))
        }
        (draft, Event::Open | Event::Close) => Transition::to(WizardState::Open(draft)),
    }
}

fn advance(draft: Draft) -> Draft {
    if can_advance(draft.step, &draft) {
        Draft {
            step: draft.step.next(),
            ..draft
        }
    } else {
        draft
    }
}

fn apply_change(draft: &mut Draft, change: FieldChange) {
    match change {
        FieldChange::Age(age) => draft.age = age,
        FieldChange::Gender(gender) => draft.gender = gender,
        FieldChange::Bmi(bmi) => draft.bmi = bmi,
        FieldChange::CurrentWeight(weight) => draft.current_weight = weight,
        FieldChange::SmokingStatus(status) => {
            draft.smoking_status = status;
            if status != Some(SmokingStatus::CurrentSmoker) {
                draft.smoking_frequency = None;
            }
        }
        FieldChange::SmokingFrequency(freq) => draft.smoking_frequency = freq,
        FieldChange::AlcoholConsumption(drinks) => draft.alcohol_consumption = drinks,
        FieldChange::ToggleMeal(meal) => {
            if !draft.meal_preferences.remove(&meal) {
                draft.meal_preferences.insert(meal);
                let rows = draft.meal_food_list.entry(meal).or_default();
                if rows.is_empty() {
                    rows.push(FoodEntry::default());
                }
            }
        }
        FieldChange::AddFoodRow(meal) => {
            draft.meal_food_list.entry(meal).or_default().push(FoodEntry::default());
        }
        FieldChange::RemoveFoodRow { meal, row } => {
            if let Some(rows) = draft.meal_food_list.get_mut(&meal) {
                if row < rows.len() {
                    rows.remove(row);
                }
            }
        }
        FieldChange::FoodName { meal, row, name } => {
            if let Some(entry) = draft.food_entry_mut(meal, row) {
                // A retyped name no longer matches the chosen catalog item
                entry.id.clear();
                entry.name = name;
            }
        }
        FieldChange::FoodQuantity { meal, row, quantity } => {
            if let Some(entry) = draft.food_entry_mut(meal, row) {
                entry.quantity = quantity;
            }
        }
        FieldChange::FoodSelected { meal, row, name, id } => {
            if let Some(entry) = draft.food_entry_mut(meal, row) {
                entry.name = name;
                entry.id = id;
            }
        }
    }
}
