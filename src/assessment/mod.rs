//! Health assessment wizard.
//!
//! Collects demographics, lifestyle and meal information across six steps,
//! validating each step before it can be left, and turns the finished draft
//! into a [`HealthProfile`] for the analysis pages.

mod autocomplete;
mod listener;
mod machine;
mod models;
mod payload;
mod routes;
mod session;

pub use autocomplete::{filter_catalog, FoodItem, SuggestionBoard, SuggestionKey};
pub use listener::{ListenerGuard, PointerDown, PointerHub};
pub use machine::{can_advance, transition, Event, FieldChange, Transition, WizardState};
pub use models::{
    ApiData, Draft, FoodEntry, Gender, HealthProfile, MealItem, MealSlot, SmokingFrequency,
    SmokingStatus, Step,
};
pub use payload::{build_meals, parse_quantity};
pub use routes::router;
pub use session::{PageSession, SessionView, WizardSession};
