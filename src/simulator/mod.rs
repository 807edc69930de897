//! Lifestyle simulator.
//!
//! Scores six lifestyle sliders with a fixed heuristic and compares the live
//! scores against one saved snapshot.

mod heuristic;
mod models;
mod routes;
mod state;

pub use heuristic::{compare, predict};
pub use models::{
    ComparisonSnapshot, FieldDelta, InputError, LifestyleInputs, PredictionComparison,
    PredictionSnapshot, Slider, Trend,
};
pub use routes::router;
pub use state::Simulator;
