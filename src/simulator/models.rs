//! Data types for the lifestyle simulator.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Slider positions on the simulator page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LifestyleInputs {
    /// Exercise days per week
    pub exercise: f64,
    /// Cigarettes per day
    pub smoking: f64,
    /// Drinks per week
    pub alcohol: f64,
    /// Body weight in kg
    pub weight: f64,
    /// Sleep hours per night
    pub sleep: f64,
    /// Stress level, 1 (low) to 5 (high)
    pub stress: f64,
}

impl Default for LifestyleInputs {
    fn default() -> Self {
        Self {
            exercise: 2.0,
            smoking: 0.0,
            alcohol: 1.0,
            weight: 75.0,
            sleep: 7.0,
            stress: 3.0,
        }
    }
}

/// One simulator slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slider {
    Exercise,
    Smoking,
    Alcohol,
    Weight,
    Sleep,
    Stress,
}

impl Slider {
    pub const ALL: [Slider; 6] = [
        Slider::Exercise,
        Slider::Smoking,
        Slider::Alcohol,
        Slider::Weight,
        Slider::Sleep,
        Slider::Stress,
    ];

    /// Range the slider can take.
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Self::Exercise => 0.0..=7.0,
            Self::Smoking => 0.0..=40.0,
            Self::Alcohol => 0.0..=21.0,
            Self::Weight => 50.0..=120.0,
            Self::Sleep => 4.0..=12.0,
            Self::Stress => 1.0..=5.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Smoking => "smoking",
            Self::Alcohol => "alcohol",
            Self::Weight => "weight",
            Self::Sleep => "sleep",
            Self::Stress => "stress",
        }
    }
}

impl LifestyleInputs {
    pub fn get(&self, slider: Slider) -> f64 {
        match slider {
            Slider::Exercise => self.exercise,
            Slider::Smoking => self.smoking,
            Slider::Alcohol => self.alcohol,
            Slider::Weight => self.weight,
            Slider::Sleep => self.sleep,
            Slider::Stress => self.stress,
        }
    }

    pub fn set(&mut self, slider: Slider, value: f64) {
        let field = match slider {
            Slider::Exercise => &mut self.exercise,
            Slider::Smoking => &mut self.smoking,
            Slider::Alcohol => &mut self.alcohol,
            Slider::Weight => &mut self.weight,
            Slider::Sleep => &mut self.sleep,
            Slider::Stress => &mut self.stress,
        };
        *field = value;
    }

    /// Reject values outside the slider ranges.
    pub fn validate(&self) -> Result<(), InputError> {
        for slider in Slider::ALL {
            let value = self.get(slider);
            let range = slider.range();
            if !value.is_finite() || !range.contains(&value) {
                return Err(InputError::OutOfRange {
                    slider: slider.name(),
                    value,
                    min: *range.start(),
                    max: *range.end(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{slider} must be between {min} and {max}, got {value}")]
    OutOfRange {
        slider: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Scores shown for one set of inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionSnapshot {
    /// Percent, whole number
    pub cardiovascular_risk: f64,
    /// Percent, whole number
    pub diabetes_risk: f64,
    /// Years, one decimal
    pub life_expectancy: f64,
    pub health_score: f64,
    /// One decimal
    pub bmi: f64,
}

/// Inputs and scores saved for before/after comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSnapshot {
    pub inputs: LifestyleInputs,
    pub prediction: PredictionSnapshot,
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Worsened,
    Unchanged,
}

/// Change in one score between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldDelta {
    pub before: f64,
    pub after: f64,
    pub change: f64,
    /// Absent for values with no better direction
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<Trend>,
}

/// Per-field comparison of two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionComparison {
    pub cardiovascular_risk: FieldDelta,
    pub diabetes_risk: FieldDelta,
    pub life_expectancy: FieldDelta,
    pub health_score: FieldDelta,
    pub bmi: FieldDelta,
}
