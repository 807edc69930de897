//! Simulator page state: live inputs, live scores, one saved snapshot.

use chrono::Utc;

use super::heuristic::{compare, predict};
use super::models::{
    ComparisonSnapshot, LifestyleInputs, PredictionComparison, PredictionSnapshot, Slider,
};

#[derive(Debug, Clone)]
pub struct Simulator {
    inputs: LifestyleInputs,
    current: PredictionSnapshot,
    saved: Option<ComparisonSnapshot>,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new(LifestyleInputs::default())
    }
}

impl Simulator {
    pub fn new(inputs: LifestyleInputs) -> Self {
        Self {
            inputs,
            current: predict(&inputs),
            saved: None,
        }
    }

    /// Resume with a snapshot the client saved earlier.
    pub fn with_saved(inputs: LifestyleInputs, saved: ComparisonSnapshot) -> Self {
        Self {
            saved: Some(saved),
            ..Self::new(inputs)
        }
    }

    pub fn inputs(&self) -> &LifestyleInputs {
        &self.inputs
    }

    pub fn current(&self) -> &PredictionSnapshot {
        &self.current
    }

    pub fn saved(&self) -> Option<&ComparisonSnapshot> {
        self.saved.as_ref()
    }

    /// Move one slider, kept inside its range, and rescore.
    pub fn set_slider(&mut self, slider: Slider, value: f64) {
        let range = slider.range();
        self.inputs.set(slider, value.clamp(*range.start(), *range.end()));
        self.current = predict(&self.inputs);
    }

    /// Save the current inputs and scores, replacing any earlier snapshot.
    pub fn save_snapshot(&mut self) -> &ComparisonSnapshot {
        self.saved.insert(ComparisonSnapshot {
            inputs: self.inputs,
            prediction: self.current,
            saved_at: Utc::now(),
        })
    }

    /// Saved scores against the live ones, if a snapshot exists.
    pub fn comparison(&self) -> Option<PredictionComparison> {
        self.saved
            .as_ref()
            .map(|saved| compare(&saved.prediction, &self.current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::models::Trend;

    #[test]
    fn test_slider_rescores() {
        let mut sim = Simulator::default();
        let before = *sim.current();
        sim.set_slider(Slider::Smoking, 20.0);
        assert!(sim.current().cardiovascular_risk > before.cardiovascular_risk);
        assert_eq!(*sim.current(), predict(sim.inputs()));
    }

    #[test]
    fn test_slider_clamped_to_range() {
        let mut sim = Simulator::default();
        sim.set_slider(Slider::Stress, 9.0);
        assert_eq!(sim.inputs().stress, 5.0);
        sim.set_slider(Slider::Weight, 10.0);
        assert_eq!(sim.inputs().weight, 50.0);
    }

    #[test]
    fn test_no_comparison_without_snapshot() {
        assert!(Simulator::default().comparison().is_none());
    }

    #[test]
    fn test_save_overwrites_previous() {
        let mut sim = Simulator::default();
        sim.save_snapshot();
        sim.set_slider(Slider::Exercise, 6.0);
        let saved = sim.save_snapshot().clone();

        assert_eq!(saved.inputs.exercise, 6.0);
        assert_eq!(sim.saved(), Some(&saved));

        let cmp = sim.comparison().unwrap();
        assert_eq!(cmp.health_score.trend, Some(Trend::Unchanged));
    }

    #[test]
    fn test_compare_against_saved() {
        let mut sim = Simulator::default();
        sim.save_snapshot();
        sim.set_slider(Slider::Sleep, 8.0);

        let cmp = sim.comparison().unwrap();
        assert_eq!(cmp.cardiovascular_risk.change, -1.0);
        assert_eq!(cmp.cardiovascular_risk.trend, Some(Trend::Improved));
    }
}
