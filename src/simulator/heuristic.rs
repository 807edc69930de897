//! Lifestyle score heuristic.
//!
//! Fixed baselines adjusted linearly by each lifestyle factor, then clamped
//! to a display range. The coefficients are illustrative and frozen; this is
//! not a validated clinical model.

use super::models::{
    FieldDelta, LifestyleInputs, PredictionComparison, PredictionSnapshot, Trend,
};

const BASELINE_CARDIOVASCULAR: f64 = 20.0;
const BASELINE_DIABETES: f64 = 15.0;
const BASELINE_LIFE_EXPECTANCY: f64 = 75.0;
const BASELINE_HEALTH_SCORE: f64 = 60.0;

const CARDIOVASCULAR_RANGE: (f64, f64) = (5.0, 50.0);
const DIABETES_RANGE: (f64, f64) = (3.0, 40.0);
const LIFE_EXPECTANCY_RANGE: (f64, f64) = (65.0, 95.0);
const HEALTH_SCORE_RANGE: (f64, f64) = (20.0, 100.0);

/// Reference height for the BMI readout, in metres.
const REFERENCE_HEIGHT_M: f64 = 1.75;

fn clamp(value: f64, (min, max): (f64, f64)) -> f64 {
    value.max(min).min(max)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute all scores for `inputs`.
pub fn predict(inputs: &LifestyleInputs) -> PredictionSnapshot {
    let exercise_factor = ((inputs.exercise - 2.0) * 2.0).max(0.0);
    let smoking_penalty = inputs.smoking * 0.5;
    let alcohol_factor = if inputs.alcohol > 7.0 {
        (inputs.alcohol - 7.0) * 0.3
    } else {
        -(inputs.alcohol.min(2.0) * 0.2)
    };
    let sleep_factor = (inputs.sleep - 8.0).abs() * 0.5;
    let stress_factor = (inputs.stress - 1.0) * 0.8;

    let cardiovascular = BASELINE_CARDIOVASCULAR - exercise_factor
        + smoking_penalty
        + alcohol_factor
        + sleep_factor
        + stress_factor;

    let diabetes = BASELINE_DIABETES - exercise_factor * 0.8
        + smoking_penalty * 0.6
        + alcohol_factor * 0.7
        + stress_factor;

    let life_expectancy = BASELINE_LIFE_EXPECTANCY + exercise_factor * 0.5
        - smoking_penalty * 0.3
        - alcohol_factor * 0.4
        - sleep_factor * 0.2
        - stress_factor * 0.3;

    let health_score = BASELINE_HEALTH_SCORE + exercise_factor * 2.0
        - smoking_penalty * 1.5
        - alcohol_factor
        - sleep_factor
        - stress_factor * 1.2;

    PredictionSnapshot {
        cardiovascular_risk: clamp(cardiovascular, CARDIOVASCULAR_RANGE).round(),
        diabetes_risk: clamp(diabetes, DIABETES_RANGE).round(),
        life_expectancy: round1(clamp(life_expectancy, LIFE_EXPECTANCY_RANGE)),
        health_score: clamp(health_score, HEALTH_SCORE_RANGE).round(),
        bmi: round1(inputs.weight / (REFERENCE_HEIGHT_M * REFERENCE_HEIGHT_M)),
    }
}

fn delta(before: f64, after: f64, higher_is_better: Option<bool>) -> FieldDelta {
    let change = round1(after - before);
    let trend = higher_is_better.map(|higher| {
        if change == 0.0 {
            Trend::Unchanged
        } else if (change > 0.0) == higher {
            Trend::Improved
        } else {
            Trend::Worsened
        }
    });

    FieldDelta {
        before,
        after,
        change,
        trend,
    }
}

/// Direction of change for every score from `old` to `new`.
pub fn compare(old: &PredictionSnapshot, new: &PredictionSnapshot) -> PredictionComparison {
    PredictionComparison {
        cardiovascular_risk: delta(old.cardiovascular_risk, new.cardiovascular_risk, Some(false)),
        diabetes_risk: delta(old.diabetes_risk, new.diabetes_risk, Some(false)),
        life_expectancy: delta(old.life_expectancy, new.life_expectancy, Some(true)),
        health_score: delta(old.health_score, new.health_score, Some(true)),
        bmi: delta(old.bmi, new.bmi, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::models::Slider;

    fn inputs(exercise: f64, smoking: f64, alcohol: f64, weight: f64, sleep: f64, stress: f64) -> LifestyleInputs {
        LifestyleInputs {
            exercise,
            smoking,
            alcohol,
            weight,
            sleep,
            stress,
        }
    }

    #[test]
    fn test_golden_defaults() {
        let result = predict(&inputs(2.0, 0.0, 1.0, 75.0, 7.0, 3.0));

        // 20 - 0 + 0 - 0.2 + 0.5 + 1.6 = 21.9
        assert_eq!(result.cardiovascular_risk, 22.0);
        // 15 - 0 + 0 - 0.14 + 1.6 = 16.46
        assert_eq!(result.diabetes_risk, 16.0);
        // 75 + 0 - 0 + 0.08 - 0.1 - 0.48 = 74.5
        assert_eq!(result.life_expectancy, 74.5);
        // 60 + 0 - 0 + 0.2 - 0.5 - 1.92 = 57.78
        assert_eq!(result.health_score, 58.0);
        assert_eq!(result.bmi, 24.5);
    }

    #[test]
    fn test_heavy_drinking_branch() {
        let result = predict(&inputs(2.0, 0.0, 17.0, 75.0, 8.0, 1.0));

        // alcohol factor (17 - 7) * 0.3 = 3
        assert_eq!(result.cardiovascular_risk, 23.0);
        assert_eq!(result.diabetes_risk, 17.0);
        assert_eq!(result.life_expectancy, 73.8);
        assert_eq!(result.health_score, 57.0);
    }

    #[test]
    fn test_slider_extremes() {
        let worst = predict(&inputs(0.0, 40.0, 21.0, 120.0, 4.0, 5.0));
        assert_eq!(worst.cardiovascular_risk, 49.0);
        assert_eq!(worst.diabetes_risk, 33.0);
        assert_eq!(worst.life_expectancy, 66.0);
        // 19.96 before clamping
        assert_eq!(worst.health_score, 20.0);

        let best = predict(&inputs(7.0, 0.0, 2.0, 50.0, 8.0, 1.0));
        assert_eq!(best.cardiovascular_risk, 10.0);
        assert_eq!(best.diabetes_risk, 7.0);
        assert_eq!(best.life_expectancy, 80.2);
        assert_eq!(best.health_score, 80.0);
        assert_eq!(best.bmi, 16.3);
    }

    #[test]
    fn test_deterministic() {
        let a = inputs(4.0, 12.0, 9.0, 88.0, 6.0, 4.0);
        assert_eq!(predict(&a), predict(&a));
    }

    #[test]
    fn test_outputs_within_bounds_across_slider_ranges() {
        let steps = |slider: Slider| {
            let range = slider.range();
            let (lo, hi) = (*range.start(), *range.end());
            (0..=4).map(move |i| lo + (hi - lo) * f64::from(i) / 4.0)
        };

        for exercise in steps(Slider::Exercise) {
            for smoking in steps(Slider::Smoking) {
                for alcohol in steps(Slider::Alcohol) {
                    for sleep in steps(Slider::Sleep) {
                        for stress in steps(Slider::Stress) {
                            let r = predict(&inputs(exercise, smoking, alcohol, 75.0, sleep, stress));
                            assert!((5.0..=50.0).contains(&r.cardiovascular_risk));
                            assert!((3.0..=40.0).contains(&r.diabetes_risk));
                            assert!((65.0..=95.0).contains(&r.life_expectancy));
                            assert!((20.0..=100.0).contains(&r.health_score));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_compare_directions() {
        let before = predict(&LifestyleInputs::default());
        let after = predict(&inputs(5.0, 0.0, 1.0, 70.0, 8.0, 2.0));
        let cmp = compare(&before, &after);

        assert_eq!(cmp.cardiovascular_risk.trend, Some(Trend::Improved));
        assert_eq!(cmp.diabetes_risk.trend, Some(Trend::Improved));
        assert_eq!(cmp.life_expectancy.trend, Some(Trend::Improved));
        assert_eq!(cmp.health_score.trend, Some(Trend::Improved));
        assert_eq!(cmp.bmi.trend, None);
        assert!(cmp.bmi.change < 0.0);

        let back = compare(&after, &before);
        assert_eq!(back.cardiovascular_risk.trend, Some(Trend::Worsened));
        assert_eq!(back.health_score.trend, Some(Trend::Worsened));

        let same = compare(&before, &before);
        assert_eq!(same.life_expectancy.trend, Some(Trend::Unchanged));
        assert_eq!(same.life_expectancy.change, 0.0);
    }
}
