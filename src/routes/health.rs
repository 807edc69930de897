//! Health detail page route handlers

use askama::Template;
use axum::{
    extract::{Path, State},
    response::Html,
};
use uuid::Uuid;

use crate::analysis::{AnalysisRun, CardView};
use crate::assessment::HealthProfile;
use crate::error::Result;
use crate::AppState;

/// Health detail page template
#[derive(Template)]
#[template(path = "health/detail.html")]
struct DetailTemplate {
    age: i32,
    gender: String,
    bmi: String,
    weight: String,
    smoking: String,
    alcohol: i32,
    loading: bool,
    cards: Vec<CardView>,
}

/// Shown when no usable health profile is available
#[derive(Template)]
#[template(path = "health/fallback.html")]
struct FallbackTemplate {
    assessment_url: &'static str,
}

fn fallback() -> Result<Html<String>> {
    let template = FallbackTemplate {
        assessment_url: "/#assessment",
    };
    Ok(Html(template.render()?))
}

fn smoking_line(profile: &HealthProfile) -> String {
    match (profile.smoking_status, profile.smoking_frequency) {
        (Some(status), Some(freq)) => format!("{} ({})", status.label(), freq.display_label()),
        (Some(status), None) => status.label().to_string(),
        (None, _) => String::new(),
    }
}

fn detail(run: &AnalysisRun) -> Result<Html<String>> {
    let profile = &run.profile;
    let snapshot = run.board.snapshot();

    let template = DetailTemplate {
        age: profile.age,
        gender: profile.gender.map(|g| g.label().to_string()).unwrap_or_default(),
        bmi: format!("{:.1}", profile.bmi),
        weight: format!("{:.0} kg", profile.current_weight),
        smoking: smoking_line(profile),
        alcohol: profile.alcohol_consumption,
        loading: snapshot.loading,
        cards: vec![
            CardView::disease(&snapshot.disease),
            CardView::lifestyle(&snapshot.lifestyle),
            CardView::nutrients(&snapshot.nutrients),
        ],
    };

    Ok(Html(template.render()?))
}

/// Health page visited without an analysis id
pub async fn index() -> Result<Html<String>> {
    tracing::debug!("Health page visited without a profile");
    fallback()
}

/// Health page for one analysis run
pub async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>> {
    match state.cache.analyses.get(&id).await {
        Some(run) if run.profile.is_complete() => detail(&run),
        Some(_) => {
            tracing::warn!(analysis = %id, "Incomplete health profile");
            fallback()
        }
        None => {
            tracing::info!(analysis = %id, "Unknown or expired analysis");
            fallback()
        }
    }
}
