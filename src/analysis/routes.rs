//! HTTP route handlers for health analysis runs.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::assessment::HealthProfile;
use crate::error::{AppError, Result};
use crate::AppState;

use super::fanout::BoardSnapshot;
use super::AnalysisRun;

/// Create the analysis router with all endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start))
        .route("/:id", get(status))
}

#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub profile: HealthProfile,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub analysis_id: Uuid,
    pub redirect: String,
}

/// Start analyses for a profile the client already holds.
async fn start(
    State(state): State<AppState>,
    Json(request): Json<StartRequest>,
) -> Result<Json<StartResponse>> {
    if !request.profile.is_complete() {
        return Err(AppError::BadRequest(
            "health profile is incomplete; complete the assessment first".to_string(),
        ));
    }

    let run = AnalysisRun::start(state.analytics.clone(), request.profile);
    let response = StartResponse {
        analysis_id: run.id,
        redirect: run.page_path(),
    };
    state.cache.analyses.insert(run.id, Arc::new(run)).await;

    Ok(Json(response))
}

/// Current state of each card; cards that have not answered yet are `loading`.
async fn status(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<BoardSnapshot>> {
    let run = state
        .cache
        .analyses
        .get(&id)
        .await
        .ok_or(AppError::NotFound("analysis"))?;

    Ok(Json(run.board.snapshot()))
}
