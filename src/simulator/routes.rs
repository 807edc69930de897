//! HTTP route handlers for the lifestyle simulator.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::AppState;

use super::heuristic::predict;
use super::models::{ComparisonSnapshot, LifestyleInputs, PredictionComparison, PredictionSnapshot};
use super::state::Simulator;

/// Create the simulator router with all endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict_scores))
        .route("/snapshot", post(snapshot))
        .route("/compare", post(compare_to_saved))
}

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub saved: ComparisonSnapshot,
    pub inputs: LifestyleInputs,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub current: PredictionSnapshot,
    pub saved: ComparisonSnapshot,
    pub comparison: PredictionComparison,
}

fn checked(inputs: LifestyleInputs) -> Result<LifestyleInputs> {
    inputs
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(inputs)
}

async fn predict_scores(Json(inputs): Json<LifestyleInputs>) -> Result<Json<PredictionSnapshot>> {
    let inputs = checked(inputs)?;
    Ok(Json(predict(&inputs)))
}

/// Freeze the given inputs and their scores for a later comparison.
async fn snapshot(Json(inputs): Json<LifestyleInputs>) -> Result<Json<ComparisonSnapshot>> {
    let mut sim = Simulator::new(checked(inputs)?);
    Ok(Json(sim.save_snapshot().clone()))
}

async fn compare_to_saved(Json(request): Json<CompareRequest>) -> Result<Json<CompareResponse>> {
    let inputs = checked(request.inputs)?;
    // Rescore the saved inputs rather than trusting client-sent scores
    let saved = ComparisonSnapshot {
        prediction: predict(&checked(request.saved.inputs)?),
        ..request.saved
    };
    let sim = Simulator::with_saved(inputs, saved);

    let comparison = sim
        .comparison()
        .ok_or_else(|| AppError::BadRequest("no saved snapshot".to_string()))?;
    let saved = sim
        .saved()
        .cloned()
        .ok_or_else(|| AppError::BadRequest("no saved snapshot".to_string()))?;

    Ok(Json(CompareResponse {
        current: *sim.current(),
        saved,
        comparison,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FakeApi;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let state = AppState::new(Config::default(), Arc::new(FakeApi::default()));
        let app = Router::new().nest("/api/simulator", router()).with_state(state);
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn defaults() -> Value {
        json!({"exercise": 2, "smoking": 0, "alcohol": 1, "weight": 75, "sleep": 7, "stress": 3})
    }

    #[tokio::test]
    async fn test_predict_endpoint() {
        let (status, body) = post_json("/api/simulator/predict", defaults()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cardiovascular_risk"], 22.0);
        assert_eq!(body["life_expectancy"], 74.5);
    }

    #[tokio::test]
    async fn test_predict_rejects_out_of_range() {
        let mut inputs = defaults();
        inputs["smoking"] = json!(60);
        let (status, body) = post_json("/api/simulator/predict", inputs).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "smoking must be between 0 and 40, got 60");
    }

    #[tokio::test]
    async fn test_snapshot_then_compare() {
        let (_, saved) = post_json("/api/simulator/snapshot", defaults()).await;
        assert_eq!(saved["prediction"]["health_score"], 58.0);

        let mut current = defaults();
        current["exercise"] = json!(5);
        let (status, body) = post_json(
            "/api/simulator/compare",
            json!({"saved": saved, "inputs": current}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["comparison"]["health_score"]["trend"], "improved");
        assert_eq!(body["comparison"]["cardiovascular_risk"]["trend"], "improved");
        assert!(body["comparison"]["bmi"].get("trend").is_none());
    }
}
