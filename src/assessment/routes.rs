//! HTTP route handlers for the assessment wizard.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::analysis::AnalysisRun;
use crate::error::{AppError, Result};
use crate::AppState;

use super::autocomplete::{FoodItem, SuggestionKey};
use super::machine::Event;
use super::models::HealthProfile;
use super::session::{PageSession, SessionView};

/// Create the assessment router with all endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open))
        .route("/sessions/:id", get(show).delete(close))
        .route("/sessions/:id/events", post(event))
        .route("/sessions/:id/foods/input", post(food_input))
        .route("/sessions/:id/foods/select", post(food_select))
        .route("/sessions/:id/pointer-down", post(pointer_down))
}

#[derive(Debug, Deserialize)]
pub struct FoodInputRequest {
    #[serde(flatten)]
    pub key: SuggestionKey,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FoodSelectRequest {
    #[serde(flatten)]
    pub key: SuggestionKey,
    pub item: FoodItem,
}

#[derive(Debug, Deserialize)]
pub struct PointerDownRequest {
    #[serde(default)]
    pub target: Option<SuggestionKey>,
}

#[derive(Debug, Serialize)]
pub struct SubmittedResponse {
    pub analysis_id: Uuid,
    pub redirect: String,
    pub profile: HealthProfile,
}

#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub view: SessionView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted: Option<SubmittedResponse>,
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub key: String,
    pub suggestions: Vec<FoodItem>,
}

async fn session(state: &AppState, id: Uuid) -> Result<Arc<Mutex<PageSession>>> {
    state
        .cache
        .sessions
        .get(&id)
        .await
        .ok_or(AppError::NotFound("assessment session"))
}

/// Open the wizard and start loading the food catalog.
async fn open(State(state): State<AppState>) -> Json<SessionView> {
    let id = Uuid::new_v4();
    let mut page = PageSession::open();
    page.wizard.load_catalog(state.analytics.clone());
    let view = page.wizard.view(id);

    state.cache.sessions.insert(id, Arc::new(Mutex::new(page))).await;
    tracing::info!(session = %id, "Assessment opened");

    Json(view)
}

async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    let page = session(&state, id).await?;
    let page = page.lock().await;
    Ok(Json(page.wizard.view(id)))
}

async fn close(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>> {
    let page = session(&state, id).await?;
    let view = {
        let mut page = page.lock().await;
        page.wizard.close();
        page.wizard.view(id)
    };
    state.cache.sessions.invalidate(&id).await;
    tracing::info!(session = %id, "Assessment closed");

    Ok(Json(view))
}

/// Apply one wizard event. Submitting on the final step starts the health
/// analysis and ends the session.
async fn event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<Event>,
) -> Result<Json<EventResponse>> {
    let page = session(&state, id).await?;
    let (view, submitted) = {
        let mut page = page.lock().await;
        let submitted = page.wizard.apply(event);
        (page.wizard.view(id), submitted)
    };

    if !view.open {
        state.cache.sessions.invalidate(&id).await;
    }

    let submitted = match submitted {
        Some(profile) => {
            let run = AnalysisRun::start(state.analytics.clone(), profile);
            let response = SubmittedResponse {
                analysis_id: run.id,
                redirect: run.page_path(),
                profile: run.profile.clone(),
            };
            state.cache.analyses.insert(run.id, Arc::new(run)).await;
            Some(response)
        }
        None => None,
    };

    Ok(Json(EventResponse { view, submitted }))
}

async fn food_input(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FoodInputRequest>,
) -> Result<Json<SuggestionsResponse>> {
    let page = session(&state, id).await?;
    let suggestions = page.lock().await.wizard.type_food_name(request.key, &request.text);

    Ok(Json(SuggestionsResponse {
        key: request.key.to_string(),
        suggestions,
    }))
}

async fn food_select(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<FoodSelectRequest>,
) -> Result<Json<SessionView>> {
    let page = session(&state, id).await?;
    let mut page = page.lock().await;
    page.wizard.choose_food(request.key, request.item);
    Ok(Json(page.wizard.view(id)))
}

async fn pointer_down(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<PointerDownRequest>,
) -> Result<Json<SessionView>> {
    let page = session(&state, id).await?;
    let page = page.lock().await;
    page.pointer_down(request.target);
    Ok(Json(page.wizard.view(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FakeApi;
    use crate::config::Config;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new()
            .nest("/api/assessment", router())
            .with_state(state)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn send(app: &Router, id: &str, event: Value) -> Value {
        let (status, body) = call(app, Method::POST, &format!("/api/assessment/sessions/{id}/events"), Some(event)).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body
    }

    #[tokio::test]
    async fn test_full_assessment_flow() {
        let state = AppState::new(Config::default(), Arc::new(FakeApi::default()));
        let app = app(state.clone());

        let (status, opened) = call(&app, Method::POST, "/api/assessment/sessions", None).await;
        assert_eq!(status, StatusCode::OK);
        let id = opened["session_id"].as_str().unwrap().to_string();
        assert_eq!(opened["submit_label"], "Next");

        for _ in 0..4 {
            send(&app, &id, json!({"type": "next"})).await;
        }
        let body = send(&app, &id, json!({"type": "next"})).await;
        assert_eq!(body["view"]["step_index"], 4, "lifestyle step needs a smoking status");

        send(
            &app,
            &id,
            json!({"type": "field_changed", "change": {"field": "smoking_status", "value": "Never Smoked"}}),
        )
        .await;
        send(&app, &id, json!({"type": "submit"})).await;
        send(
            &app,
            &id,
            json!({"type": "field_changed", "change": {"field": "toggle_meal", "value": "Breakfast"}}),
        )
        .await;
        send(
            &app,
            &id,
            json!({"type": "field_changed", "change": {"field": "food_selected",
                "value": {"meal": "Breakfast", "row": 0, "name": "Oats", "id": "F1"}}}),
        )
        .await;
        send(
            &app,
            &id,
            json!({"type": "field_changed", "change": {"field": "food_quantity",
                "value": {"meal": "Breakfast", "row": 0, "quantity": "50"}}}),
        )
        .await;

        let body = send(&app, &id, json!({"type": "submit"})).await;
        assert_eq!(body["view"]["open"], false);
        assert_eq!(
            body["submitted"]["profile"]["api_data"]["meals"]["breakfast"],
            json!([{"public_food_key": "F1", "quantity": 50, "unit": "g"}])
        );
        let analysis_id: Uuid = body["submitted"]["analysis_id"].as_str().unwrap().parse().unwrap();
        assert!(state.cache.analyses.get(&analysis_id).await.is_some());

        // The session is gone after submission
        let (status, _) = call(&app, Method::GET, &format!("/api/assessment/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_food_input_and_outside_click() {
        let state = AppState::new(Config::default(), Arc::new(FakeApi::default()));
        let app = app(state.clone());

        let (_, opened) = call(&app, Method::POST, "/api/assessment/sessions", None).await;
        let id: Uuid = opened["session_id"].as_str().unwrap().parse().unwrap();
        {
            let page = state.cache.sessions.get(&id).await.unwrap();
            page.lock().await.wizard.set_catalog(vec![FoodItem {
                food_name: "Greek yoghurt".into(),
                public_food_key: "Y1".into(),
            }]);
        }
        send(
            &app,
            &id.to_string(),
            json!({"type": "field_changed", "change": {"field": "toggle_meal", "value": "Brunch"}}),
        )
        .await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/assessment/sessions/{id}/foods/input"),
            Some(json!({"meal": "Brunch", "row": 0, "text": "yog"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["key"], "brunch-0");
        assert_eq!(body["suggestions"][0]["public_food_key"], "Y1");

        let (_, view) = call(
            &app,
            Method::POST,
            &format!("/api/assessment/sessions/{id}/pointer-down"),
            Some(json!({"target": null})),
        )
        .await;
        assert_eq!(view["suggestions"], json!({}));
    }

    #[tokio::test]
    async fn test_open_event_restarts_live_session() {
        let state = AppState::new(Config::default(), Arc::new(FakeApi::default()));
        let app = app(state.clone());

        let (_, opened) = call(&app, Method::POST, "/api/assessment/sessions", None).await;
        let id: Uuid = opened["session_id"].as_str().unwrap().parse().unwrap();
        let page = state.cache.sessions.get(&id).await.unwrap();
        page.lock().await.wizard.set_catalog(vec![FoodItem {
            food_name: "Oats".into(),
            public_food_key: "F1".into(),
        }]);
        send(
            &app,
            &id.to_string(),
            json!({"type": "field_changed", "change": {"field": "toggle_meal", "value": "Breakfast"}}),
        )
        .await;
        call(
            &app,
            Method::POST,
            &format!("/api/assessment/sessions/{id}/foods/input"),
            Some(json!({"meal": "Breakfast", "row": 0, "text": "oat"})),
        )
        .await;

        let body = send(&app, &id.to_string(), json!({"type": "open"})).await;
        assert_eq!(body["view"]["open"], true);
        assert_eq!(body["view"]["draft"]["meal_food_list"], json!({}));
        assert_eq!(body["view"]["suggestions"], json!({}));
        assert_eq!(page.lock().await.pointer.listener_count(), 1);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let state = AppState::new(Config::default(), Arc::new(FakeApi::default()));
        let app = app(state.clone());

        let (_, opened) = call(&app, Method::POST, "/api/assessment/sessions", None).await;
        let id = opened["session_id"].as_str().unwrap().to_string();

        let (status, view) = call(&app, Method::DELETE, &format!("/api/assessment/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["open"], false);

        let (status, _) = call(&app, Method::GET, &format!("/api/assessment/sessions/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
