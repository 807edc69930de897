//! HealthyLife - Rust/Axum Backend
//!
//! Health assessment wizard, remote health analysis and the lifestyle
//! simulator, served as JSON endpoints plus a server-rendered health page.

use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod analysis;
pub mod assessment;
mod cache;
mod config;
mod error;
mod routes;
pub mod simulator;

use analysis::{AnalyticsApi, HttpAnalyticsClient};
use cache::AppCache;
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub cache: AppCache,
    pub analytics: Arc<dyn AnalyticsApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, analytics: Arc<dyn AnalyticsApi>) -> Self {
        Self {
            cache: AppCache::new(&config),
            analytics,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "healthylife_web=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let analytics = HttpAnalyticsClient::from_config(&config);
    tracing::info!("Analytics API at {}", config.analytics_base_url);

    let addr = config.bind_addr.clone();
    let state = AppState::new(config, Arc::new(analytics));
    let app = app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        // Health check and cache stats
        .route("/health", get(health_check))
        .route("/health/cache", get(cache_stats))
        // Assessment wizard
        .nest("/api/assessment", assessment::router())
        // Remote analyses
        .nest("/api/analysis", analysis::router())
        // Lifestyle simulator
        .nest("/api/simulator", simulator::router())
        // Health detail page
        .route("/my-health", get(routes::health::index))
        .route("/my-health/:id", get(routes::health::show))
        // State and middleware
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "analytics": state.config.analytics_base_url,
        "service": "healthylife-web"
    }))
}

/// Cache statistics endpoint
async fn cache_stats(State(state): State<AppState>) -> impl IntoResponse {
    state.cache.sessions.run_pending_tasks().await;
    state.cache.analyses.run_pending_tasks().await;
    Json(state.cache.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FakeApi;
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

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
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = app(AppState::new(Config::default(), Arc::new(FakeApi::default())));

        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        call(&app, Method::POST, "/api/assessment/sessions", None).await;
        let (_, stats) = call(&app, Method::GET, "/health/cache", None).await;
        assert_eq!(stats["sessions"], 1);
        assert_eq!(stats["analyses"], 0);
    }

    #[tokio::test]
    async fn test_routers_mounted() {
        let app = app(AppState::new(Config::default(), Arc::new(FakeApi::default())));
        let inputs = json!({"exercise": 2, "smoking": 0, "alcohol": 1, "weight": 75, "sleep": 7, "stress": 3});

        let (status, body) = call(&app, Method::POST, "/api/simulator/predict", Some(inputs)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["health_score"], 58.0);

        let (status, _) = call(&app, Method::GET, "/api/analysis/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
