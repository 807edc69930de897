//! Independent analysis calls started for one health profile.
//!
//! Each call runs in its own task and publishes into its own channel.
//! Nothing waits for all three: readers take whatever has arrived.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;

use crate::assessment::HealthProfile;

use super::client::{AnalyticsApi, ApiError};
use super::requests::{AlcoholSmokeRequest, DiseaseRequest};

/// State of one analysis card.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CardState {
    Loading,
    Ready { data: Value },
    Failed { message: String },
}

impl CardState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl From<Result<Value, ApiError>> for CardState {
    fn from(result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Ready { data },
            Err(e) => Self::Failed {
                message: e.to_string(),
            },
        }
    }
}

/// Point-in-time view of all three cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub disease: CardState,
    pub lifestyle: CardState,
    pub nutrients: CardState,
    /// True while any card is still outstanding
    pub loading: bool,
}

/// Receivers for the three analysis cards of one profile.
#[derive(Debug, Clone)]
pub struct AnalysisBoard {
    disease: watch::Receiver<CardState>,
    lifestyle: watch::Receiver<CardState>,
    nutrients: watch::Receiver<CardState>,
}

impl AnalysisBoard {
    pub fn snapshot(&self) -> BoardSnapshot {
        let disease = self.disease.borrow().clone();
        let lifestyle = self.lifestyle.borrow().clone();
        let nutrients = self.nutrients.borrow().clone();
        let loading = disease.is_loading() || lifestyle.is_loading() || nutrients.is_loading();

        BoardSnapshot {
            disease,
            lifestyle,
            nutrients,
            loading,
        }
    }
}

/// Start the disease, lifestyle and nutrient calls for `profile`.
///
/// Must be called from within a tokio runtime.
pub fn launch(api: Arc<dyn AnalyticsApi>, profile: &HealthProfile) -> AnalysisBoard {
    let disease_request = DiseaseRequest::from(profile);
    let lifestyle_request = AlcoholSmokeRequest::from(profile);
    let api_data = profile.api_data.clone();

    let disease = spawn_card("disease", {
        let api = api.clone();
        async move { api.fetch_disease(&disease_request).await }
    });
    let lifestyle = spawn_card("lifestyle", {
        let api = api.clone();
        async move { api.fetch_alcohol_smoke(&lifestyle_request).await }
    });
    let nutrients = spawn_card("nutrients", async move { api.fetch_nutrients(&api_data).await });

    AnalysisBoard {
        disease,
        lifestyle,
        nutrients,
    }
}

fn spawn_card<F>(card: &'static str, call: F) -> watch::Receiver<CardState>
where
    F: std::future::Future<Output = Result<Value, ApiError>> + Send + 'static,
{
    let (tx, rx) = watch::channel(CardState::Loading);
    tokio::spawn(async move {
        let result = call.await;
        if let Err(e) = &result {
            tracing::warn!(card, error = %e, "Analysis call failed");
        }
        // Readers may be gone already; nothing to do then
        let _ = tx.send(CardState::from(result));
    });
    rx
}
