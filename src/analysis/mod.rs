//! Remote health analysis.
//!
//! Once a health profile exists, three analyses (disease risk, alcohol and
//! smoking comparison, nutrient intake) are requested from the remote
//! analytics API and rendered as they arrive.

mod client;
mod fanout;
mod requests;
mod routes;
mod views;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::assessment::HealthProfile;

pub use client::{AnalyticsApi, ApiError, HttpAnalyticsClient};
pub use fanout::{launch, AnalysisBoard, BoardSnapshot, CardState};
pub use routes::router;
pub use views::CardView;

#[cfg(test)]
pub(crate) use fanout::tests::{sample_profile, FakeApi};

/// A submitted profile and its in-flight analyses.
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    pub id: Uuid,
    pub profile: HealthProfile,
    pub board: AnalysisBoard,
    pub started_at: DateTime<Utc>,
}

impl AnalysisRun {
    /// Kick off all three analyses for `profile`.
    pub fn start(api: Arc<dyn AnalyticsApi>, profile: HealthProfile) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(analysis = %id, "Starting health analysis");
        let board = launch(api, &profile);

        Self {
            id,
            profile,
            board,
            started_at: Utc::now(),
        }
    }

    /// Page that renders this run.
    pub fn page_path(&self) -> String {
        format!("/my-health/{}", self.id)
    }
}
