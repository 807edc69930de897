//! In-memory stores for open assessments and analysis runs.

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::analysis::AnalysisRun;
use crate::assessment::PageSession;
use crate::config::Config;

const MAX_SESSIONS: u64 = 10_000;
const MAX_ANALYSES: u64 = 10_000;

/// Shared caches, cheap to clone.
#[derive(Clone)]
pub struct AppCache {
    /// Open assessment pages. Eviction drops the wizard and its listeners.
    pub sessions: Cache<Uuid, Arc<Mutex<PageSession>>>,
    pub analyses: Cache<Uuid, Arc<AnalysisRun>>,
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub sessions: u64,
    pub analyses: u64,
}

impl AppCache {
    pub fn new(config: &Config) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(config.session_idle)
                .build(),
            analyses: Cache::builder()
                .max_capacity(MAX_ANALYSES)
                .time_to_live(config.analysis_ttl)
                .build(),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            sessions: self.sessions.entry_count(),
            analyses: self.analyses.entry_count(),
        }
    }
}
