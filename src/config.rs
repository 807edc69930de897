//! Runtime configuration from environment variables.

use std::time::Duration;

/// Settings read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    /// Base URL of the remote analytics API (without trailing endpoint)
    pub analytics_base_url: String,
    /// Static key sent as `x-api-key`
    pub analytics_api_key: String,
    /// Idle time before an open assessment is dropped
    pub session_idle: Duration,
    /// How long analysis results stay viewable
    pub analysis_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            analytics_base_url: "http://localhost:3000".to_string(),
            analytics_api_key: String::new(),
            session_idle: Duration::from_secs(30 * 60),
            analysis_ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl Config {
    /// Read settings from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let analytics_api_key = std::env::var("ANALYTICS_API_KEY").unwrap_or_default();
        if analytics_api_key.is_empty() {
            tracing::warn!("ANALYTICS_API_KEY is not set; remote analytics calls will be rejected");
        }

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            analytics_base_url: std::env::var("ANALYTICS_API_BASE_URL")
                .unwrap_or(defaults.analytics_base_url),
            analytics_api_key,
            session_idle: secs_var("SESSION_IDLE_SECS").unwrap_or(defaults.session_idle),
            analysis_ttl: secs_var("ANALYSIS_TTL_SECS").unwrap_or(defaults.analysis_ttl),
        }
    }
}

fn secs_var(name: &str) -> Option<Duration> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<u64>() {
        Ok(secs) => Some(Duration::from_secs(secs)),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", name, raw);
            None
        }
    }
}
