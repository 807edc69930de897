//! HTTP client for the remote analytics API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::assessment::{ApiData, FoodItem};
use crate::config::Config;

use super::requests::{AlcoholSmokeRequest, DiseaseRequest};

/// Errors from the remote analytics API.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    #[error("network error calling {endpoint}: {message}")]
    Network { endpoint: &'static str, message: String },

    #[error("{endpoint} returned {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },

    #[error("unexpected response from {endpoint}: {message}")]
    Parse { endpoint: &'static str, message: String },

    #[error("{endpoint} failed: {message}")]
    Remote { endpoint: &'static str, message: String },
}

/// Remote services the app renders results from.
#[async_trait]
pub trait AnalyticsApi: Send + Sync {
    /// Full food catalog for autocomplete.
    async fn search_foods(&self) -> Result<Vec<FoodItem>, ApiError>;

    /// Disease-risk breakdown.
    async fn fetch_disease(&self, request: &DiseaseRequest) -> Result<Value, ApiError>;

    /// Alcohol and smoking population comparison.
    async fn fetch_alcohol_smoke(&self, request: &AlcoholSmokeRequest) -> Result<Value, ApiError>;

    /// Nutrient totals for the submitted meals.
    async fn fetch_nutrients(&self, api_data: &ApiData) -> Result<Value, ApiError>;
}

const SEARCH_FOODS: &str = "searchFoodIntake";
const FETCH_DISEASE: &str = "fetchDisease";
const ALCOHOL_SMOKE: &str = "alcoholSmokeDataFetch";
const NUTRIENTS: &str = "nutrientsIntakeData";

/// [`AnalyticsApi`] over HTTP. No retries; a failed call is reported once.
#[derive(Debug, Clone)]
pub struct HttpAnalyticsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpAnalyticsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.analytics_base_url, &config.analytics_api_key)
    }

    async fn post<B: Serialize + ?Sized>(&self, endpoint: &'static str, body: &B) -> Result<Value, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, "Calling analytics API");

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Network {
                endpoint,
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::Network {
            endpoint,
            message: e.to_string(),
        })?;

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "Analytics API error");
            return Err(ApiError::Status {
                endpoint,
                status: status.as_u16(),
                message: text,
            });
        }

        let value: Value = serde_json::from_str(&text).map_err(|e| ApiError::Parse {
            endpoint,
            message: e.to_string(),
        })?;

        unwrap_body(endpoint, value)
    }
}

#[async_trait]
impl AnalyticsApi for HttpAnalyticsClient {
    async fn search_foods(&self) -> Result<Vec<FoodItem>, ApiError> {
        let value = self.post(SEARCH_FOODS, &serde_json::json!({})).await?;
        parse_food_items(value)
    }

    async fn fetch_disease(&self, request: &DiseaseRequest) -> Result<Value, ApiError> {
        self.post(FETCH_DISEASE, request).await
    }

    async fn fetch_alcohol_smoke(&self, request: &AlcoholSmokeRequest) -> Result<Value, ApiError> {
        self.post(ALCOHOL_SMOKE, request).await
    }

    async fn fetch_nutrients(&self, api_data: &ApiData) -> Result<Value, ApiError> {
        self.post(NUTRIENTS, api_data).await
    }
}

/// Strip the Lambda proxy envelope (`{"statusCode":..,"body":"<json>"}`)
/// and surface embedded `{"error": ..}` payloads.
pub fn unwrap_body(endpoint: &'static str, value: Value) -> Result<Value, ApiError> {
    let value = match value {
        Value::Object(mut map) if map.contains_key("body") => {
            let status = map.get("statusCode").and_then(Value::as_u64);
            let body = match map.remove("body") {
                Some(Value::String(raw)) => {
                    serde_json::from_str(&raw).map_err(|e| ApiError::Parse {
                        endpoint,
                        message: format!("body is not JSON: {e}"),
                    })?
                }
                Some(other) => other,
                None => Value::Null,
            };
            if let Some(status) = status.filter(|s| !(200..300).contains(s)) {
                return Err(ApiError::Status {
                    endpoint,
                    status: u16::try_from(status).unwrap_or(500),
                    message: error_message(&body).unwrap_or_else(|| body.to_string()),
                });
            }
            body
        }
        other => other,
    };

    match error_message(&value) {
        Some(message) => Err(ApiError::Remote { endpoint, message }),
        None => Ok(value),
    }
}

fn error_message(value: &Value) -> Option<String> {
    let error = value.as_object()?.get("error")?;
    Some(error.as_str().map(str::to_string).unwrap_or_else(|| error.to_string()))
}

/// Catalog response: a bare array, or an array inside `body`.
pub fn parse_food_items(value: Value) -> Result<Vec<FoodItem>, ApiError> {
    let value = unwrap_body(SEARCH_FOODS, value)?;
    serde_json::from_value(value).map_err(|e| ApiError::Parse {
        endpoint: SEARCH_FOODS,
        message: e.to_string(),
    })
}
