//! Request bodies for the remote analysis endpoints.

use serde::Serialize;

use crate::assessment::{Gender, HealthProfile};

/// Body for `/fetchDisease`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseRequest {
    pub age: i32,
    pub sex: String,
    pub alcohol_intake: i32,
    pub smoking_status: Option<String>,
    pub smoking_frequency: Option<String>,
    /// Not collected by the wizard; the remote applies its population default.
    pub physical_activity_category: Option<String>,
}

/// Body for `/alcoholSmokeDataFetch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlcoholSmokeRequest {
    pub age: i32,
    /// Population filter sex: `Male`, `Female` or `Persons`
    pub gender: String,
    pub alcohol_intake: i32,
    pub smoking_status: Option<String>,
    pub smoking_frequency: Option<String>,
}

impl From<&HealthProfile> for DiseaseRequest {
    fn from(profile: &HealthProfile) -> Self {
        Self {
            age: profile.age,
            sex: profile.api_data.sex.clone(),
            alcohol_intake: profile.alcohol_consumption,
            smoking_status: profile.smoking_status.map(|s| s.label().to_string()),
            smoking_frequency: profile.smoking_frequency.map(|f| f.label().to_string()),
            physical_activity_category: None,
        }
    }
}

impl From<&HealthProfile> for AlcoholSmokeRequest {
    fn from(profile: &HealthProfile) -> Self {
        Self {
            age: profile.age,
            gender: filter_sex(profile.gender).to_string(),
            alcohol_intake: profile.alcohol_consumption,
            smoking_status: profile.smoking_status.map(|s| s.label().to_string()),
            smoking_frequency: profile.smoking_frequency.map(|f| f.label().to_string()),
        }
    }
}

/// Population statistics are only broken down by male and female.
fn filter_sex(gender: Option<Gender>) -> &'static str {
    match gender {
        Some(Gender::Male) => "Male",
        Some(Gender::Female) => "Female",
        _ => "Persons",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{Draft, SmokingFrequency, SmokingStatus};

    fn profile(gender: Option<Gender>) -> HealthProfile {
        HealthProfile::from_draft(&Draft {
            age: 41,
            gender,
            smoking_status: Some(SmokingStatus::CurrentSmoker),
            smoking_frequency: Some(SmokingFrequency::ThreeToSixDays),
            alcohol_consumption: 9,
            ..Draft::default()
        })
    }

    #[test]
    fn test_disease_request_body() {
        let body = serde_json::to_value(DiseaseRequest::from(&profile(Some(Gender::Female)))).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "age": 41,
                "sex": "female",
                "alcohol_intake": 9,
                "smoking_status": "Current Smoker",
                "smoking_frequency": "3-6 days",
                "physical_activity_category": null,
            })
        );
    }

    #[test]
    fn test_alcohol_smoke_filter_sex() {
        assert_eq!(AlcoholSmokeRequest::from(&profile(Some(Gender::Male))).gender, "Male");
        assert_eq!(
            AlcoholSmokeRequest::from(&profile(Some(Gender::NonBinary))).gender,
            "Persons"
        );
        assert_eq!(AlcoholSmokeRequest::from(&profile(None)).gender, "Persons");
    }
}
