//! Card view models for the health detail page.
//!
//! Remote payloads are opaque; these helpers pull out the handful of fields
//! the cards display and ignore anything they do not recognise.

use serde_json::Value;

use super::fanout::CardState;

/// Nutrients listed on the summary card.
const NUTRIENT_ROWS: usize = 5;

/// Deficient nutrients that get a dietary recommendation.
const RECOMMENDATIONS: usize = 3;

const DEFAULT_RECOMMENDATION: &str = "Consult a nutritionist for personalized advice";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Band a disease by its baseline disability-adjusted life years.
    pub fn from_daly(daly: f64) -> Self {
        if daly < 20_000.0 {
            Self::Low
        } else if daly < 100_000.0 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low risk",
            Self::Moderate => "Moderate risk",
            Self::High => "High risk",
        }
    }
}

/// A headline with its breakdown rows.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLine {
    pub text: String,
    pub details: Vec<String>,
}

impl CardLine {
    fn new(text: String) -> Self {
        Self {
            text,
            details: Vec::new(),
        }
    }
}

/// Guidance derived from the reported alcohol status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advice {
    pub title: &'static str,
    pub message: &'static str,
    pub warning: bool,
}

impl Advice {
    const WITHIN: Self = Self {
        title: "Health Status",
        message: "Your alcohol intake is within recommended guidelines. Keep up the healthy choices!",
        warning: false,
    };

    const EXCEEDING: Self = Self {
        title: "Health Advisory",
        message: "Your intake exceeds recommended guidelines. Consider reducing consumption for better health outcomes.",
        warning: true,
    };

    /// Advice for an alcohol status string, if it says either way.
    pub fn for_alcohol_status(status: &str) -> Option<Self> {
        let status = status.to_lowercase();
        if status.contains("did not exceed") || status.contains("within") {
            Some(Self::WITHIN)
        } else if status.contains("exceed") {
            Some(Self::EXCEEDING)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub nutrient: String,
    pub advice: &'static str,
}

/// Status counts over every reported nutrient.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionSummary {
    pub total: usize,
    pub adequate: usize,
    pub deficient: usize,
    pub excessive: usize,
    pub adequate_percent: u32,
    pub recommendations: Vec<Recommendation>,
}

impl NutritionSummary {
    fn from_totals(totals: &[Value]) -> Option<Self> {
        if totals.is_empty() {
            return None;
        }
        let count = |wanted: &str| totals.iter().filter(|n| status_of(n) == Some(wanted)).count();
        let adequate = count("adequate");

        let recommendations = totals
            .iter()
            .filter(|n| status_of(n) == Some("deficient"))
            .filter_map(|n| n.get("nutrient_name").and_then(Value::as_str))
            .take(RECOMMENDATIONS)
            .map(|name| Recommendation {
                nutrient: name.to_string(),
                advice: recommendation_for(name),
            })
            .collect();

        Some(Self {
            total: totals.len(),
            adequate,
            deficient: count("deficient"),
            excessive: count("excessive"),
            adequate_percent: (adequate as f64 / totals.len() as f64 * 100.0).round() as u32,
            recommendations,
        })
    }
}

fn status_of(nutrient: &Value) -> Option<&str> {
    nutrient.get("status").and_then(Value::as_str)
}

fn recommendation_for(nutrient: &str) -> &'static str {
    match nutrient {
        "Energy(a)" => "Consider increasing portion sizes or adding healthy snacks between meals",
        "Protein" => "Include more lean meats, fish, eggs, legumes, or dairy in your meals",
        "Total Fat(c)" => "Add healthy fats like avocado, nuts, olive oil, or fatty fish",
        "Carbohydrate(c)" => "Include more whole grains, fruits, and vegetables",
        "Dietary Fibre" => "Increase intake of fruits, vegetables, whole grains, and legumes",
        "Calcium" => "Include more dairy products, leafy greens, or fortified foods",
        _ => DEFAULT_RECOMMENDATION,
    }
}

/// What a ready card shows besides its title.
#[derive(Debug, Default)]
struct CardBody {
    lines: Vec<CardLine>,
    advice: Option<Advice>,
    summary: Option<NutritionSummary>,
}

/// One rendered card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub title: &'static str,
    pub loading: bool,
    pub error: Option<String>,
    pub lines: Vec<CardLine>,
    pub advice: Option<Advice>,
    pub summary: Option<NutritionSummary>,
}

impl CardView {
    fn new(title: &'static str, state: &CardState, render: fn(&Value) -> CardBody) -> Self {
        let (loading, error, body) = match state {
            CardState::Loading => (true, None, CardBody::default()),
            CardState::Failed { message } => (false, Some(format!("Error: {message}")), CardBody::default()),
            CardState::Ready { data } => (false, None, render(data)),
        };

        Self {
            title,
            loading,
            error,
            lines: body.lines,
            advice: body.advice,
            summary: body.summary,
        }
    }

    pub fn disease(state: &CardState) -> Self {
        Self::new("Disease Risk Assessment", state, disease_body)
    }

    pub fn lifestyle(state: &CardState) -> Self {
        Self::new("Alcohol & Smoking Comparison", state, lifestyle_body)
    }

    pub fn nutrients(state: &CardState) -> Self {
        Self::new("Personalized Nutrition Analysis", state, nutrient_body)
    }
}

fn disease_body(data: &Value) -> CardBody {
    let Some(results) = data.get("results").and_then(Value::as_object) else {
        return CardBody::default();
    };

    let lines = results
        .iter()
        .map(|(disease, details)| {
            let daly = details
                .get("baseline_total_daly")
                .and_then(Value::as_f64)
                .unwrap_or(0.0);
            let mut line = CardLine::new(format!("{disease}: {}", RiskLevel::from_daly(daly).label()));
            line.details
                .push(format!("Baseline DALY burden: {}", thousands(daly)));

            if let Some(contributions) = details.get("risk_contributions").and_then(Value::as_object) {
                line.details.extend(contributions.iter().map(|(factor, contrib)| {
                    let share = contrib.get("share").and_then(Value::as_f64).unwrap_or(0.0);
                    format!("{factor}: {:.1}%", share * 100.0)
                }));
            }
            line
        })
        .collect();

    CardBody {
        lines,
        ..CardBody::default()
    }
}

fn lifestyle_body(data: &Value) -> CardBody {
    let mut body = CardBody::default();

    if let Some(alcohol) = data.get("alcohol") {
        let pct = alcohol.get("percentage_exceeding").and_then(Value::as_f64).unwrap_or(0.0);
        let status = alcohol.get("status").and_then(Value::as_str).unwrap_or("Unknown");
        body.lines.push(CardLine::new(format!(
            "Alcohol: {status} ({pct:.1}% of people your age and sex)"
        )));
        body.advice = Advice::for_alcohol_status(status);
    }
    if let Some(smoking) = data.get("smoking") {
        let pct = smoking.get("percentage_matching").and_then(Value::as_f64).unwrap_or(0.0);
        let status = smoking.get("status").and_then(Value::as_str).unwrap_or("Unknown");
        body.lines.push(CardLine::new(format!(
            "Smoking: {status} ({pct:.1}% of people your age and sex)"
        )));
    }
    body
}

fn nutrient_body(data: &Value) -> CardBody {
    let Some(totals) = data.get("totals").and_then(Value::as_array) else {
        return CardBody::default();
    };

    let lines = totals
        .iter()
        .filter(|n| n.get("nutrient_name").and_then(Value::as_str).is_some())
        .take(NUTRIENT_ROWS)
        .map(nutrient_line)
        .collect();

    CardBody {
        lines,
        advice: None,
        summary: NutritionSummary::from_totals(totals),
    }
}

fn nutrient_line(n: &Value) -> CardLine {
    let name = n.get("nutrient_name").and_then(Value::as_str).unwrap_or_default();
    let status = status_of(n).unwrap_or("unknown").to_uppercase();
    let unit = n.get("unit").and_then(Value::as_str).unwrap_or("");
    let intake = n.get("intake_amount").and_then(Value::as_f64).unwrap_or(0.0);

    let mut text = match n.get("recommended_amount").and_then(Value::as_f64) {
        Some(recommended) => format!("{name}: {intake:.1}/{recommended:.0} {unit} ({status})"),
        None => format!("{name}: {intake:.1} {unit} ({status})"),
    };
    if let Some(pct) = n.get("percent_of_recommendation").and_then(Value::as_f64) {
        text.push_str(&format!(", {pct:.1}% of daily needs"));
    }

    let details = n
        .get("meal_contributions")
        .and_then(Value::as_array)
        .map(|meals| {
            meals
                .iter()
                .map(|m| {
                    let meal = m.get("meal").and_then(Value::as_str).unwrap_or("meal");
                    let amount = m.get("intake_amount").and_then(Value::as_f64).unwrap_or(0.0);
                    let of_total = m.get("percent_of_total").and_then(Value::as_f64).unwrap_or(0.0);
                    let of_needs = m
                        .get("percent_of_recommendation")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0);
                    format!(
                        "{}: {amount:.2} {unit} ({of_total:.1}% of total, {of_needs:.1}% daily needs)",
                        capitalize(meal)
                    )
                })
                .collect()
        })
        .unwrap_or_default();

    CardLine { text, details }
}

/// Whole number with comma thousands separators.
fn thousands(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
