//! Wire types for the decision service.
//!
//! The request side mirrors what the form collects; the response side is the
//! service's scored verdict. The service speaks two success shapes in the
//! wild: `{ "output": {...} }` and the bare output object. Both are accepted
//! here (see [`parse_output_body`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload for one submission.
///
/// Structured fields (decision + two options) and the free-text `prompt` are
/// alternative framings; callers fill one or the other, never both.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DecisionRequest {
    pub decision: String,
    #[serde(rename = "optionA")]
    pub option_a: String,
    #[serde(rename = "optionB")]
    pub option_b: String,
    #[serde(rename = "userContext", skip_serializing_if = "Option::is_none")]
    pub user_context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criterion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explain: Option<ExplainLevel>,
}

/// A named factor the service scores each option against.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Criterion {
    pub criterion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Career,
    Money,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExplainLevel {
    Simple,
    Normal,
}

// ----- Response types -----

/// The service's structured verdict.
///
/// Only `recommendation` and `scores` are required for a body to count as
/// well-formed; everything else defaults to empty when a lenient server
/// omits it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DecisionOutput {
    pub recommendation: Recommendation,
    #[serde(default, alias = "simple_summary")]
    pub one_line_summary: String,
    pub scores: Scores,
    #[serde(default)]
    pub score_breakdown: Vec<ScoreRow>,
    #[serde(default)]
    pub tradeoffs: Vec<String>,
    #[serde(default)]
    pub risks: Risks,
    #[serde(default)]
    pub what_would_change_my_mind: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_score: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    A,
    B,
    Tie,
}

impl Recommendation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::A => "A",
            Recommendation::B => "B",
            Recommendation::Tie => "Tie",
        }
    }
}

/// Overall 0-100 score per option.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Scores {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
}

/// Per-criterion 0-10 scoring row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ScoreRow {
    pub criterion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(rename = "A_score")]
    pub a_score: f64,
    #[serde(rename = "B_score")]
    pub b_score: f64,
    #[serde(default)]
    pub why: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Risks {
    #[serde(rename = "A", default)]
    pub a: Vec<String>,
    #[serde(rename = "B", default)]
    pub b: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

/// Structured failure body the service returns on non-2xx.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Probe a 2xx body for a verdict, accepting both success shapes.
pub fn parse_output_body(body: &str) -> Option<DecisionOutput> {
    let value: Value = serde_json::from_str(body).ok()?;
    let candidate = match value.get("output") {
        Some(inner) => inner.clone(),
        None => value,
    };
    serde_json::from_value(candidate).ok()
}
