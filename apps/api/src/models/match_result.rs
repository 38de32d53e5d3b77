use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FALLBACK_SUMMARY: &str = "The AI failed to produce a structured response.";
pub const FALLBACK_PRO: &str = "Error parsing response";
pub const FALLBACK_CON: &str = "Internal AI error";
pub const FALLBACK_IMPROVEMENT: &str = "Try simplifying the job description";

/// The structured report returned by `POST /analyze`.
///
/// `extra` carries any additional keys the model emitted so they reach the front end untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 0..=100
    pub score: u8,
    pub summary: String,
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub improvements: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MatchResult {
    /// The deterministic report substituted whenever the model reply cannot be recovered.
    pub fn fallback() -> Self {
        Self {
            score: 0,
            summary: FALLBACK_SUMMARY.to_string(),
            pros: vec![FALLBACK_PRO.to_string()],
            cons: vec![FALLBACK_CON.to_string()],
            improvements: vec![FALLBACK_IMPROVEMENT.to_string()],
            extra: Map::new(),
        }
    }
}
