//! Match Parser. Recovers a `MatchResult` from a free-form model reply.
//!
//! Models wrap JSON in prose and markdown fences even when told not to. The parser
//! slices from the first `{` to the last `}` and decodes that slice strictly. When no
//! such pair exists the whole reply is decoded instead. Anything that still fails is
//! an error; the match stage substitutes `MatchResult::fallback()` for it so the
//! endpoint always answers with a well-formed report.
//!
//! Decoded objects are normalised, not rejected:
//! - keys with the expected type pass through unchanged
//! - missing keys are backfilled (`score` 0, a placeholder summary, empty lists)
//! - `score` is rounded if fractional, parsed if given as a string, clamped to 0..=100
//! - a list key given as a single string becomes a one-element list
//! - unknown keys are preserved in `MatchResult::extra`

use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::MatchResult;

pub const MISSING_SUMMARY: &str = "No summary was provided.";

#[derive(Debug, Error)]
pub enum MatchParseError {
    #[error("reply is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("reply decoded to a JSON {0}, expected an object")]
    NotAnObject(&'static str),
}

/// Locates and decodes the JSON object in `raw`.
pub fn parse_match_response(raw: &str) -> Result<MatchResult, MatchParseError> {
    let value: Value = serde_json::from_str(json_candidate(raw))?;
    match value {
        Value::Object(map) => Ok(normalize(map)),
        other => Err(MatchParseError::NotAnObject(kind_of(&other))),
    }
}

/// The slice between the first `{` and the last `}` inclusive, or the whole reply.
fn json_candidate(raw: &str) -> &str {
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw,
    }
}

fn normalize(mut map: Map<String, Value>) -> MatchResult {
    let score = map.remove("score").map(|v| score_from(&v)).unwrap_or(0);
    let summary = match map.remove("summary") {
        Some(Value::String(s)) => s,
        _ => MISSING_SUMMARY.to_string(),
    };
    let pros = list_from(map.remove("pros"));
    let cons = list_from(map.remove("cons"));
    let improvements = list_from(map.remove("improvements"));

    MatchResult {
        score,
        summary,
        pros,
        cons,
        improvements,
        extra: map,
    }
}

fn score_from(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn list_from(value: Option<Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter(|item| !item.is_null())
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> MatchResult {
        MatchResult {
            score: 72,
            summary: "Good fit".to_string(),
            pros: vec!["A".to_string()],
            cons: vec!["B".to_string()],
            improvements: vec!["C".to_string()],
            extra: Map::new(),
        }
    }

    #[test]
    fn test_fenced_reply_with_preamble() {
        let raw = "Sure! ```json\n{\"score\": 72, \"summary\": \"Good fit\", \"pros\": [\"A\"], \"cons\": [\"B\"], \"improvements\": [\"C\"]}\n```";
        assert_eq!(parse_match_response(raw).unwrap(), sample());
    }

    #[test]
    fn test_refusal_is_a_decode_error() {
        let err = parse_match_response("I cannot help with that.").unwrap_err();
        assert!(matches!(err, MatchParseError::Decode(_)));
    }

    #[test]
    fn test_trailing_commentary_is_ignored() {
        let raw = r#"{"score": 40, "summary": "Weak", "pros": [], "cons": ["No Rust"], "improvements": []}
        Let me know if you want more detail!"#;
        let result = parse_match_response(raw).unwrap();
        assert_eq!(result.score, 40);
        assert_eq!(result.cons, vec!["No Rust"]);
    }

    #[test]
    fn test_nested_braces_inside_strings_survive() {
        let raw = r#"Result: {"score": 55, "summary": "Uses {braces} in text", "pros": ["x"], "cons": [], "improvements": []} done"#;
        let result = parse_match_response(raw).unwrap();
        assert_eq!(result.summary, "Uses {braces} in text");
    }

    #[test]
    fn test_reversed_braces_are_rejected() {
        assert!(matches!(
            parse_match_response("} nothing here {"),
            Err(MatchParseError::Decode(_))
        ));
    }

    #[test]
    fn test_open_brace_only_is_rejected() {
        assert!(parse_match_response("{\"score\": 10, \"summary\": \"cut off").is_err());
    }

    #[test]
    fn test_malformed_slice_is_rejected() {
        assert!(parse_match_response("{score: 72, summary: 'single quotes'}").is_err());
    }

    #[test]
    fn test_bare_number_is_not_an_object() {
        let err = parse_match_response("42").unwrap_err();
        assert!(matches!(err, MatchParseError::NotAnObject("number")));
    }

    #[test]
    fn test_empty_reply_is_rejected() {
        assert!(parse_match_response("").is_err());
    }

    #[test]
    fn test_round_trip_of_serialized_results() {
        let mut with_extra = sample();
        with_extra
            .extra
            .insert("matching_skills".to_string(), json!(["Rust", "SQL"]));
        let cases = vec![
            sample(),
            MatchResult::fallback(),
            with_extra,
            MatchResult {
                score: 100,
                summary: String::new(),
                pros: vec![],
                cons: vec![],
                improvements: vec!["Add metrics".to_string(), "Mention Kafka".to_string()],
                extra: Map::new(),
            },
        ];
        for expected in cases {
            let encoded = serde_json::to_string_pretty(&expected).unwrap();
            let wrapped = format!("Here you go:\n```json\n{encoded}\n```");
            assert_eq!(parse_match_response(&encoded).unwrap(), expected);
            assert_eq!(parse_match_response(&wrapped).unwrap(), expected);
        }
    }

    #[test]
    fn test_complete_object_passes_through_unchanged() {
        let original = json!({
            "score": 88,
            "summary": "Strong",
            "pros": ["Rust", "Tokio"],
            "cons": [],
            "improvements": ["Quantify impact"],
            "missing_skills": ["Kubernetes"]
        });
        let raw = format!("Analysis follows. {original} Thanks.");
        let result = parse_match_response(&raw).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), original);
    }

    #[test]
    fn test_missing_keys_are_backfilled() {
        let result = parse_match_response(r#"{"score": 61}"#).unwrap();
        assert_eq!(result.score, 61);
        assert_eq!(result.summary, MISSING_SUMMARY);
        assert!(result.pros.is_empty());
        assert!(result.cons.is_empty());
        assert!(result.improvements.is_empty());
    }

    #[test]
    fn test_empty_object_gets_zero_score() {
        let result = parse_match_response("{}").unwrap();
        assert_eq!(result.score, 0);
        assert_eq!(result.summary, MISSING_SUMMARY);
    }

    #[test]
    fn test_score_variants_are_normalized() {
        let cases = [
            (json!(72.6), 73),
            (json!("85"), 85),
            (json!("64%"), 64),
            (json!(140), 100),
            (json!(-5), 0),
            (json!("high"), 0),
            (json!(null), 0),
        ];
        for (score, expected) in cases {
            let raw = json!({ "score": score }).to_string();
            assert_eq!(
                parse_match_response(&raw).unwrap().score,
                expected,
                "score input {score}"
            );
        }
    }

    #[test]
    fn test_list_shapes_are_normalized() {
        let raw = json!({
            "score": 50,
            "summary": "ok",
            "pros": "Single strength",
            "cons": ["B", null, 3],
            "improvements": {"not": "a list"}
        })
        .to_string();
        let result = parse_match_response(&raw).unwrap();
        assert_eq!(result.pros, vec!["Single strength"]);
        assert_eq!(result.cons, vec!["B", "3"]);
        assert!(result.improvements.is_empty());
    }

    #[test]
    fn test_json_candidate_slicing() {
        assert_eq!(json_candidate("abc {\"a\":1} def"), "{\"a\":1}");
        assert_eq!(json_candidate("no braces"), "no braces");
        assert_eq!(json_candidate("} {"), "} {");
    }
}
