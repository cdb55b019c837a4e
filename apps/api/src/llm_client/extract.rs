//! Pulls a JSON object out of free-form model output.
//!
//! Models wrap JSON in prose, code fences, or emit trailing commas. The
//! extractor takes the outermost brace span, parses it, and on failure
//! applies one repair pass before giving up.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("No JSON object found in model output")]
    NoJson,

    #[error("Model output is not valid JSON after repair: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("Model output is missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),
}

fn object_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"))
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",\s*([}\]])").expect("valid regex"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Extracts and parses the outermost `{...}` span of `text`.
pub fn extract_json(text: &str) -> Result<Value, ParseError> {
    let candidate = object_span()
        .find(text)
        .map(|m| m.as_str())
        .ok_or(ParseError::NoJson)?;

    if let Ok(value) = serde_json::from_str(candidate) {
        return Ok(value);
    }

    Ok(serde_json::from_str(&repair(candidate))?)
}

/// Strips trailing commas before closing brackets and collapses whitespace.
fn repair(candidate: &str) -> String {
    let collapsed = whitespace_run().replace_all(candidate, " ");
    trailing_comma().replace_all(&collapsed, "$1").into_owned()
}

/// Fails with `MissingKeys` unless every key is present at the top level.
pub fn require_keys(value: &Value, keys: &[&str]) -> Result<(), ParseError> {
    let missing: Vec<String> = keys
        .iter()
        .filter(|key| value.get(**key).is_none())
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ParseError::MissingKeys(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_trailing_comma_in_prose_is_repaired() {
        let text = r#"Sure! Here is the analysis: {"a":1,} Hope this helps."#;
        assert_eq!(extract_json(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_no_brace_is_no_json() {
        assert!(matches!(
            extract_json("I cannot help with that."),
            Err(ParseError::NoJson)
        ));
    }

    #[test]
    fn test_open_brace_without_close_is_no_json() {
        assert!(matches!(extract_json("{ \"a\": 1"), Err(ParseError::NoJson)));
    }

    #[test]
    fn test_code_fenced_json_is_extracted() {
        let text = "```json\n{\n  \"classification\": \"Rule-Based\"\n}\n```";
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"classification": "Rule-Based"})
        );
    }

    #[test]
    fn test_nested_trailing_commas_are_repaired() {
        let text = "{\n \"skills\": [\"SQL\", \"Docker\",\n ],\n \"plan\": {\"step\": 1,},\n}";
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"skills": ["SQL", "Docker"], "plan": {"step": 1}})
        );
    }

    #[test]
    fn test_greedy_match_spans_outermost_braces() {
        let text = r#"{"outer": {"inner": true}} trailing"#;
        assert_eq!(
            extract_json(text).unwrap(),
            json!({"outer": {"inner": true}})
        );
    }

    #[test]
    fn test_unrepairable_json_is_invalid() {
        assert!(matches!(
            extract_json("{ this is not json }"),
            Err(ParseError::Invalid(_))
        ));
    }

    #[test]
    fn test_require_keys_lists_every_missing_key() {
        let value = json!({"classification": "Rule-Based"});
        match require_keys(&value, &["classification", "missing_skills", "action_plan"]) {
            Err(ParseError::MissingKeys(keys)) => {
                assert_eq!(keys, vec!["missing_skills", "action_plan"]);
            }
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_require_keys_accepts_complete_object() {
        let value = json!({"a": 1, "b": null});
        assert!(require_keys(&value, &["a", "b"]).is_ok());
    }
}
