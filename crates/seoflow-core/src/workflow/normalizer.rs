//! Response normalization — coerce raw executor output into a
//! canonical step record.
//!
//! The model's output format is not contractually guaranteed: it may
//! be clean JSON, JSON buried in prose or a fenced code block, or free
//! text. Parsing is always best-effort and degrades to a passthrough
//! record; nothing in this module ever fails a step.

use regex::Regex;
use serde_json::{Map, Value};

/// Placeholder used when no analysis-like field can be found at all.
const NO_ANALYSIS: &str = "No analysis provided";

/// Alternate field names promoted to `analysis`, in priority order.
const ANALYSIS_ALIASES: [&str; 4] = ["output", "result", "text", "content"];

/// Extract structured data from a model's text response.
///
/// 1. Look for a ```json fenced block (or a block opened by a bare
///    `{` line) and strict-parse it.
/// 2. Failing that, strict-parse the first greedy `{...}` span found
///    anywhere in the text.
/// 3. Failing that, wrap the raw text as `{"response_text": ...}`.
pub fn parse_structured_text(content: &str) -> Map<String, Value> {
    if let Some(block) = extract_fenced_block(content) {
        if let Ok(Value::Object(map)) = serde_json::from_str(&block) {
            return map;
        }
    }

    // Greedy, non-recursive: first `{` through last `}`
    let span_re = Regex::new(r"(?s)\{.*\}").expect("valid regex");
    if let Some(m) = span_re.find(content) {
        if let Ok(Value::Object(map)) = serde_json::from_str(m.as_str()) {
            return map;
        }
    }

    tracing::debug!("[Normalizer] No parseable JSON found, wrapping raw text");
    let mut map = Map::new();
    map.insert(
        "response_text".to_string(),
        Value::String(content.to_string()),
    );
    map
}

/// Collect the lines of a ```json fenced block, or of a block opened
/// by a line that is exactly `{`.
fn extract_fenced_block(content: &str) -> Option<String> {
    let mut block: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if !in_block && (trimmed == "```json" || trimmed == "{") {
            in_block = true;
            if trimmed == "{" {
                block.push(line);
            }
        } else if in_block && trimmed == "```" {
            break;
        } else if in_block {
            block.push(line);
        }
    }

    if block.is_empty() {
        None
    } else {
        Some(block.join("\n"))
    }
}

/// Normalize a parsed record into the canonical step-result shape.
///
/// Guarantees an `analysis` string (unless a raw `response_text`
/// passthrough is present) and a `recommendations` array, preserving
/// every other field verbatim. Canonical records pass through as a
/// fixed point.
pub fn normalize(raw: Value) -> Map<String, Value> {
    let mut record = match raw {
        Value::Object(map) => map,
        Value::String(s) => {
            let mut map = Map::new();
            map.insert("analysis".to_string(), Value::String(s));
            map
        }
        other => {
            let mut map = Map::new();
            map.insert("analysis".to_string(), Value::String(other.to_string()));
            map
        }
    };

    if !record.contains_key("analysis") && !record.contains_key("response_text") {
        let promoted = ANALYSIS_ALIASES
            .iter()
            .find_map(|alias| record.get(*alias).cloned());
        record.insert(
            "analysis".to_string(),
            promoted.unwrap_or_else(|| Value::String(NO_ANALYSIS.to_string())),
        );
    }

    record
        .entry("recommendations".to_string())
        .or_insert_with(|| Value::Array(Vec::new()));

    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_fenced_json_block() {
        let content = "Here is my analysis:\n```json\n{\"analysis\": \"looks good\"}\n```\nDone.";
        let parsed = parse_structured_text(content);
        assert_eq!(parsed["analysis"], "looks good");
    }

    #[test]
    fn test_parse_bare_brace_block() {
        let content = "{\n  \"analysis\": \"inline\",\n  \"recommendations\": [\"a\"]\n}";
        let parsed = parse_structured_text(content);
        assert_eq!(parsed["analysis"], "inline");
    }

    #[test]
    fn test_parse_embedded_span() {
        let content = "The result is {\"analysis\": \"embedded\"} as requested.";
        let parsed = parse_structured_text(content);
        assert_eq!(parsed["analysis"], "embedded");
    }

    #[test]
    fn test_parse_prose_falls_back_to_passthrough() {
        let content = "I could not produce JSON, sorry.";
        let parsed = parse_structured_text(content);
        assert_eq!(parsed["response_text"], content);
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn test_parse_broken_fence_falls_back() {
        let content = "```json\n{\"analysis\": broken\n```";
        let parsed = parse_structured_text(content);
        assert!(parsed.contains_key("response_text"));
    }

    #[test]
    fn test_normalize_is_fixed_point_on_canonical_records() {
        let canonical = json!({
            "analysis": "done",
            "recommendations": ["a", "b"],
            "issues": {"critical": []}
        });
        let once = normalize(canonical.clone());
        let twice = normalize(Value::Object(once.clone()));
        assert_eq!(Value::Object(once.clone()), canonical);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_promotes_alias_fields_in_priority_order() {
        let record = json!({"result": "from result", "text": "from text"});
        let normalized = normalize(record);
        assert_eq!(normalized["analysis"], "from result");
        assert_eq!(normalized["recommendations"], json!([]));
        // Originals preserved verbatim
        assert_eq!(normalized["result"], "from result");
        assert_eq!(normalized["text"], "from text");
    }

    #[test]
    fn test_normalize_placeholder_when_nothing_promotable() {
        let normalized = normalize(json!({"score": 42}));
        assert_eq!(normalized["analysis"], NO_ANALYSIS);
        assert_eq!(normalized["score"], 42);
    }

    #[test]
    fn test_normalize_keeps_passthrough_without_analysis() {
        let normalized = normalize(json!({"response_text": "raw prose"}));
        assert!(!normalized.contains_key("analysis"));
        assert_eq!(normalized["recommendations"], json!([]));
    }

    #[test]
    fn test_normalize_wraps_plain_string() {
        let normalized = normalize(Value::String("just text".to_string()));
        assert_eq!(normalized["analysis"], "just text");
        assert_eq!(normalized["recommendations"], json!([]));
    }
}
