//! Best-effort recovery of a JSON value from model output.
//!
//! Models wrap structured answers in explanatory prose and markdown fences.
//! [`extract_json`] tolerates one optional fence and arbitrary narration
//! around the value, and never fails loudly: anything it cannot recover
//! yields `None`.
//!
//! Locating the value uses a depth-tracking scan that understands JSON string
//! literals, so braces inside strings and trailing prose (even a second JSON
//! value) do not disturb the slice.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// A fenced block labeled `json`.
static JSON_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```json\b[ \t]*\r?\n?(.*?)(?:```|\z)").expect("valid json fence regex")
});

/// Any fenced block, with or without a label.
static ANY_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[\w-]*[ \t]*\r?\n?(.*?)(?:```|\z)").expect("valid fence regex")
});

/// Extract and deserialize the first JSON object or array in `text`.
///
/// Returns `None` for empty input, text without a balanced object/array, or a
/// value that does not deserialize into `T`.
pub fn extract_json<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_with(text, find_json_span)
}

/// Extract the first JSON object or array as an untyped value.
pub fn extract_json_value(text: &str) -> Option<serde_json::Value> {
    extract_json(text)
}

/// Extract and deserialize the first JSON object in `text`.
///
/// Arrays are never considered, so a bracketed citation such as `[1]` ahead
/// of the object neither hides it nor gets decoded in its place.
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Option<T> {
    extract_with(text, find_object_span)
}

fn extract_with<T: DeserializeOwned>(text: &str, locate: fn(&str) -> Option<&str>) -> Option<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let working = fenced_body(trimmed).unwrap_or(trimmed);

    let Some(span) = locate(working) else {
        debug!(
            text_len = trimmed.len(),
            "No balanced JSON value found in model output"
        );
        return None;
    };

    match serde_json::from_str::<T>(span) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                error = %e,
                span_len = span.len(),
                "Failed to parse JSON extracted from model output"
            );
            None
        }
    }
}

/// Interior of the first `json`-labeled fence, else of the first fence of any
/// label. An unclosed fence runs to the end of the text.
fn fenced_body(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .or_else(|| ANY_FENCE.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Locate the outermost JSON object or array starting at the earliest `{` or
/// `[` in `text`.
///
/// The scan tracks nesting with a stack of expected closers and skips bracket
/// characters inside string literals (honouring `\` escapes). Returns `None`
/// when there is no opener, when the value never closes, or when closers are
/// mismatched.
pub fn find_json_span(text: &str) -> Option<&str> {
    let start = match (text.find('{'), text.find('[')) {
        (Some(object), Some(array)) => object.min(array),
        (Some(object), None) => object,
        (None, Some(array)) => array,
        (None, None) => return None,
    };
    balanced_span(text, start)
}

/// Like [`find_json_span`], but only an object (starting at the first `{`)
/// qualifies.
pub fn find_object_span(text: &str) -> Option<&str> {
    balanced_span(text, text.find('{')?)
}

fn balanced_span(text: &str, start: usize) -> Option<&str> {
    let mut expected: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => expected.push('}'),
            '[' => expected.push(']'),
            '}' | ']' => {
                if expected.pop() != Some(ch) {
                    return None;
                }
                if expected.is_empty() {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn test_plain_object() {
        let value = extract_json_value(r#"{"a": 1}"#).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn test_fenced_object_with_prose() {
        let text = "Here is what I found:\n```json\n{\"name\": \"Notes\", \"tags\": [1, 2]}\n```\nLet me know if you need more.";
        let value = extract_json_value(text).unwrap();
        assert_eq!(value, json!({"name": "Notes", "tags": [1, 2]}));
    }

    #[test]
    fn test_unlabeled_fence() {
        let text = "```\n[{\"name\": \"A\"}]\n```";
        let value = extract_json_value(text).unwrap();
        assert_eq!(value, json!([{"name": "A"}]));
    }

    #[test]
    fn test_json_fence_preferred_over_earlier_fence() {
        let text = "```text\n{\"wrong\": true}\n```\nand\n```json\n{\"right\": true}\n```";
        let value = extract_json_value(text).unwrap();
        assert_eq!(value, json!({"right": true}));
    }

    #[test]
    fn test_unclosed_fence_runs_to_end() {
        let text = "```json\n{\"a\": [1, 2, 3]}";
        assert_eq!(extract_json_value(text).unwrap(), json!({"a": [1, 2, 3]}));
    }

    #[test]
    fn test_earlier_array_wins() {
        let text = r#"Results: [{"name": "A"}, {"name": "B"}] done"#;
        let value = extract_json_value(text).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_earlier_object_wins() {
        let text = r#"{"items": [1, 2]} trailing [not json"#;
        assert_eq!(extract_json_value(text).unwrap(), json!({"items": [1, 2]}));
    }

    #[test]
    fn test_braces_inside_strings() {
        let text = r#"Answer: {"summary": "uses {curly} and ] brackets", "ok": true} fin"#;
        let value = extract_json_value(text).unwrap();
        assert_eq!(value["summary"], "uses {curly} and ] brackets");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"quote": "she said \"hi}\"", "n": 1}"#;
        let value = extract_json_value(text).unwrap();
        assert_eq!(value["n"], 1);
    }

    #[test]
    fn test_second_top_level_value_ignored() {
        let text = r#"{"a": 1} and also {"b": 2}"#;
        assert_eq!(extract_json_value(text).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(extract_json_value("").is_none());
        assert!(extract_json_value("   \n\t").is_none());
    }

    #[test]
    fn test_unbalanced_returns_none() {
        assert!(extract_json_value(r#"{"a": {"b": 1}"#).is_none());
        assert!(extract_json_value("[1, 2").is_none());
        assert!(extract_json_value("no brackets at all").is_none());
    }

    #[test]
    fn test_mismatched_closer_returns_none() {
        assert!(find_json_span(r#"{"a": [1, 2}"#).is_none());
    }

    #[test]
    fn test_invalid_json_inside_brackets() {
        assert!(extract_json_value("{not: valid, json}").is_none());
    }

    #[test]
    fn test_typed_extraction_mismatch_is_none() {
        let parsed: Option<Vec<Value>> = extract_json(r#"{"a": 1}"#);
        assert!(parsed.is_none());
    }

    #[test]
    fn test_find_json_span_multibyte() {
        let text = "Résumé → {\"ключ\": \"значение\"} ✓";
        assert_eq!(find_json_span(text), Some("{\"ключ\": \"значение\"}"));
    }

    #[test]
    fn test_object_extraction_skips_leading_citation() {
        let text = r#"Based on [1], here is the result: {"reviewSummary": "Solid."}"#;
        let value: Value = extract_json_object(text).unwrap();
        assert_eq!(value, json!({"reviewSummary": "Solid."}));
    }

    #[test]
    fn test_object_extraction_ignores_bare_arrays() {
        let parsed: Option<Value> = extract_json_object("see source [1].");
        assert!(parsed.is_none());
        assert_eq!(find_object_span("[1, 2]"), None);
    }
}
