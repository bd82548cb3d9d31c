//! Locate the first brace-delimited JSON object inside free-form model output.
//!
//! Models asked for "JSON only" still wrap it in prose or code fences. The
//! scanner walks the text once with a depth counter: it starts at the first
//! `{` and stops at the brace that brings the depth back to zero. Braces
//! inside string literals are counted too, so an object whose strings hold
//! unbalanced braces is cut early and fails to parse.

use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy)]
enum ScanState {
    /// No `{` seen yet.
    Seeking,
    /// Inside a candidate object starting at byte `start`.
    Inside { start: usize, depth: usize },
}

/// Return the byte span of the first balanced `{ … }` block, if any.
pub(crate) fn first_object_span(text: &str) -> Option<(usize, usize)> {
    let mut state = ScanState::Seeking;

    for (idx, ch) in text.char_indices() {
        state = match (state, ch) {
            (ScanState::Seeking, '{') => ScanState::Inside {
                start: idx,
                depth: 1,
            },
            (ScanState::Inside { start, depth }, '{') => ScanState::Inside {
                start,
                depth: depth + 1,
            },
            (ScanState::Inside { start, depth: 1 }, '}') => return Some((start, idx + 1)),
            (ScanState::Inside { start, depth }, '}') => ScanState::Inside {
                start,
                depth: depth - 1,
            },
            (state, _) => state,
        };
    }

    None
}

/// Parse the first balanced object in `text`.
///
/// Only the first candidate is tried; if it is not a valid JSON object the
/// result is `None`.
pub fn first_json_object(text: &str) -> Option<Map<String, Value>> {
    let (start, end) = first_object_span(text)?;
    match serde_json::from_str::<Value>(&text[start..end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_object() {
        let obj = first_json_object(r#"{"a": 1}"#).unwrap();
        assert_eq!(obj["a"], 1);
    }

    #[test]
    fn object_wrapped_in_prose_and_fence() {
        let text = "Here you go:\n```json\n{\"tldr_bullets\": [\"x\"], \"nested\": {\"k\": {}}}\n```\nThanks!";
        let obj = first_json_object(text).unwrap();
        assert_eq!(obj["tldr_bullets"][0], "x");
        assert!(obj["nested"]["k"].is_object());
    }

    #[test]
    fn only_first_object_is_considered() {
        let text = r#"{"first": true} and then {"second": true}"#;
        let obj = first_json_object(text).unwrap();
        assert!(obj.contains_key("first"));
        assert!(!obj.contains_key("second"));
    }

    #[test]
    fn unbalanced_or_missing() {
        assert!(first_json_object("no braces at all").is_none());
        assert!(first_json_object(r#"{"open": {"never": "closed""#).is_none());
        assert!(first_object_span("}{").is_none());
    }

    #[test]
    fn invalid_first_candidate_is_none() {
        assert!(first_json_object("{not json} {\"ok\": 1}").is_none());
    }

    #[test]
    fn multibyte_text_before_object() {
        let text = "Odpowiedź — zgłębiona: {\"ok\": \"źródło\"}";
        let (start, end) = first_object_span(text).unwrap();
        assert_eq!(&text[start..end], "{\"ok\": \"źródło\"}");
    }

    #[test]
    fn brace_inside_string_cuts_early() {
        assert!(first_json_object(r#"{"s": "}"}"#).is_none());
    }
}
