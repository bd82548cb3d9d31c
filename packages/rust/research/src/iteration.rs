//! Structured research results and source merging.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::scan::first_json_object;

/// Field names of the structured plan a model is asked to return.
const TLDR_BULLETS: &str = "tldr_bullets";
const SOURCES: &str = "sources";
const FOLLOWUP_QUERIES: &str = "followup_queries";

/// Merged source lists are cut to this many entries.
pub const MAX_MERGED_SOURCES: usize = 12;

/// A cited web page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// One structured research pass.
///
/// The typed fields are read leniently from whatever object the model
/// returned. The object itself is kept as-is (with the three fields filled
/// in when absent) so it can be quoted verbatim in the synthesis prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchIteration {
    pub tldr_bullets: Vec<String>,
    /// Entries with a non-empty url, in the order given.
    pub sources: Vec<Source>,
    pub followup_queries: Vec<String>,
    payload: Map<String, Value>,
}

impl Default for ResearchIteration {
    fn default() -> Self {
        Self::from_object(Map::new())
    }
}

impl ResearchIteration {
    /// Build an iteration from the model's free-text reply.
    ///
    /// A reply with no parseable object yields an empty iteration.
    pub fn from_reply(reply: &str) -> Self {
        match first_json_object(reply) {
            Some(obj) => Self::from_object(obj),
            None => {
                warn!("no JSON object in structured reply, using empty iteration");
                Self::default()
            }
        }
    }

    /// Build an iteration from a parsed JSON object.
    pub fn from_object(mut payload: Map<String, Value>) -> Self {
        for key in [TLDR_BULLETS, SOURCES, FOLLOWUP_QUERIES] {
            payload
                .entry(key)
                .or_insert_with(|| Value::Array(Vec::new()));
        }

        let tldr_bullets = text_items(&payload[TLDR_BULLETS]).flatten().collect();
        // Positional: a null entry still occupies its slot.
        let followup_queries = text_items(&payload[FOLLOWUP_QUERIES])
            .map(Option::unwrap_or_default)
            .collect();
        let sources = payload[SOURCES]
            .as_array()
            .map(|items| items.iter().filter_map(source_item).collect())
            .unwrap_or_default();

        Self {
            tldr_bullets,
            sources,
            followup_queries,
            payload,
        }
    }

    /// The object as returned by the model, serialized compactly.
    pub fn payload_json(&self) -> String {
        Value::Object(self.payload.clone()).to_string()
    }

    /// The `n`th follow-up query, or `None` when absent or blank.
    pub fn followup(&self, n: usize) -> Option<&str> {
        self.followup_queries
            .get(n)
            .map(|q| q.trim())
            .filter(|q| !q.is_empty())
    }
}

/// One entry per element of a JSON array; other scalars are stringified,
/// `null` yields `None`.
fn text_items(value: &Value) -> impl Iterator<Item = Option<String>> + '_ {
    value.as_array().into_iter().flatten().map(|item| match item {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    })
}

/// A `{title, url}` object with a non-empty url.
fn source_item(item: &Value) -> Option<Source> {
    let obj = item.as_object()?;
    let url = obj.get("url")?.as_str()?.trim();
    if url.is_empty() {
        return None;
    }
    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim();

    Some(Source {
        title: title.to_string(),
        url: url.to_string(),
    })
}

/// Merge sources across iterations, deduplicated by url.
///
/// The first occurrence of a url wins. Iterations are walked in the order
/// given and each iteration's own order is kept. A blank title is replaced
/// by the url. At most `limit` entries are returned.
pub fn merge_sources<'a, I>(iterations: I, limit: usize) -> Vec<Source>
where
    I: IntoIterator<Item = &'a ResearchIteration>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();

    for source in iterations.into_iter().flat_map(|it| &it.sources) {
        if !seen.insert(source.url.as_str()) {
            continue;
        }
        let title = if source.title.is_empty() {
            source.url.clone()
        } else {
            source.title.clone()
        };
        merged.push(Source {
            title,
            url: source.url.clone(),
        });
    }

    merged.truncate(limit);
    merged
}

/// `[n] title — url` lines, numbered from 1.
pub fn numbered_sources(sources: &[Source]) -> String {
    sources
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {} — {}", i + 1, s.title, s.url))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn iteration(sources: &[(&str, &str)]) -> ResearchIteration {
        let items: Vec<Value> = sources
            .iter()
            .map(|(title, url)| json!({ "title": title, "url": url }))
            .collect();
        let Value::Object(obj) = json!({ "sources": items }) else {
            unreachable!()
        };
        ResearchIteration::from_object(obj)
    }

    #[test]
    fn empty_reply_has_all_fields() {
        let it = ResearchIteration::from_reply("Sorry, I cannot help with that.");
        assert!(it.tldr_bullets.is_empty());
        assert!(it.sources.is_empty());
        assert!(it.followup_queries.is_empty());

        let payload: Value = serde_json::from_str(&it.payload_json()).unwrap();
        assert_eq!(
            payload,
            json!({ "tldr_bullets": [], "sources": [], "followup_queries": [] })
        );
    }

    #[test]
    fn lenient_field_reading() {
        let reply = r#"```json
{
  "tldr_bullets": ["one", 2, null],
  "sources": [
    {"title": " Docs ", "url": " https://docs.example.com "},
    {"title": "no url"},
    "https://bare-string.example.com",
    {"title": "", "url": "https://untitled.example.com"}
  ],
  "extra": "kept"
}
```"#;
        let it = ResearchIteration::from_reply(reply);
        assert_eq!(it.tldr_bullets, vec!["one", "2"]);
        assert_eq!(it.sources.len(), 2);
        assert_eq!(it.sources[0].title, "Docs");
        assert_eq!(it.sources[0].url, "https://docs.example.com");
        assert!(it.followup_queries.is_empty());
        assert!(it.payload_json().contains("\"extra\":\"kept\""));
    }

    #[test]
    fn followup_skips_blank() {
        let Value::Object(obj) = json!({ "followup_queries": ["  ", "second"] }) else {
            unreachable!()
        };
        let it = ResearchIteration::from_object(obj);
        assert_eq!(it.followup(0), None);
        assert_eq!(it.followup(1), Some("second"));
        assert_eq!(it.followup(2), None);
    }

    #[test]
    fn null_followup_keeps_its_position() {
        let Value::Object(obj) = json!({ "followup_queries": [null, "second"] }) else {
            unreachable!()
        };
        let it = ResearchIteration::from_object(obj);
        assert_eq!(it.followup(0), None);
        assert_eq!(it.followup(1), Some("second"));
    }

    #[test]
    fn payload_keeps_model_key_order() {
        let reply = r#"{"tldr_bullets": ["a"], "sources": [], "followup_queries": ["x"], "extra": 1}"#;
        let it = ResearchIteration::from_reply(reply);
        assert_eq!(
            it.payload_json(),
            r#"{"tldr_bullets":["a"],"sources":[],"followup_queries":["x"],"extra":1}"#
        );
    }

    #[test]
    fn defaulted_keys_are_appended() {
        let it = ResearchIteration::from_reply(r#"{"zeta": true, "sources": []}"#);
        assert_eq!(
            it.payload_json(),
            r#"{"zeta":true,"sources":[],"tldr_bullets":[],"followup_queries":[]}"#
        );
    }

    #[test]
    fn merge_dedups_first_wins() {
        let a = iteration(&[("A", "https://a"), ("B", "https://b")]);
        let b = iteration(&[("B again", "https://b"), ("", "https://c")]);
        let c = iteration(&[("A again", "https://a"), ("D", "https://d")]);

        let merged = merge_sources([&a, &b, &c], MAX_MERGED_SOURCES);
        let urls: Vec<&str> = merged.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a", "https://b", "https://c", "https://d"]);
        assert_eq!(merged[1].title, "B");
        assert_eq!(merged[2].title, "https://c");
    }

    #[test]
    fn merge_never_duplicates_and_caps_length() {
        let many: Vec<(String, String)> = (0..10)
            .map(|i| (format!("t{i}"), format!("https://site/{i}")))
            .collect();
        let refs: Vec<(&str, &str)> = many.iter().map(|(t, u)| (t.as_str(), u.as_str())).collect();
        let a = iteration(&refs);
        let b = iteration(&refs[5..]);
        let shifted: Vec<(String, String)> = (8..18)
            .map(|i| (format!("t{i}"), format!("https://site/{i}")))
            .collect();
        let shifted_refs: Vec<(&str, &str)> =
            shifted.iter().map(|(t, u)| (t.as_str(), u.as_str())).collect();
        let c = iteration(&shifted_refs);

        let merged = merge_sources([&a, &b, &c], MAX_MERGED_SOURCES);
        assert_eq!(merged.len(), MAX_MERGED_SOURCES);
        let unique: HashSet<&str> = merged.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(unique.len(), merged.len());
        assert_eq!(merged.last().unwrap().url, "https://site/11");
    }

    #[test]
    fn numbered_source_lines() {
        let sources = vec![
            Source { title: "A".into(), url: "https://a".into() },
            Source { title: "B".into(), url: "https://b".into() },
        ];
        assert_eq!(numbered_sources(&sources), "[1] A — https://a\n[2] B — https://b");
    }
}
