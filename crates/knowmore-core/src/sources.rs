//! Canonical search result records.
//!
//! Search tools return loosely shaped JSON. Every field is defaulted here so
//! that one odd record, or one malformed result payload, never blanks the rest
//! of the message.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

pub const UNTITLED: &str = "Untitled";
pub const NO_PREVIEW: &str = "No preview available";
pub const UNKNOWN_DOMAIN: &str = "unknown";
pub const UNKNOWN_FAVICON: &str = "?";

/// One entry in an aggregated source list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub preview: String,
    pub favicon: String,
    pub domain: String,
}

impl SearchResultRecord {
    /// Normalize a single raw result. Non-object input gets every default.
    pub fn from_raw(id: String, raw: &Value) -> Self {
        let title = non_empty_str(raw, "title").unwrap_or(UNTITLED).to_string();
        let url = non_empty_str(raw, "url").unwrap_or_default().to_string();
        let preview = non_empty_str(raw, "description")
            .or_else(|| non_empty_str(raw, "snippet"))
            .unwrap_or(NO_PREVIEW)
            .to_string();

        let host = url_host(&url);
        let favicon = host
            .as_deref()
            .and_then(|h| h.chars().next())
            .map_or_else(|| UNKNOWN_FAVICON.to_string(), |c| c.to_uppercase().collect());
        let domain = host.unwrap_or_else(|| UNKNOWN_DOMAIN.to_string());

        Self {
            id,
            title,
            url,
            preview,
            favicon,
            domain,
        }
    }
}

/// Normalize a tool result into canonical records.
///
/// Accepts a bare array or an object wrapping one under `results`. Anything
/// else is logged and treated as empty. Ids are `{id_prefix}result-{index}`.
pub fn normalize_search_results(raw: &Value, id_prefix: &str) -> Vec<SearchResultRecord> {
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!(
                    kind = value_kind(raw),
                    payload = %raw,
                    "Search result payload is not a sequence, ignoring"
                );
                return Vec::new();
            }
        },
        other => {
            tracing::warn!(
                kind = value_kind(other),
                payload = %other,
                "Search result payload is not a sequence, ignoring"
            );
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            SearchResultRecord::from_raw(format!("{id_prefix}result-{index}"), item)
        })
        .collect()
}

fn non_empty_str<'a>(raw: &'a Value, key: &str) -> Option<&'a str> {
    raw.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Host of a URL, or `None` when it is empty, unparsable, or has no host.
fn url_host(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod tests;
