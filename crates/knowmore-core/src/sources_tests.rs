//! Unit tests for search result normalization.

use super::*;
use serde_json::json;

#[cfg(test)]
mod record_defaults_tests {
    use super::*;

    #[test]
    fn full_record() {
        let record = SearchResultRecord::from_raw(
            "0-result-0".to_string(),
            &json!({
                "title": "The Rust Book",
                "url": "https://doc.rust-lang.org/book/",
                "description": "Learn Rust",
                "snippet": "ignored"
            }),
        );

        assert_eq!(record.id, "0-result-0");
        assert_eq!(record.title, "The Rust Book");
        assert_eq!(record.url, "https://doc.rust-lang.org/book/");
        assert_eq!(record.preview, "Learn Rust");
        assert_eq!(record.favicon, "D");
        assert_eq!(record.domain, "doc.rust-lang.org");
    }

    #[test]
    fn snippet_used_when_description_missing() {
        let record = SearchResultRecord::from_raw(
            "x".to_string(),
            &json!({"url": "https://example.com", "snippet": "from snippet"}),
        );
        assert_eq!(record.preview, "from snippet");
        assert_eq!(record.title, UNTITLED);
    }

    #[test]
    fn empty_description_falls_through() {
        let record = SearchResultRecord::from_raw(
            "x".to_string(),
            &json!({"description": "", "snippet": "s"}),
        );
        assert_eq!(record.preview, "s");
    }

    #[test]
    fn empty_url_uses_fallbacks() {
        let record = SearchResultRecord::from_raw("x".to_string(), &json!({"url": ""}));
        assert_eq!(record.url, "");
        assert_eq!(record.favicon, "?");
        assert_eq!(record.domain, "unknown");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let record = SearchResultRecord::from_raw("x".to_string(), &json!({}));
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.url, "");
        assert_eq!(record.preview, "No preview available");
        assert_eq!(record.favicon, "?");
        assert_eq!(record.domain, "unknown");
    }

    #[test]
    fn malformed_url_uses_fallbacks() {
        let record =
            SearchResultRecord::from_raw("x".to_string(), &json!({"url": "not a url at all"}));
        assert_eq!(record.url, "not a url at all");
        assert_eq!(record.favicon, "?");
        assert_eq!(record.domain, "unknown");
    }

    #[test]
    fn url_without_host_uses_fallbacks() {
        let record =
            SearchResultRecord::from_raw("x".to_string(), &json!({"url": "mailto:me@example.com"}));
        assert_eq!(record.domain, "unknown");
        assert_eq!(record.favicon, "?");
    }

    #[test]
    fn non_string_fields_are_defaulted() {
        let record = SearchResultRecord::from_raw(
            "x".to_string(),
            &json!({"title": 7, "url": ["https://example.com"]}),
        );
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.url, "");
    }

    #[test]
    fn non_object_element_gets_every_default() {
        let record = SearchResultRecord::from_raw("x".to_string(), &json!("just a string"));
        assert_eq!(record.title, "Untitled");
        assert_eq!(record.domain, "unknown");
    }
}

#[cfg(test)]
mod normalize_tests {
    use super::*;

    #[test]
    fn ids_use_prefix_and_index() {
        let records = normalize_search_results(
            &json!([
                {"title": "a", "url": "https://a.example"},
                {"title": "b", "url": "https://b.example"}
            ]),
            "3-",
        );
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3-result-0", "3-result-1"]);
    }

    #[test]
    fn results_envelope_is_unwrapped() {
        let records = normalize_search_results(
            &json!({"results": [{"title": "a"}], "summary": "Found 1"}),
            "0-",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "a");
    }

    #[test]
    fn string_payload_is_empty() {
        assert!(normalize_search_results(&json!("oops"), "0-").is_empty());
    }

    #[test]
    fn object_without_results_is_empty() {
        assert!(normalize_search_results(&json!({"error": "rate limited"}), "0-").is_empty());
    }

    #[test]
    fn null_payload_is_empty() {
        assert!(normalize_search_results(&Value::Null, "0-").is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let records = normalize_search_results(
            &json!([{"title": "first"}, {"title": "second"}, {"title": "third"}]),
            "1-",
        );
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}

#[cfg(test)]
mod diagnostics_tests {
    use super::*;
    use crate::test_support::capture_logs;
    use tracing::Level;

    #[test]
    fn string_payload_logs_warning() {
        let (records, logs) =
            capture_logs(Level::WARN, || normalize_search_results(&json!("oops"), "0-"));
        assert!(records.is_empty());
        assert!(logs.contains("WARN"), "no warning in {logs:?}");
        assert!(logs.contains("not a sequence"));
        assert!(logs.contains("oops"));
    }

    #[test]
    fn object_without_results_logs_payload() {
        let payload = json!({"error": "rate limited"});
        let (records, logs) =
            capture_logs(Level::WARN, || normalize_search_results(&payload, "0-"));
        assert!(records.is_empty());
        assert!(logs.contains("WARN"));
        assert!(logs.contains("rate limited"));
    }

    #[test]
    fn well_formed_payload_is_silent() {
        let payload = json!([{"title": "a"}]);
        let (records, logs) =
            capture_logs(Level::WARN, || normalize_search_results(&payload, "0-"));
        assert_eq!(records.len(), 1);
        assert!(logs.is_empty(), "unexpected logs {logs:?}");
    }
}
