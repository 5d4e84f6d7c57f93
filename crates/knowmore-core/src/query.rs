//! Search query extraction from web-search call arguments.

use serde_json::Value;

/// Extract the search query from tool call arguments.
///
/// Arguments arrive either as a JSON-encoded string or already structured.
/// A string that is not valid JSON is taken verbatim as the query. An empty
/// result means there is no tag to add.
pub fn extract_search_query(args: &Value) -> String {
    match args {
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(parsed) => query_field(&parsed),
            Err(_) => raw.clone(),
        },
        Value::Object(_) => query_field(args),
        _ => String::new(),
    }
}

fn query_field(value: &Value) -> String {
    value
        .get("query")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_encoded_string() {
        let args = json!("{\"query\":\"rust async runtimes\"}");
        assert_eq!(extract_search_query(&args), "rust async runtimes");
    }

    #[test]
    fn json_encoded_string_without_query() {
        let args = json!("{\"max_uses\":3}");
        assert_eq!(extract_search_query(&args), "");
    }

    #[test]
    fn unparsable_string_is_literal_query() {
        let args = json!("best pizza in naples");
        assert_eq!(extract_search_query(&args), "best pizza in naples");
    }

    #[test]
    fn partial_json_is_literal_query() {
        let args = json!("{\"query\":\"trunc");
        assert_eq!(extract_search_query(&args), "{\"query\":\"trunc");
    }

    #[test]
    fn structured_arguments() {
        let args = json!({"query": "tokio vs async-std", "max_uses": 2});
        assert_eq!(extract_search_query(&args), "tokio vs async-std");
    }

    #[test]
    fn structured_without_query() {
        assert_eq!(extract_search_query(&json!({})), "");
        assert_eq!(extract_search_query(&json!({"query": 42})), "");
    }

    #[test]
    fn missing_arguments() {
        assert_eq!(extract_search_query(&Value::Null), "");
        assert_eq!(extract_search_query(&json!([1, 2])), "");
    }

    #[test]
    fn json_string_that_parses_to_non_object() {
        // "42" parses as a number, which has no query field.
        assert_eq!(extract_search_query(&json!("42")), "");
    }
}
