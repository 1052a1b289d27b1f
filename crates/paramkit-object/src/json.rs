use serde_json::Value;

/// Parse JSON text, returning `None` instead of an error on malformed input.
pub fn parse_json(src: &str) -> Option<Value> {
    serde_json::from_str(src).ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_or_yields_none() {
        assert_eq!(parse_json(r#"{"a":[1,2]}"#), Some(json!({"a": [1, 2]})));
        assert_eq!(parse_json("null"), Some(Value::Null));
        assert_eq!(parse_json("{nope"), None);
        assert_eq!(parse_json(""), None);
    }
}
