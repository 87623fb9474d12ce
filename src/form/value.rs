//! Best-effort conversion of raw form values into JSON values

use serde_json::Value;

use crate::error::{CodecError, CodecResult};

/// Convert a raw form value into a JSON value
///
/// The value is first parsed as a JSON literal (`42`, `true`, `null`, `{"a":1}`).
/// Failing that, it is parsed as the body of a JSON string. Values that break both
/// forms (unescaped quotes, control characters) are rejected.
pub fn coerce_value(raw: &str) -> CodecResult<Value> {
    if let Ok(value) = serde_json::from_str(raw) {
        return Ok(value);
    }
    serde_json::from_str(&format!("\"{}\"", raw)).map_err(|source| CodecError::InvalidValue {
        raw: raw.to_string(),
        source,
    })
}

/// Render a JSON leaf value as a raw form value
///
/// Non-string leaves are written as JSON text. Strings are written as-is when
/// [`coerce_value`] reads them back unchanged, and JSON-quoted otherwise (`"42"`,
/// `"true"`, text with quotes or backslashes), so the decoder gets the same leaf back.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => match coerce_value(text) {
            Ok(Value::String(read_back)) if read_back == *text => text.clone(),
            _ => value.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_coerce_json_literals() {
        assert_eq!(coerce_value("42").unwrap(), json!(42));
        assert_eq!(coerce_value("-1.5").unwrap(), json!(-1.5));
        assert_eq!(coerce_value("true").unwrap(), json!(true));
        assert_eq!(coerce_value("null").unwrap(), Value::Null);
        assert_eq!(coerce_value("[1,2]").unwrap(), json!([1, 2]));
        assert_eq!(coerce_value(r#"{"a":"b"}"#).unwrap(), json!({"a": "b"}));
        assert_eq!(coerce_value(r#""quoted""#).unwrap(), json!("quoted"));
    }

    #[test]
    fn test_coerce_free_text() {
        assert_eq!(coerce_value("hello world").unwrap(), json!("hello world"));
        assert_eq!(coerce_value("").unwrap(), json!(""));
        assert_eq!(coerce_value("{broken").unwrap(), json!("{broken"));
        // escapes are interpreted by the string fallback
        assert_eq!(coerce_value(r"tab\there").unwrap(), json!("tab\there"));
    }

    #[test]
    fn test_coerce_rejects_unrepresentable() {
        match coerce_value(r#"say "hi""#) {
            Err(err @ CodecError::InvalidValue { .. }) => {
                assert!(err.is_malformed_input());
                assert!(err.to_string().contains("say"));
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }

        assert!(coerce_value("line\nbreak").is_err());
        assert!(coerce_value(r"trailing\").is_err());
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&json!("plain")), "plain");
        assert_eq!(render_value(&json!(3)), "3");
        assert_eq!(render_value(&Value::Null), "null");
        assert_eq!(coerce_value(&render_value(&json!(false))).unwrap(), json!(false));
    }

    #[test]
    fn test_render_quotes_ambiguous_strings() {
        assert_eq!(render_value(&json!("42")), r#""42""#);
        assert_eq!(render_value(&json!("true")), r#""true""#);
        assert_eq!(render_value(&json!(r"C:\new")), r#""C:\\new""#);
        assert_eq!(render_value(&json!("")), "");

        for text in ["42", "true", "null", r"C:\new", r#"say "hi""#, "two\nlines", "", "plain"] {
            let leaf = json!(text);
            assert_eq!(coerce_value(&render_value(&leaf)).unwrap(), leaf, "{:?}", text);
        }
    }
}
