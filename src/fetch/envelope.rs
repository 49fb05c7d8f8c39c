//! Response normalization.
//!
//! Upstream gateways disagree on field names for the same concept. All
//! shape handling happens here so callers only ever see one schema:
//!
//! - payload: the `data` member of an object body, else the whole body
//! - error message: first of `message`, `error`, `error.message`, `detail`

use serde_json::{Map, Value};

/// JSON pointers probed for a human-readable error message.
const MESSAGE_POINTERS: &[&str] = &["/message", "/error", "/error/message", "/detail"];

/// Parse a response body. Empty or whitespace-only bodies become `{}`.
pub fn parse_body(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes)
}

/// Unwrap the `{"success": .., "data": ..}` envelope when present.
pub fn extract_payload(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Error message carried by a failure body, if any.
pub fn extract_message(body: &Value) -> Option<String> {
    first_string(body, MESSAGE_POINTERS)
}

/// First non-empty string (or number, rendered as text) found at any of the
/// given JSON pointers.
pub fn first_string(value: &Value, pointers: &[&str]) -> Option<String> {
    pointers.iter().find_map(|pointer| match value.pointer(pointer) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert_eq!(parse_body(b"").unwrap(), json!({}));
        assert_eq!(parse_body(b" \r\n").unwrap(), json!({}));
        assert!(parse_body(b"<html>").is_err());
    }

    #[test]
    fn test_payload_unwraps_data() {
        let body = json!({"success": true, "data": {"x": 1}});
        assert_eq!(extract_payload(body), json!({"x": 1}));

        let bare = json!({"balance": "10.00"});
        assert_eq!(extract_payload(bare.clone()), bare);

        assert_eq!(extract_payload(json!([1, 2])), json!([1, 2]));
    }

    #[test]
    fn test_message_aliases() {
        assert_eq!(
            extract_message(&json!({"message": "Token expired"})).as_deref(),
            Some("Token expired")
        );
        assert_eq!(
            extract_message(&json!({"error": {"message": "upstream down"}})).as_deref(),
            Some("upstream down")
        );
        assert_eq!(
            extract_message(&json!({"error": "bad gateway"})).as_deref(),
            Some("bad gateway")
        );
        assert_eq!(extract_message(&json!({"message": "  "})), None);
        assert_eq!(extract_message(&json!({})), None);
    }
}
