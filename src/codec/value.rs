use crate::types::DecodePolicy;
use serde_json::Value;

/// Prefix some server frameworks put in front of JSON cookie values.
const JSON_PREFIX: &str = "j:";

/// Decode a raw cookie value according to `policy`.
///
/// Malformed structured data falls back to the raw string.
pub fn decode_value(raw: &str, policy: DecodePolicy) -> Value {
    let candidate = raw.strip_prefix(JSON_PREFIX).unwrap_or(raw);

    let parse = match policy {
        DecodePolicy::Raw => false,
        DecodePolicy::Json => true,
        DecodePolicy::Guess => looks_serialized(candidate),
    };

    if parse {
        if let Ok(value) = serde_json::from_str(candidate) {
            return value;
        }
    }

    Value::String(raw.to_string())
}

fn looks_serialized(s: &str) -> bool {
    matches!(s.as_bytes().first(), Some(b'{' | b'[' | b'"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_policy_never_parses() {
        assert_eq!(
            decode_value(r#"{"id":7}"#, DecodePolicy::Raw),
            json!(r#"{"id":7}"#)
        );
    }

    #[test]
    fn test_json_policy_parses_objects_and_scalars() {
        assert_eq!(decode_value(r#"{"id":7}"#, DecodePolicy::Json), json!({"id": 7}));
        assert_eq!(decode_value("42", DecodePolicy::Json), json!(42));
        assert_eq!(decode_value("true", DecodePolicy::Json), json!(true));
    }

    #[test]
    fn test_malformed_falls_back_to_raw() {
        assert_eq!(decode_value("{not json", DecodePolicy::Json), json!("{not json"));
        assert_eq!(decode_value("abc", DecodePolicy::Json), json!("abc"));
        assert_eq!(decode_value("", DecodePolicy::Json), json!(""));
    }

    #[test]
    fn test_guess_only_parses_serialized_looking_values() {
        assert_eq!(decode_value("42", DecodePolicy::Guess), json!("42"));
        assert_eq!(decode_value("[1,2]", DecodePolicy::Guess), json!([1, 2]));
        assert_eq!(decode_value(r#""quoted""#, DecodePolicy::Guess), json!("quoted"));
        assert_eq!(decode_value("", DecodePolicy::Guess), json!(""));
    }

    #[test]
    fn test_json_prefix_is_stripped() {
        assert_eq!(decode_value(r#"j:{"a":1}"#, DecodePolicy::Guess), json!({"a": 1}));
        assert_eq!(decode_value(r#"j:{"a":1}"#, DecodePolicy::Raw), json!(r#"j:{"a":1}"#));
        // Fallback keeps the prefix.
        assert_eq!(decode_value("j:{oops", DecodePolicy::Json), json!("j:{oops"));
    }
}
