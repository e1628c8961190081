//! Tolerant parsing of model responses into item objects
//!
//! Models wrap JSON in markdown fences, add chatter before and after it, or
//! return an object holding the array instead of the array itself. Anything
//! that still yields a list of JSON values is accepted here; judging each
//! value is left to the caller.

use serde_json::{Map, Value};

/// The response could not be read as JSON at all
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseParseError {
    #[error("Response is empty")]
    Empty,
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
    #[error("Response JSON is a bare {0}, not a list of items")]
    NotItems(&'static str),
}

/// Extract the proposed item values from a raw model response
pub fn parse_item_objects(raw: &str) -> Result<Vec<Value>, ResponseParseError> {
    let text = strip_code_fences(raw.trim());
    if text.is_empty() {
        return Err(ResponseParseError::Empty);
    }

    let first_error = match serde_json::from_str::<Value>(text) {
        Ok(value) => return into_items(value),
        Err(e) => e.to_string(),
    };

    // Fall back to the outermost bracketed span
    for (open, close) in [('[', ']'), ('{', '}')] {
        if let (Some(start), Some(end)) = (text.find(open), text.rfind(close)) {
            if start < end {
                if let Ok(value) = serde_json::from_str::<Value>(&text[start..=end]) {
                    return into_items(value);
                }
            }
        }
    }

    Err(ResponseParseError::InvalidJson(first_error))
}

fn into_items(value: Value) -> Result<Vec<Value>, ResponseParseError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(object) if looks_like_item(&object) => Ok(vec![Value::Object(object)]),
        Value::Object(mut object) => {
            // {"items": [...]}, {"weapons": [...]} and similar wrappers
            let wrapped = if object.get("items").is_some_and(is_item_list) {
                Some("items".to_string())
            } else {
                object
                    .iter()
                    .find(|(_, v)| is_item_list(v))
                    .map(|(k, _)| k.clone())
            };
            match wrapped.and_then(|key| object.remove(&key)) {
                Some(Value::Array(items)) => Ok(items),
                _ => Ok(vec![Value::Object(object)]),
            }
        }
        Value::String(_) => Err(ResponseParseError::NotItems("string")),
        Value::Number(_) => Err(ResponseParseError::NotItems("number")),
        Value::Bool(_) => Err(ResponseParseError::NotItems("boolean")),
        Value::Null => Err(ResponseParseError::NotItems("null")),
    }
}

/// A lone object carrying an id or name is an item, not a wrapper
fn looks_like_item(object: &Map<String, Value>) -> bool {
    ["id", "name"]
        .iter()
        .any(|key| object.get(*key).is_some_and(Value::is_string))
}

fn is_item_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| !items.is_empty() && items.iter().all(Value::is_object))
}

fn strip_code_fences(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_open = &text[open + 3..];
    // Skip the info string (```json)
    let body_start = after_open.find('\n').map(|i| i + 1).unwrap_or(after_open.len());
    let body = &after_open[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_array() {
        let items = parse_item_objects(r#"[{"id": "a"}, {"id": "b"}]"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_fenced_array_with_chatter() {
        let raw = "Sure! Here you go:\n```json\n[{\"id\": \"a\", \"name\": \"A\"}]\n```\nEnjoy.";
        let items = parse_item_objects(raw).unwrap();
        assert_eq!(items, vec![json!({"id": "a", "name": "A"})]);
    }

    #[test]
    fn test_array_embedded_in_prose() {
        let raw = "Items: [{\"id\": \"a\"}] hope that helps";
        assert_eq!(parse_item_objects(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_wrapped_in_object() {
        let items = parse_item_objects(r#"{"items": [{"id": "a"}, {"id": "b"}]}"#).unwrap();
        assert_eq!(items.len(), 2);

        let items = parse_item_objects(r#"{"note": "x", "weapons": [{"id": "a"}]}"#).unwrap();
        assert_eq!(items, vec![json!({"id": "a"})]);
    }

    #[test]
    fn test_single_object_becomes_one_item() {
        let items = parse_item_objects(r#"{"id": "a", "name": "A"}"#).unwrap();
        assert_eq!(items, vec![json!({"id": "a", "name": "A"})]);
    }

    #[test]
    fn test_single_item_with_array_fields_is_not_unwrapped() {
        let items = parse_item_objects(r#"{"id": "wc001", "name": "Rail Mount", "compatible_with": []}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "wc001");

        let items =
            parse_item_objects(r#"{"id": "w001", "name": "Rifle", "attachments": [{"slot": "scope"}]}"#).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "w001");
    }

    #[test]
    fn test_wrapper_with_empty_list_is_kept_whole() {
        let items = parse_item_objects(r#"{"items": [], "note": "none"}"#).unwrap();
        assert_eq!(items, vec![json!({"items": [], "note": "none"})]);
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_item_objects("not json"),
            Err(ResponseParseError::InvalidJson(_))
        ));
        assert_eq!(parse_item_objects("   "), Err(ResponseParseError::Empty));
        assert_eq!(parse_item_objects("42"), Err(ResponseParseError::NotItems("number")));
    }
}
