//! Accessors for loosely-typed document fields.
//!
//! Stored markets come out of the document store with optional, empty or
//! differently-typed values. These helpers treat empty strings the same as
//! missing ones so the decoders can chain fallbacks with `or_else`.

use serde_json::Value;

/// A non-empty string field
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

pub fn string_field(value: &Value, key: &str) -> Option<String> {
    str_field(value, key).map(str::to_string)
}

/// A field that is present and not `null`
pub fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

pub fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

pub fn bool_field(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

/// Stringify a document identifier.
///
/// Accepts plain strings, numbers and the extended-JSON `{"$oid": "..."}` form.
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("$oid")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// The string members of an array field. Anything else is skipped.
pub fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
