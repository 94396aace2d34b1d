//! Member access helpers for JTM objects.
//!
//! Optional array members that are present but not arrays are ignored rather
//! than rejected; members whose shape matters for identity (`parent`,
//! `roles`) are checked by the reader itself.

use crate::error::{JtmError, Result};
use serde_json::{Map, Value};

/// A JTM object.
pub type JsonObject = Map<String, Value>;

/// Requires `value` to be a JSON object.
pub fn as_object<'a>(value: &'a Value, what: &str) -> Result<&'a JsonObject> {
    value
        .as_object()
        .ok_or_else(|| JtmError::invalid(format!("{} must be a JSON object", what)))
}

/// Entries of an optional array member; absent, null and non-array members
/// read as empty.
pub fn array_member<'a>(object: &'a JsonObject, key: &str) -> &'a [Value] {
    match object.get(key) {
        Some(Value::Array(entries)) => entries,
        _ => &[],
    }
}

/// Whether `key` is present with a non-null value.
pub fn is_present(object: &JsonObject, key: &str) -> bool {
    !matches!(object.get(key), None | Some(Value::Null))
}

/// An optional string member; absent and null read as `None`.
pub fn string_member<'a>(object: &'a JsonObject, key: &str) -> Result<Option<&'a str>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(JtmError::invalid(format!("{} must be a string", key))),
    }
}

/// A mandatory string member of a `what` object.
pub fn required_string<'a>(object: &'a JsonObject, key: &str, what: &str) -> Result<&'a str> {
    string_member(object, key)?
        .ok_or_else(|| JtmError::invalid(format!("{} requires a {}", what, key)))
}

/// Entries of an array member that must all be strings.
pub fn string_entries<'a>(entries: &'a [Value], key: &str) -> Result<Vec<&'a str>> {
    entries
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .ok_or_else(|| JtmError::invalid(format!("{} entries must be strings", key)))
        })
        .collect()
}
