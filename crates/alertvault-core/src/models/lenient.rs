//! Tolerant field decoders for upstream alert payloads.
//!
//! The alerting service does not publish a schema, so scalar fields may
//! arrive as strings, numbers or booleans and lists may contain junk. These
//! helpers normalize what can be shown as text and drop the rest.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Render a JSON scalar as text; `null`, arrays and objects have no text form
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Any scalar, stringified
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

/// Strings only; other JSON types are treated as absent
pub fn string_only<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Ok(Some(s)),
        _ => Ok(None),
    }
}

/// An array of scalars. Non-scalar elements become `""` so positions stay
/// aligned with sibling lists.
pub fn text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .iter()
                .map(|item| scalar_text(item).unwrap_or_default())
                .collect(),
        )),
        _ => Ok(None),
    }
}

/// Like [`text_list`], but a lone scalar is accepted as a one-element list
pub fn text_list_or_scalar<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .iter()
                .map(|item| scalar_text(item).unwrap_or_default())
                .collect(),
        )),
        Some(other) => Ok(scalar_text(&other).map(|s| vec![s])),
        None => Ok(None),
    }
}
