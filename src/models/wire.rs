//! Boundary helpers that turn the backend's loose JSON into one shape.
//!
//! The backend mixes `{results: [...]}` with bare arrays, sends numbers as
//! strings now and then, and spells fields in Spanish or English depending
//! on the endpoint. Everything here is deserialize-only.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::exercise::{Category, Visibility};

/// A list endpoint body: `{results: [...]}`, `{results: null}`, or `[...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { results: Option<Vec<T>> },
}

impl<T> ListEnvelope<T> {
    /// Flatten into the list, treating a null `results` as empty.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { results } => results.unwrap_or_default(),
        }
    }
}

/// Interpret a JSON value as a number, accepting numeric strings.
fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Optional number that tolerates strings, null and garbage (→ `None`).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_f64))
}

/// Non-negative count; anything unusable becomes 0.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = lenient_f64(deserializer)?;
    Ok(value
        .filter(|n| *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0))
}

/// Record identifier given as a number or a numeric string.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
    .ok_or_else(|| serde::de::Error::custom(format!("invalid record id: {}", value)))
}

/// Like [`lenient_id`] but unusable values become 0.
pub fn lenient_id_or_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

/// Boolean given as a bool, `1`/`0`, or `"true"`/`"1"`.
pub fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

/// Free text that may be missing, null or a number; null becomes empty.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

/// Visibility in any case; null or unknown values are private.
pub fn lenient_visibility<'de, D>(deserializer: D) -> Result<Visibility, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("public") => Visibility::Public,
        Some(Value::Bool(true)) => Visibility::Public,
        _ => Visibility::Private,
    })
}

/// Collect category-ish values (names, ids, `{name}` objects, nested
/// arrays) into a flat list of names without duplicates.
pub fn category_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let mut names = Vec::new();
    if let Some(value) = value {
        collect_names(&value, &mut names);
    }
    Ok(names)
}

fn collect_names(value: &Value, out: &mut Vec<String>) {
    let name = match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => n.as_u64().map(|id| match Category::from_id(id) {
            Some(category) => category.name().to_string(),
            None => id.to_string(),
        }),
        Value::Object(map) => map
            .get("name")
            .or_else(|| map.get("nombre"))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string()),
        Value::Array(items) => {
            for item in items {
                collect_names(item, out);
            }
            None
        }
        Value::Null | Value::Bool(_) => None,
    };
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        if !out.contains(&name) {
            out.push(name);
        }
    }
}
