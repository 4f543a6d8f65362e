//! Removal of `data` / `attributes` envelopes.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Deepest nesting the flattener will walk before giving up.
pub const MAX_DEPTH: usize = 256;

/// Flatten a parsed response into canonical records.
///
/// - `null` becomes an empty mapping, a bare scalar becomes `[scalar]`.
/// - Keys named `data` or `attributes` holding a mapping are unwrapped into
///   the enclosing level; holding an array, they replace the enclosing level.
/// - When a `data` wrapper and the enclosing level both carry an `id`, the
///   wrapper's id is kept as `data_id`.
/// - A nested container that is empty or holds only nulls becomes `null`.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use strapi_core::normalize::flatten;
///
/// let raw = json!({"data": {"id": 1, "attributes": {"title": "Hello"}}});
/// assert_eq!(flatten(raw).unwrap(), json!({"id": 1, "title": "Hello"}));
/// ```
pub fn flatten(value: Value) -> Result<Value> {
    match value {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) | Value::Array(_) => flatten_container(value, 0),
        scalar => Ok(Value::Array(vec![scalar])),
    }
}

fn flatten_container(value: Value, depth: usize) -> Result<Value> {
    if depth > MAX_DEPTH {
        return Err(Error::unknown(format!(
            "response nesting exceeds {MAX_DEPTH} levels"
        )));
    }

    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| flatten_member(item, depth + 1))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => flatten_object(map, depth),
        other => Ok(other),
    }
}

fn flatten_member(value: Value, depth: usize) -> Result<Value> {
    match value {
        Value::Object(_) | Value::Array(_) if is_vacant(&value) => Ok(Value::Null),
        Value::Object(_) | Value::Array(_) => flatten_container(value, depth),
        other => Ok(other),
    }
}

fn flatten_object(map: Map<String, Value>, depth: usize) -> Result<Value> {
    let mut level = Map::new();
    let mut list: Option<Vec<Value>> = None;

    for (key, item) in map {
        let is_wrapper = key == "data" || key == "attributes";

        match item {
            Value::Object(mut inner) if is_wrapper => {
                if key == "data" && has_id(&level) && has_id(&inner) {
                    if let Some(id) = inner.remove("id") {
                        inner.insert("data_id".to_string(), id);
                    }
                }
                level.extend(inner);
                match flatten_object(std::mem::take(&mut level), depth + 1)? {
                    Value::Object(merged) => level = merged,
                    Value::Array(items) => list = Some(items),
                    _ => {}
                }
            }
            Value::Array(_) if is_wrapper => {
                if let Value::Array(items) = flatten_container(item, depth + 1)? {
                    list = Some(items);
                }
            }
            other => {
                let flattened = flatten_member(other, depth + 1)?;
                level.insert(key, flattened);
            }
        }
    }

    Ok(match list {
        Some(items) => Value::Array(items),
        None => Value::Object(level),
    })
}

fn has_id(map: &Map<String, Value>) -> bool {
    map.get("id").is_some_and(|id| !id.is_null())
}

fn is_vacant(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(Value::is_null),
        Value::Array(items) => items.iter().all(Value::is_null),
        _ => false,
    }
}
