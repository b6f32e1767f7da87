//! JSON path helpers
//!
//! Simple paths use dot notation with optional array indices:
//! `data.items`, `$.meta.next_cursor`, `results[0].id`, `pages[-1]`.
//! Paths containing a wildcard are evaluated with jsonpath-rust.

use crate::error::{Error, Result};
use serde_json::Value;

/// Look up a simple path, borrowing the value it points at
///
/// An empty path (or `$`) returns `value` itself.
pub fn extract_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.trim();
    let path = path
        .strip_prefix("$.")
        .or_else(|| path.strip_prefix('$'))
        .unwrap_or(path);
    if path.is_empty() {
        return Some(value);
    }
    path.split('.').try_fold(value, step)
}

/// Follow one dot-separated segment, e.g. `items` or `items[2][-1]`
fn step<'a>(current: &'a Value, segment: &str) -> Option<&'a Value> {
    let (name, indices) = match segment.find('[') {
        Some(pos) => segment.split_at(pos),
        None => (segment, ""),
    };

    let mut current = if name.is_empty() {
        current
    } else {
        current.get(name)?
    };

    for index in indices.split_terminator(']') {
        let index: i64 = index.strip_prefix('[')?.trim().parse().ok()?;
        let items = current.as_array()?;
        let position = if index < 0 {
            items
                .len()
                .checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
        } else {
            usize::try_from(index).ok()?
        };
        current = items.get(position)?;
    }

    Some(current)
}

/// Read a scalar at `path` as a string
///
/// Numbers and booleans are rendered; null, missing, arrays, and objects
/// yield `None`.
pub fn extract_string(value: &Value, path: &str) -> Option<String> {
    match extract_path(value, path)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a non-negative integer at `path`, accepting numeric strings
pub fn extract_u64(value: &Value, path: &str) -> Option<u64> {
    match extract_path(value, path)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Collect the records at `path`
///
/// With no path the value itself is the record list. An array yields its
/// elements, a missing or null value yields nothing, anything else yields one
/// record.
pub fn extract_records(value: &Value, path: Option<&str>) -> Result<Vec<Value>> {
    let Some(path) = path else {
        return Ok(into_records(Some(value)));
    };

    if path.contains('*') {
        return extract_with_jsonpath(value, path);
    }

    Ok(into_records(extract_path(value, path)))
}

fn into_records(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Null) | None => Vec::new(),
        Some(other) => vec![other.clone()],
    }
}

fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => Ok(vec![other]),
    }
}
