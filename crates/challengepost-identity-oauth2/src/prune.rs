//! Recursive removal of null and empty values from identity mappings.

use serde_json::{Map, Value};

/// Drop every key whose value is null, an empty string, an empty array, or
/// an empty object. Nested objects are pruned before the emptiness test, so
/// an object that prunes down to nothing is removed at the parent level too.
/// Arrays are kept as-is apart from the top-level emptiness check; numbers
/// and booleans (including `false` and `0`) are never removed.
pub fn prune(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::Object(inner) => Value::Object(prune(inner)),
                other => other,
            };
            if is_empty(&value) {
                None
            } else {
                Some((key, value))
            }
        })
        .collect()
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
