//! Structural deep-merge of resolved values.
//!
//! Merging is type-directed: maps merge key-by-key recursively, lists
//! concatenate (base elements first), and everything else, scalars and
//! mismatched types alike, is replaced by the incoming value. [`merge_at`] grafts
//! an incoming value at an absolute path before merging, creating the
//! intermediate structure the path implies.

use std::collections::BTreeMap;

use crate::{
    path::{Key, Path},
    value::Value,
};

/// Deep-merges `incoming` into `base`.
///
/// - Map + map: merged key-wise, recursing on shared keys
/// - List + list: concatenated, base elements first
/// - Anything else: `incoming` replaces `base`
///
/// # Examples
///
/// ```
/// # use strata::{merge::deep_merge, Value};
/// let base = Value::from(serde_json::json!({"a": {"x": 1}, "tags": ["t1"]}));
/// let incoming = Value::from(serde_json::json!({"a": {"y": 2}, "tags": ["t2"]}));
///
/// let merged = deep_merge(base, incoming);
/// assert_eq!(
///     merged,
///     Value::from(serde_json::json!({"a": {"x": 1, "y": 2}, "tags": ["t1", "t2"]}))
/// );
/// ```
pub fn deep_merge(base: Value, incoming: Value) -> Value {
    match (base, incoming) {
        (Value::Map(mut base_entries), Value::Map(incoming_entries)) => {
            for (key, incoming_value) in incoming_entries {
                let merged = match base_entries.remove(&key) {
                    Some(base_value) => deep_merge(base_value, incoming_value),
                    None => incoming_value,
                };
                base_entries.insert(key, merged);
            }
            Value::Map(base_entries)
        }
        (Value::List(mut base_items), Value::List(incoming_items)) => {
            base_items.extend(incoming_items);
            Value::List(base_items)
        }
        (_, incoming) => incoming,
    }
}

/// Wraps `value` in the nested structure implied by `path`.
///
/// Field keys produce single-entry maps; index keys produce single-element
/// lists. The numeric value of an index key is not encoded in the expansion:
/// list contributions are positionless and combine by concatenation, which is
/// what makes separately-recorded list elements reassemble in application
/// order.
pub fn expand_at(path: &Path, value: Value) -> Value {
    let mut wrapped = value;
    for key in path.keys().rev() {
        wrapped = match key {
            Key::Field(name) => {
                let mut entries = BTreeMap::new();
                entries.insert(name.clone(), wrapped);
                Value::Map(entries)
            }
            Key::Index(_) => Value::List(vec![wrapped]),
        };
    }
    wrapped
}

/// Merges `value`, grafted at `path`, into an accumulator.
///
/// An empty accumulator takes the grafted value as-is.
pub fn merge_at(accumulator: Option<Value>, path: &Path, value: Value) -> Value {
    let grafted = expand_at(path, value);
    match accumulator {
        Some(base) => deep_merge(base, grafted),
        None => grafted,
    }
}
