//! RFC 7386 merge-patch computation.
//!
//! The update path mutates a deep copy of the fetched configuration and
//! sends only the difference between the copy and the original snapshot.
//! Objects recurse; everything else, arrays included, is replaced wholesale.

use serde_json::{Map, Value};

/// Compute the merge patch that turns `original` into `modified`.
///
/// An empty object means the two documents are already identical.
pub fn diff(original: &Value, modified: &Value) -> Value {
    match (original, modified) {
        (Value::Object(original), Value::Object(modified)) => {
            let mut patch = Map::new();
            for (key, new_value) in modified {
                match original.get(key) {
                    Some(old_value) if old_value == new_value => {}
                    Some(old_value) if old_value.is_object() && new_value.is_object() => {
                        patch.insert(key.clone(), diff(old_value, new_value));
                    }
                    _ => {
                        patch.insert(key.clone(), new_value.clone());
                    }
                }
            }
            for key in original.keys() {
                if !modified.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }
            Value::Object(patch)
        }
        _ => modified.clone(),
    }
}

/// True when applying `patch` would change nothing
pub fn is_noop(patch: &Value) -> bool {
    matches!(patch, Value::Object(map) if map.is_empty())
}
