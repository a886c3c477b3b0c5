//! Minimal JSON shape checks used when listing profiles.

use serde_json::Value;

/// An object whose `Core` member is itself an object.
pub fn is_profile_document(value: &Value) -> bool {
    value.get("Core").is_some_and(Value::is_object)
}

/// An object carrying every key in `keys`, either at the top level or inside
/// `Core`.
pub fn has_keys(value: &Value, keys: &[&str]) -> bool {
    let Some(root) = value.as_object() else {
        return false;
    };
    if keys.iter().all(|key| root.contains_key(*key)) {
        return true;
    }
    match root.get("Core").and_then(Value::as_object) {
        Some(core) => keys.iter().all(|key| core.contains_key(*key)),
        None => false,
    }
}
