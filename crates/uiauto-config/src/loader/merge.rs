//! Deep merge for YAML config documents.

use serde_yaml::Value;

/// Merge `overlay` on top of `base` and return the result.
///
/// Where both sides hold a mapping the keys are merged recursively; anything
/// else (scalars, lists, nulls, type mismatches) is replaced by the overlay
/// value. Keys are never removed.
pub fn merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_values(&mut merged, overlay);
    merged
}

fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base_slot, overlay_value) => {
            *base_slot = overlay_value.clone();
        }
    }
}
