//! Deep merge of theme descriptions

use crate::value::Value;

/// Merge `overrides` onto `base`, returning a new value.
///
/// Objects merge key by key, recursively. Any other override value,
/// including arrays and `null`, replaces the base value at that path, while
/// `undefined` leaves the base value in place. Keys
/// keep the base order, and keys only present in `overrides` follow in
/// their own order. Neither input is modified.
pub fn deep_merge(base: &Value, overrides: &Value) -> Value {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            let mut merged = base_map.as_ref().clone();
            for (key, value) in override_map.iter() {
                let next = match merged.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::object(merged)
        }
        (_, Value::Undefined) => base.clone(),
        _ => overrides.clone(),
    }
}
