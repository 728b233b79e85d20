//! Conversion between runtime values and `serde_json` values
//!
//! Only plain data survives the trip out: functions and elements are dropped
//! from objects and become `null` inside arrays, matching what a JSON
//! serializer does with values it cannot represent. Non-finite numbers have
//! no JSON form and are reported as errors.

use std::rc::Rc;

use serde_json::{Map, Number};
use thiserror::Error;

use crate::value::{Object, Value};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToJsonError {
    #[error("cannot serialize non-finite number {value} at '{path}'")]
    NonFiniteNumber { value: f64, path: String },
}

impl Value {
    /// Convert into JSON. Returns `Ok(None)` for values with no JSON form
    /// (`undefined`, functions, elements).
    pub fn to_json(&self) -> Result<Option<serde_json::Value>, ToJsonError> {
        to_json_at(self, "$")
    }

    pub fn from_json(json: &serde_json::Value) -> Value {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(Rc::from(s.as_str())),
            serde_json::Value::Array(items) => {
                Value::array(items.iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut object = Object::with_capacity(map.len());
                for (key, value) in map {
                    object.insert(key.clone(), Value::from_json(value));
                }
                Value::object(object)
            }
        }
    }
}

fn to_json_at(value: &Value, path: &str) -> Result<Option<serde_json::Value>, ToJsonError> {
    let json = match value {
        Value::Undefined | Value::Function(_) | Value::Element(_) => return Ok(None),
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Number(n) => serde_json::Value::Number(number_to_json(*n, path)?),
        Value::String(s) => serde_json::Value::String(s.to_string()),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_path = format!("{}[{}]", path, index);
                out.push(to_json_at(item, &item_path)?.unwrap_or(serde_json::Value::Null));
            }
            serde_json::Value::Array(out)
        }
        Value::Object(map) => {
            let mut out = Map::new();
            for (key, item) in map.iter() {
                let item_path = format!("{}.{}", path, key);
                if let Some(json) = to_json_at(item, &item_path)? {
                    out.insert(key.clone(), json);
                }
            }
            serde_json::Value::Object(out)
        }
    };
    Ok(Some(json))
}

fn number_to_json(n: f64, path: &str) -> Result<Number, ToJsonError> {
    if n.fract() == 0.0 && n.abs() < 9.007_199_254_740_992e15 {
        return Ok(Number::from(n as i64));
    }
    Number::from_f64(n).ok_or_else(|| ToJsonError::NonFiniteNumber {
        value: n,
        path: path.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_functions_are_omitted_from_objects() {
        let mut map = Object::new();
        map.insert("a".to_string(), Value::Number(1.0));
        map.insert("f".to_string(), Value::native("f", |_, _, _| Ok(Value::Undefined)));
        map.insert("u".to_string(), Value::Undefined);
        let json = Value::object(map).to_json().unwrap();
        assert_eq!(json, Some(json!({ "a": 1 })));
    }

    #[test]
    fn test_unrepresentable_array_items_become_null() {
        let value = Value::array(vec![Value::Undefined, Value::from("x")]);
        assert_eq!(value.to_json().unwrap(), Some(json!([null, "x"])));
    }

    #[test]
    fn test_non_finite_number_is_an_error() {
        let mut map = Object::new();
        map.insert("size".to_string(), Value::Number(f64::INFINITY));
        let err = Value::object(map).to_json().unwrap_err();
        assert!(err.to_string().contains("$.size"));
    }

    #[test]
    fn test_integers_stay_integers() {
        let json = Value::Number(16.0).to_json().unwrap();
        assert_eq!(json, Some(json!(16)));
        assert_eq!(serde_json::to_string(&json).unwrap(), "16");
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let value = Value::from_json(&json!({ "sm": 1, "md": 2, "lg": 3 }));
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["sm", "md", "lg"]);
    }
}
