//! Property access
//!
//! Objects expose their own keys only; there is no prototype chain. Arrays,
//! strings and numbers expose a fixed set of built-in methods as bound
//! native functions (see [`super::methods`]).

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::value::{Node, Value};

impl Interpreter {
    /// Read `target[key]`
    pub(crate) fn get_property(
        &self,
        target: &Value,
        key: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match target {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(
                format!(
                    "Cannot read properties of {} (reading '{}')",
                    target.to_display_string(),
                    key
                ),
                location,
            )),

            Value::Object(map) => Ok(map.get(key).cloned().unwrap_or_default()),

            Value::Array(items) => {
                if key == "length" {
                    return Ok(Value::Number(items.len() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(items.get(index).cloned().unwrap_or_default());
                }
                Ok(super::methods::array_method(items, key).unwrap_or_default())
            }

            Value::String(s) => {
                if key == "length" {
                    return Ok(Value::Number(s.chars().count() as f64));
                }
                if let Ok(index) = key.parse::<usize>() {
                    return Ok(s
                        .chars()
                        .nth(index)
                        .map(|c| Value::from(c.to_string()))
                        .unwrap_or_default());
                }
                Ok(super::methods::string_method(s, key).unwrap_or_default())
            }

            Value::Number(n) => Ok(super::methods::number_method(*n, key).unwrap_or_default()),

            Value::Function(callable) if key == "name" => Ok(Value::from(callable.name())),

            Value::Element(element) => Ok(match key {
                "tag" => Value::from(element.tag.as_str()),
                "props" => Value::object(element.props.clone()),
                "children" => Value::array(element.children.iter().map(Node::to_value).collect()),
                _ => Value::Undefined,
            }),

            Value::Bool(_) | Value::Function(_) => Ok(Value::Undefined),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::builtins::Capabilities;
    use crate::value::Object;
    use std::rc::Rc;

    fn interpreter() -> Interpreter {
        Interpreter::new(Rc::new(Capabilities::empty()))
    }

    #[test]
    fn test_reading_from_undefined_fails() {
        let err = interpreter()
            .get_property(&Value::Undefined, "x", SourceLocation::default())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot read properties of undefined (reading 'x')"
        );
    }

    #[test]
    fn test_missing_key_is_undefined() {
        let mut map = Object::new();
        map.insert("a".to_string(), Value::Number(1.0));
        let value = interpreter()
            .get_property(&Value::object(map), "b", SourceLocation::default())
            .unwrap();
        assert_eq!(value, Value::Undefined);
    }

    #[test]
    fn test_array_index_and_length() {
        let items = Value::array(vec![Value::from("a"), Value::from("b")]);
        let interp = interpreter();
        assert_eq!(
            interp.get_property(&items, "length", SourceLocation::default()).unwrap(),
            Value::Number(2.0)
        );
        assert_eq!(
            interp.get_property(&items, "1", SourceLocation::default()).unwrap(),
            Value::from("b")
        );
        assert!(interp
            .get_property(&items, "map", SourceLocation::default())
            .unwrap()
            .is_callable());
    }
}
