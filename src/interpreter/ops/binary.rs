//! Binary operator evaluation

use std::rc::Rc;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::check_string_length;
use crate::parser::ast::{BinOp, SourceLocation};
use crate::value::Value;

impl Interpreter {
    pub(crate) fn evaluate_binary_op(
        &self,
        op: BinOp,
        left: &Value,
        right: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        use BinOp::*;

        let result = match op {
            Add => add_values(left, right, location)?,
            Sub => Value::Number(left.to_number() - right.to_number()),
            Mul => Value::Number(left.to_number() * right.to_number()),
            Div => Value::Number(left.to_number() / right.to_number()),
            Mod => Value::Number(left.to_number() % right.to_number()),
            Eq => Value::Bool(loose_equals(left, right)),
            Ne => Value::Bool(!loose_equals(left, right)),
            StrictEq => Value::Bool(strict_equals(left, right)),
            StrictNe => Value::Bool(!strict_equals(left, right)),
            Lt => Value::Bool(compare(left, right, |o| o.is_lt())),
            Le => Value::Bool(compare(left, right, |o| o.is_le())),
            Gt => Value::Bool(compare(left, right, |o| o.is_gt())),
            Ge => Value::Bool(compare(left, right, |o| o.is_ge())),
            In => return self.evaluate_in_op(left, right, location),
        };

        Ok(result)
    }

    fn evaluate_in_op(
        &self,
        key: &Value,
        target: &Value,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let key = key.to_property_key();
        match target {
            Value::Object(map) => Ok(Value::Bool(map.contains_key(&key))),
            Value::Array(items) => Ok(Value::Bool(
                key == "length" || key.parse::<usize>().is_ok_and(|i| i < items.len()),
            )),
            other => Err(RuntimeError::type_error(
                format!(
                    "Cannot use 'in' operator to search for '{}' in {}",
                    key,
                    other.to_display_string()
                ),
                location,
            )),
        }
    }
}

/// `+`: string concatenation when either side is not a plain primitive,
/// numeric addition otherwise
fn add_values(left: &Value, right: &Value, location: SourceLocation) -> Result<Value, RuntimeError> {
    let concatenates = |v: &Value| {
        matches!(
            v,
            Value::String(_)
                | Value::Array(_)
                | Value::Object(_)
                | Value::Function(_)
                | Value::Element(_)
        )
    };

    if concatenates(left) || concatenates(right) {
        let mut out = left.to_display_string();
        out.push_str(&right.to_display_string());
        check_string_length(out.len(), location)?;
        Ok(Value::from(out))
    } else {
        Ok(Value::Number(left.to_number() + right.to_number()))
    }
}

/// Relational comparison: lexicographic for two strings, numeric otherwise.
/// Any comparison involving NaN is false.
fn compare(left: &Value, right: &Value, test: fn(std::cmp::Ordering) -> bool) -> bool {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return test(a.cmp(b));
    }
    left.to_number()
        .partial_cmp(&right.to_number())
        .is_some_and(test)
}

/// `===`: primitives by value, containers and functions by identity
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
        (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::Element(a), Value::Element(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// `==` with the usual coercions between numbers, strings and booleans
pub fn loose_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (a, b) if a.is_nullish() && b.is_nullish() => true,
        (a, b) if a.is_nullish() || b.is_nullish() => false,
        (Value::Number(_), Value::String(_)) | (Value::String(_), Value::Number(_)) => {
            left.to_number() == right.to_number()
        }
        (Value::Bool(_), _) => loose_equals(&Value::Number(left.to_number()), right),
        (_, Value::Bool(_)) => loose_equals(left, &Value::Number(right.to_number())),
        (Value::Array(_) | Value::Object(_), Value::Number(_) | Value::String(_)) => {
            loose_equals(&Value::from(left.to_display_string()), right)
        }
        (Value::Number(_) | Value::String(_), Value::Array(_) | Value::Object(_)) => {
            loose_equals(left, &Value::from(right.to_display_string()))
        }
        _ => strict_equals(left, right),
    }
}

/// Equality used by `includes`: like `===` but NaN matches NaN
pub fn same_value_zero(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
        _ => strict_equals(left, right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn here() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(
            add_values(&Value::from("px"), &Value::Number(4.0), here()),
            Ok(Value::from("px4"))
        );
        assert_eq!(
            add_values(&Value::Number(4.0), &Value::Bool(true), here()),
            Ok(Value::Number(5.0))
        );
    }

    #[test]
    fn test_add_rejects_oversized_strings() {
        let half = Value::from("x".repeat(crate::interpreter::constants::MAX_STRING_LENGTH / 2 + 1));
        assert!(matches!(
            add_values(&half, &half, here()),
            Err(RuntimeError::LengthExceeded { kind: "string", .. })
        ));
    }

    #[test]
    fn test_loose_equality() {
        assert!(loose_equals(&Value::Null, &Value::Undefined));
        assert!(loose_equals(&Value::from("1"), &Value::Number(1.0)));
        assert!(loose_equals(&Value::Bool(true), &Value::Number(1.0)));
        assert!(!loose_equals(&Value::Null, &Value::Number(0.0)));
    }

    #[test]
    fn test_strict_equality_is_by_identity_for_objects() {
        let a = Value::empty_object();
        let b = Value::empty_object();
        assert!(strict_equals(&a, &a.clone()));
        assert!(!strict_equals(&a, &b));
        assert!(!strict_equals(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
        assert!(same_value_zero(&Value::Number(f64::NAN), &Value::Number(f64::NAN)));
    }

    #[test]
    fn test_string_comparison_is_lexicographic() {
        assert!(compare(&Value::from("a"), &Value::from("b"), |o| o.is_lt()));
        assert!(!compare(&Value::from("10"), &Value::from("9"), |o| o.is_gt()));
        assert!(compare(&Value::Number(10.0), &Value::from("9"), |o| o.is_gt()));
    }
}
