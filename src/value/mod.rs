//! Runtime value representation
//!
//! This module defines the [`Value`] enum, which represents every value a
//! snippet can produce or observe. Values are immutable once built and shared
//! by reference counting, so cloning a cached result is cheap and evaluated
//! code can never mutate a value another evaluation holds.
//!
//! # Value Types
//!
//! - [`Value::Undefined`] / [`Value::Null`]
//! - [`Value::Bool`], [`Value::Number`] (64-bit float), [`Value::String`]
//! - [`Value::Array`] and [`Value::Object`] (insertion-ordered)
//! - [`Value::Function`]: a snippet closure or a native capability
//! - [`Value::Element`]: a preview node produced by render snippets
//!
//! # Equality
//!
//! `PartialEq` is structural for data and by identity for functions. The
//! snippet-level `===` operator lives in the interpreter and compares
//! containers by identity instead.

pub mod element;
pub mod json;

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::scope::Scope;
use crate::parser::ast::{format_number, Function, SourceLocation};

pub use element::{Element, Node};

/// Insertion-ordered property map
pub type Object = IndexMap<String, Value>;

/// Signature of a native (host-provided) function
pub type NativeFn =
    dyn Fn(&mut Interpreter, &[Value], SourceLocation) -> Result<Value, RuntimeError>;

/// Runtime values in the interpreter
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Array(Rc<Vec<Value>>),
    Object(Rc<Object>),
    Function(Rc<Callable>),
    Element(Rc<Element>),
}

/// Anything a snippet can call
pub enum Callable {
    Closure(Closure),
    Native(NativeFunction),
}

/// Snippet function plus the scope it closed over
pub struct Closure {
    pub function: Rc<Function>,
    pub scope: Rc<Scope>,
}

/// Host function exposed through the capability set
pub struct NativeFunction {
    pub name: String,
    pub constructible: bool,
    pub func: Box<NativeFn>,
}

impl Callable {
    pub fn name(&self) -> &str {
        match self {
            Callable::Closure(closure) => closure.function.name.as_deref().unwrap_or("anonymous"),
            Callable::Native(native) => &native.name,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Closure(_) => write!(f, "[Function: {}]", self.name()),
            Callable::Native(_) => write!(f, "[Native: {}]", self.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Function(callable) => write!(f, "{:?}", callable),
            Value::Element(element) => write!(f, "{:?}", element),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k) == Some(v))
            }
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Element(a), Value::Element(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(Rc::new(items))
    }

    pub fn object(map: Object) -> Self {
        Value::Object(Rc::new(map))
    }

    pub fn empty_object() -> Self {
        Value::object(Object::new())
    }

    /// Wrap a host closure as a callable value.
    pub fn native<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut Interpreter, &[Value], SourceLocation) -> Result<Value, RuntimeError> + 'static,
    {
        Value::Function(Rc::new(Callable::Native(NativeFunction {
            name: name.to_string(),
            constructible: false,
            func: Box::new(func),
        })))
    }

    /// Like [`Value::native`], but also callable with `new`.
    pub fn constructor<F>(name: &str, func: F) -> Self
    where
        F: Fn(&mut Interpreter, &[Value], SourceLocation) -> Result<Value, RuntimeError> + 'static,
    {
        Value::Function(Rc::new(Callable::Native(NativeFunction {
            name: name.to_string(),
            constructible: true,
            func: Box::new(func),
        })))
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Rc<Element>> {
        match self {
            Value::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Follow a dotted path through nested objects (`"colors.brand.500"`).
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |current, segment| match current {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// JavaScript truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) | Value::Element(_) => true,
        }
    }

    /// Result of the `typeof` operator
    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Null | Value::Array(_) | Value::Object(_) | Value::Element(_) => "object",
        }
    }

    /// Numeric conversion (`Number(x)`, unary `+`)
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Value::Number(n) => *n,
            Value::String(s) => string_to_number(s),
            Value::Array(items) => match items.len() {
                0 => 0.0,
                1 => items[0].to_number(),
                _ => f64::NAN,
            },
            Value::Object(_) | Value::Function(_) | Value::Element(_) => f64::NAN,
        }
    }

    /// String conversion (`String(x)`, template literals, `+` concatenation)
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.to_string(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    if item.is_nullish() {
                        String::new()
                    } else {
                        item.to_display_string()
                    }
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(callable) => format!("function {}() {{ [code] }}", callable.name()),
            Value::Element(element) => element.text_content(),
        }
    }

    /// Key used when this value indexes an object (`obj[key]`)
    pub fn to_property_key(&self) -> String {
        self.to_display_string()
    }
}

fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).map(|n| n as f64).unwrap_or(f64::NAN);
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::empty_object().is_truthy());
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Value::Number(500.0).to_display_string(), "500");
        assert_eq!(Value::Number(1.5).to_display_string(), "1.5");
        assert_eq!(
            Value::array(vec![Value::Number(1.0), Value::Null, Value::from("a")]).to_display_string(),
            "1,,a"
        );
        assert_eq!(Value::empty_object().to_display_string(), "[object Object]");
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert!(Value::from("12px").to_number().is_nan());
    }

    #[test]
    fn test_structural_equality_ignores_key_order() {
        let mut a = Object::new();
        a.insert("x".to_string(), Value::Number(1.0));
        a.insert("y".to_string(), Value::Number(2.0));
        let mut b = Object::new();
        b.insert("y".to_string(), Value::Number(2.0));
        b.insert("x".to_string(), Value::Number(1.0));
        assert_eq!(Value::object(a), Value::object(b));
    }

    #[test]
    fn test_get_path() {
        let mut brand = Object::new();
        brand.insert("500".to_string(), Value::from("#ff0000"));
        let mut colors = Object::new();
        colors.insert("brand".to_string(), Value::object(brand));
        let mut theme = Object::new();
        theme.insert("colors".to_string(), Value::object(colors));
        let theme = Value::object(theme);

        assert_eq!(theme.get_path("colors.brand.500"), Some(&Value::from("#ff0000")));
        assert_eq!(theme.get_path("colors.missing"), None);
    }
}
