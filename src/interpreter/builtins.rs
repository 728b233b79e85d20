//! Capability set
//!
//! Snippets can only reach the names in the [`Capabilities`] handed to the
//! evaluator. There is no global object: anything not bound by the snippet
//! itself and not listed here is undefined.
//!
//! # Standard Capabilities
//!
//! - `ui`: component constructors (`Box`, `Stack`, `Text`, `Button`, `Badge`,
//!   `Input`, `Icon`, `Heading`, `Checkbox`), each called as `ui.Button(props?, ...children)`
//! - `h(tag, props?, ...children)`: generic element constructor
//! - `Error(message)`: error object constructor, with or without `new`
//! - `Object`: `keys`, `values`, `entries`, `assign`
//! - `Array.isArray`, `String(x)`, `Number(x)`
//! - `Math`: `min`, `max`, `round`, `floor`, `ceil`, `abs`
//! - `JSON.stringify`
//!
//! # Implementation Notes
//!
//! - Capability values are immutable; `Object.assign` returns a new object
//!   instead of writing into its first argument
//! - The set itself is never mutated after construction, so evaluations
//!   cannot leak state into each other through it

use std::rc::Rc;

use indexmap::IndexMap;

use crate::interpreter::errors::RuntimeError;
use crate::parser::ast::SourceLocation;
use crate::value::{Element, Node, Object, Value};

/// Component constructors available under `ui`
pub const UI_COMPONENTS: &[&str] = &[
    "Box", "Stack", "Text", "Button", "Badge", "Input", "Icon", "Heading", "Checkbox",
];

/// Immutable mapping of names visible to snippets
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    names: IndexMap<String, Value>,
}

impl Capabilities {
    /// No names at all
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default capability set used by the editor
    pub fn standard() -> Self {
        let mut ui = Object::new();
        for &tag in UI_COMPONENTS {
            ui.insert(
                tag.to_string(),
                Value::native(tag, move |_, args, _| Ok(build_element(tag, args))),
            );
        }

        Self::empty()
            .with("ui", Value::object(ui))
            .with("h", Value::native("h", builtin_h))
            .with("Error", Value::constructor("Error", builtin_error))
            .with("Object", object_namespace())
            .with("Array", array_namespace())
            .with(
                "String",
                Value::native("String", |_, args, _| {
                    Ok(Value::from(
                        args.first().cloned().unwrap_or_default().to_display_string(),
                    ))
                }),
            )
            .with(
                "Number",
                Value::native("Number", |_, args, _| {
                    Ok(Value::Number(args.first().map_or(0.0, Value::to_number)))
                }),
            )
            .with("Math", math_namespace())
            .with("JSON", json_namespace())
    }

    /// Add or replace one name
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.names.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }
}

/// Split `(props?, ...children)` and build an element
fn build_element(tag: &str, args: &[Value]) -> Value {
    let (props, children) = match args.first() {
        Some(Value::Object(props)) => (props.as_ref().clone(), &args[1..]),
        Some(Value::Undefined | Value::Null) => (Object::new(), &args[1..]),
        _ => (Object::new(), args),
    };

    let mut nodes = Vec::new();
    for child in children {
        Node::collect_from(child, &mut nodes);
    }
    Value::Element(Rc::new(Element::new(tag, props, nodes)))
}

fn builtin_h(
    _: &mut crate::interpreter::engine::Interpreter,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match args.first() {
        Some(Value::String(tag)) => Ok(build_element(tag, &args[1..])),
        _ => Err(RuntimeError::invalid_argument(
            "h",
            "first argument must be a tag name",
            location,
        )),
    }
}

fn builtin_error(
    _: &mut crate::interpreter::engine::Interpreter,
    args: &[Value],
    _: SourceLocation,
) -> Result<Value, RuntimeError> {
    let message = match args.first() {
        None | Some(Value::Undefined) => String::new(),
        Some(message) => message.to_display_string(),
    };
    let mut error = Object::new();
    error.insert("name".to_string(), Value::from("Error"));
    error.insert("message".to_string(), Value::from(message));
    Ok(Value::object(error))
}

fn object_namespace() -> Value {
    let mut ns = Object::new();

    ns.insert(
        "keys".to_string(),
        Value::native("keys", |_, args, _| {
            Ok(Value::array(
                own_entries(args.first())
                    .into_iter()
                    .map(|(key, _)| Value::from(key))
                    .collect(),
            ))
        }),
    );

    ns.insert(
        "values".to_string(),
        Value::native("values", |_, args, _| {
            Ok(Value::array(
                own_entries(args.first())
                    .into_iter()
                    .map(|(_, value)| value)
                    .collect(),
            ))
        }),
    );

    ns.insert(
        "entries".to_string(),
        Value::native("entries", |_, args, _| {
            Ok(Value::array(
                own_entries(args.first())
                    .into_iter()
                    .map(|(key, value)| Value::array(vec![Value::from(key), value]))
                    .collect(),
            ))
        }),
    );

    ns.insert(
        "assign".to_string(),
        Value::native("assign", |_, args, _| {
            let mut merged = Object::new();
            for arg in args {
                for (key, value) in own_entries(Some(arg)) {
                    merged.insert(key, value);
                }
            }
            Ok(Value::object(merged))
        }),
    );

    Value::object(ns)
}

/// Own enumerable entries of objects, arrays and strings
fn own_entries(value: Option<&Value>) -> Vec<(String, Value)> {
    match value {
        Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v.clone()))
            .collect(),
        Some(Value::String(s)) => s
            .chars()
            .enumerate()
            .map(|(i, c)| (i.to_string(), Value::from(c.to_string())))
            .collect(),
        _ => Vec::new(),
    }
}

fn array_namespace() -> Value {
    let mut ns = Object::new();
    ns.insert(
        "isArray".to_string(),
        Value::native("isArray", |_, args, _| {
            Ok(Value::Bool(matches!(args.first(), Some(Value::Array(_)))))
        }),
    );
    Value::object(ns)
}

fn math_namespace() -> Value {
    fn unary(name: &'static str, f: fn(f64) -> f64) -> (String, Value) {
        (
            name.to_string(),
            Value::native(name, move |_, args, _| {
                Ok(Value::Number(f(args.first().map_or(f64::NAN, Value::to_number))))
            }),
        )
    }

    let mut ns = Object::new();
    ns.insert(
        "min".to_string(),
        Value::native("min", |_, args, _| {
            Ok(Value::Number(args.iter().map(Value::to_number).fold(
                f64::INFINITY,
                |acc, n| if n.is_nan() || acc.is_nan() { f64::NAN } else { acc.min(n) },
            )))
        }),
    );
    ns.insert(
        "max".to_string(),
        Value::native("max", |_, args, _| {
            Ok(Value::Number(args.iter().map(Value::to_number).fold(
                f64::NEG_INFINITY,
                |acc, n| if n.is_nan() || acc.is_nan() { f64::NAN } else { acc.max(n) },
            )))
        }),
    );

    for (name, value) in [
        unary("round", |n| (n + 0.5).floor()),
        unary("floor", f64::floor),
        unary("ceil", f64::ceil),
        unary("abs", f64::abs),
    ] {
        ns.insert(name, value);
    }

    Value::object(ns)
}

fn json_namespace() -> Value {
    let mut ns = Object::new();
    ns.insert(
        "stringify".to_string(),
        Value::native("stringify", |_, args, location| {
            let value = args.first().cloned().unwrap_or_default();
            let indent = args.get(2).map_or(0.0, Value::to_number);

            let json = value
                .to_json()
                .map_err(|err| RuntimeError::invalid_argument("JSON.stringify", err.to_string(), location))?;
            let Some(json) = json else {
                return Ok(Value::Undefined);
            };

            let text = if indent >= 1.0 {
                serde_json::to_string_pretty(&json)
            } else {
                serde_json::to_string(&json)
            }
            .map_err(|err| RuntimeError::invalid_argument("JSON.stringify", err.to_string(), location))?;
            Ok(Value::from(text))
        }),
    );
    Value::object(ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_names() {
        let caps = Capabilities::standard();
        let names: Vec<_> = caps.names().collect();
        for expected in ["ui", "h", "Error", "Object", "Array", "String", "Number", "Math", "JSON"] {
            assert!(names.contains(&expected), "missing capability {}", expected);
        }
        assert!(caps.get("window").is_none());
    }

    #[test]
    fn test_build_element_splits_props_and_children() {
        let mut props = Object::new();
        props.insert("variant".to_string(), Value::from("solid"));
        let element = build_element(
            "Button",
            &[Value::object(props), Value::from("Click"), Value::Null],
        );
        let element = element.as_element().unwrap();
        assert_eq!(element.tag, "Button");
        assert_eq!(element.prop_str("variant").as_deref(), Some("solid"));
        assert_eq!(element.children, vec![Node::Text("Click".to_string())]);
    }

    #[test]
    fn test_text_first_argument_is_a_child() {
        let element = build_element("Text", &[Value::from("hello")]);
        assert_eq!(element.as_element().unwrap().text_content(), "hello");
    }
}
