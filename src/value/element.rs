//! Preview element tree produced by render snippets

use crate::value::{Object, Value};

/// A UI node built by `ui.*` or `h(...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub props: Object,
    pub children: Vec<Node>,
}

/// Child of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(std::rc::Rc<Element>),
    Text(String),
}

impl Element {
    pub fn new(tag: impl Into<String>, props: Object, children: Vec<Node>) -> Self {
        Self {
            tag: tag.into(),
            props,
            children,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Prop as display text; `None` for missing or nullish props.
    pub fn prop_str(&self, name: &str) -> Option<String> {
        self.props
            .get(name)
            .filter(|value| !value.is_nullish())
            .map(Value::to_display_string)
    }

    /// Concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }
}

impl Node {
    /// Convert a child value into zero or more nodes.
    ///
    /// Nested arrays are flattened; `null`, `undefined` and booleans render
    /// nothing.
    pub fn collect_from(value: &Value, out: &mut Vec<Node>) {
        match value {
            Value::Undefined | Value::Null | Value::Bool(_) => {}
            Value::Element(element) => out.push(Node::Element(element.clone())),
            Value::Array(items) => {
                for item in items.iter() {
                    Node::collect_from(item, out);
                }
            }
            other => out.push(Node::Text(other.to_display_string())),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Node::Element(element) => Value::Element(element.clone()),
            Node::Text(text) => Value::from(text.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_children_flatten_and_skip_nullish() {
        let mut nodes = Vec::new();
        Node::collect_from(
            &Value::array(vec![
                Value::from("a"),
                Value::Null,
                Value::Bool(false),
                Value::array(vec![Value::Number(2.0)]),
            ]),
            &mut nodes,
        );
        assert_eq!(
            nodes,
            vec![Node::Text("a".to_string()), Node::Text("2".to_string())]
        );
    }

    #[test]
    fn test_text_content_is_recursive() {
        let inner = Element::new("Text", Object::new(), vec![Node::Text("inner".to_string())]);
        let outer = Element::new(
            "Box",
            Object::new(),
            vec![
                Node::Text("outer ".to_string()),
                Node::Element(Rc::new(inner)),
            ],
        );
        assert_eq!(outer.text_content(), "outer inner");
    }
}
