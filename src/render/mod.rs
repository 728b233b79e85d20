//! Renderer bridge
//!
//! Turns a component's render snippet into previews. Each preview cell is
//! rendered on its own: a renderer that throws for one size/variant pair
//! produces a [`RenderFailure`] for that cell only, and every other cell
//! (and every other component) still renders.
//!
//! Renderers are not cached here. The evaluator memoizes by source text, so
//! asking for the same snippet twice yields the same function value.

use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::interpreter::Evaluator;
use crate::store::DataStore;
use crate::theme::deep_merge;
use crate::value::{Element, Node, Object, Value};

/// `{ size, variant }` handed to a renderer; `None` means the default
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderProps {
    pub size: Option<String>,
    pub variant: Option<String>,
}

impl RenderProps {
    pub fn new(size: Option<&str>, variant: Option<&str>) -> Self {
        RenderProps {
            size: size.map(str::to_string),
            variant: variant.map(str::to_string),
        }
    }

    fn to_value(&self) -> Value {
        let as_value = |v: &Option<String>| v.as_deref().map_or(Value::Undefined, Value::from);
        let mut props = Object::new();
        props.insert("size".to_string(), as_value(&self.size));
        props.insert("variant".to_string(), as_value(&self.variant));
        Value::object(props)
    }
}

/// A contained failure for one preview
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{key}: {message}")]
pub struct RenderFailure {
    pub key: String,
    pub message: String,
}

impl RenderFailure {
    fn new(key: &str, message: impl Into<String>) -> Self {
        RenderFailure {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Callable produced by a render snippet
#[derive(Debug, Clone)]
pub struct Renderer {
    function: Value,
}

impl Renderer {
    pub fn function(&self) -> &Value {
        &self.function
    }

    /// Whether both renderers are the same function value
    pub fn same_as(&self, other: &Renderer) -> bool {
        match (&self.function, &other.function) {
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// One cell of the preview grid
#[derive(Debug, Clone)]
pub struct PreviewCell {
    pub size: Option<String>,
    pub variant: Option<String>,
    pub output: Result<Rc<Element>, RenderFailure>,
}

/// Read-only view over the store that renders previews
pub struct RendererBridge<'a> {
    store: &'a DataStore,
    evaluator: &'a Evaluator,
}

impl<'a> RendererBridge<'a> {
    pub fn new(store: &'a DataStore, evaluator: &'a Evaluator) -> Self {
        RendererBridge { store, evaluator }
    }

    /// Renderer for `key`, or `None` for unknown keys, failed evaluation or a
    /// non-callable result
    pub fn renderer(&self, key: &str) -> Option<Renderer> {
        self.resolve(key).ok()
    }

    fn resolve(&self, key: &str) -> Result<Renderer, RenderFailure> {
        let entry = self
            .store
            .component(key)
            .ok_or_else(|| RenderFailure::new(key, "unknown component"))?;

        let function = self
            .evaluator
            .evaluate(&entry.render_source)
            .map_err(|failure| RenderFailure::new(key, failure.summary()))?;

        if !function.is_callable() {
            return Err(RenderFailure::new(
                key,
                format!(
                    "render snippet must evaluate to a function, got {}",
                    function.type_of()
                ),
            ));
        }
        Ok(Renderer { function })
    }

    /// Render one preview
    pub fn render(&self, key: &str, props: &RenderProps) -> Result<Rc<Element>, RenderFailure> {
        let renderer = self.resolve(key)?;
        let output = self
            .evaluator
            .call(renderer.function(), &[props.to_value()])
            .map_err(|failure| RenderFailure::new(key, failure.summary()))
            .and_then(|value| into_element(key, value));

        if let Err(failure) = &output {
            debug!(key, size = ?props.size, variant = ?props.variant, error = %failure.message, "render failed");
        }
        output
    }

    /// Every size x variant combination for `key`, each rendered in isolation
    pub fn preview_grid(&self, theme: &Value, key: &str) -> Vec<PreviewCell> {
        let variants = variants(theme, key);
        let mut cells = Vec::new();
        for size in sizes(theme, key) {
            for variant in &variants {
                let props = RenderProps {
                    size: size.clone(),
                    variant: variant.clone(),
                };
                cells.push(PreviewCell {
                    output: self.render(key, &props),
                    size: props.size,
                    variant: props.variant,
                });
            }
        }
        cells
    }
}

fn into_element(key: &str, value: Value) -> Result<Rc<Element>, RenderFailure> {
    match value {
        Value::Element(element) => Ok(element),
        Value::String(_) | Value::Number(_) => Ok(Rc::new(Element::new(
            "Text",
            Object::new(),
            vec![Node::Text(value.to_display_string())],
        ))),
        other => Err(RenderFailure::new(
            key,
            format!("renderer returned {}, expected an element", other.type_of()),
        )),
    }
}

/// Keys of `components[key].sizes` in theme order, then `None` for the default
pub fn sizes(theme: &Value, key: &str) -> Vec<Option<String>> {
    enumerate(theme, key, "sizes")
}

/// Keys of `components[key].variants` in theme order, then `None` for the default
pub fn variants(theme: &Value, key: &str) -> Vec<Option<String>> {
    enumerate(theme, key, "variants")
}

fn component_field<'t>(theme: &'t Value, key: &str, field: &str) -> Option<&'t Object> {
    theme
        .as_object()
        .and_then(|theme| theme.get("components"))
        .and_then(Value::as_object)
        .and_then(|components| components.get(key))
        .and_then(Value::as_object)
        .and_then(|component| component.get(field))
        .and_then(Value::as_object)
}

fn enumerate(theme: &Value, key: &str, field: &str) -> Vec<Option<String>> {
    let mut names: Vec<Option<String>> = component_field(theme, key, field)
        .map(|map| map.keys().cloned().map(Some).collect())
        .unwrap_or_default();
    names.push(None);
    names
}

/// Style a preview cell resolves to: `baseStyle`, then the size entry, then
/// the variant entry. Missing props fall back to `defaultProps`.
pub fn resolved_style(theme: &Value, key: &str, props: &RenderProps) -> Value {
    let defaults = component_field(theme, key, "defaultProps");
    let pick = |chosen: &Option<String>, prop: &str| -> Option<String> {
        chosen.clone().or_else(|| {
            defaults
                .and_then(|defaults| defaults.get(prop))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
    };

    let lookup = |field: &str, name: Option<String>| -> Value {
        name.and_then(|name| component_field(theme, key, field)?.get(&name).cloned())
            .filter(|style| style.as_object().is_some())
            .unwrap_or_else(Value::empty_object)
    };

    let base = component_field(theme, key, "baseStyle")
        .cloned()
        .map_or_else(Value::empty_object, Value::object);
    let sized = deep_merge(&base, &lookup("sizes", pick(&props.size, "size")));
    deep_merge(&sized, &lookup("variants", pick(&props.variant, "variant")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Capabilities;
    use crate::store::NewComponent;

    fn setup(render: &str) -> (DataStore, Evaluator) {
        let mut store = DataStore::new();
        store
            .add_component(NewComponent::new("X", "X").render_source(render))
            .unwrap();
        (store, Evaluator::new(Capabilities::standard()))
    }

    #[test]
    fn test_props_reach_the_renderer() {
        let (store, evaluator) = setup("({ size, variant }) => ui.Box({ size, variant }, `${size}/${variant}`)");
        let bridge = RendererBridge::new(&store, &evaluator);
        let element = bridge
            .render("X", &RenderProps::new(Some("sm"), None))
            .unwrap();
        assert_eq!(element.prop_str("size").as_deref(), Some("sm"));
        assert_eq!(element.prop_str("variant"), None);
        assert_eq!(element.text_content(), "sm/undefined");
    }

    #[test]
    fn test_string_result_is_wrapped_in_text() {
        let (store, evaluator) = setup("() => 'plain'");
        let bridge = RendererBridge::new(&store, &evaluator);
        let element = bridge.render("X", &RenderProps::default()).unwrap();
        assert_eq!(element.tag, "Text");
        assert_eq!(element.text_content(), "plain");
    }

    #[test]
    fn test_non_function_snippet_has_no_renderer() {
        let (store, evaluator) = setup("{ not: 'a function' }");
        let bridge = RendererBridge::new(&store, &evaluator);
        assert!(bridge.renderer("X").is_none());
        assert!(bridge.renderer("Missing").is_none());
        let failure = bridge.render("X", &RenderProps::default()).unwrap_err();
        assert!(failure.message.contains("must evaluate to a function"));
    }

    #[test]
    fn test_enumeration_appends_default() {
        let theme = Value::from_json(&serde_json::json!({
            "components": { "X": { "sizes": { "sm": {}, "lg": {} } } }
        }));
        assert_eq!(
            sizes(&theme, "X"),
            vec![Some("sm".to_string()), Some("lg".to_string()), None]
        );
        assert_eq!(variants(&theme, "X"), vec![None]);
        assert_eq!(sizes(&theme, "Missing"), vec![None]);
    }

    #[test]
    fn test_resolved_style_layers_size_and_variant() {
        let theme = Value::from_json(&serde_json::json!({
            "components": { "X": {
                "baseStyle": { "fontWeight": "bold", "px": 2 },
                "sizes": { "sm": { "px": 1 }, "md": { "px": 3 } },
                "variants": { "solid": { "bg": "brand.500" } },
                "defaultProps": { "size": "md" }
            } }
        }));

        let style = resolved_style(&theme, "X", &RenderProps::new(Some("sm"), Some("solid")));
        assert_eq!(style.get_path("px"), Some(&Value::Number(1.0)));
        assert_eq!(style.get_path("bg"), Some(&Value::from("brand.500")));
        assert_eq!(style.get_path("fontWeight"), Some(&Value::from("bold")));

        let style = resolved_style(&theme, "X", &RenderProps::default());
        assert_eq!(style.get_path("px"), Some(&Value::Number(3.0)));
        assert_eq!(style.get_path("bg"), None);
    }
}
