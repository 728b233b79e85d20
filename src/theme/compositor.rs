//! Theme composition
//!
//! The composed theme is `{ ...global, components: { key: overrides } }`
//! deep-merged over the base theme. A broken component override empties
//! only that component's entry; a broken global override falls back to the
//! base theme. Both failures are recorded on the [`ComposedTheme`] so the
//! editor can point at them.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::interpreter::{EvalFailure, Evaluator, FailureKind};
use crate::store::DataStore;
use crate::theme::base::BASE_THEME_SOURCE;
use crate::theme::export::export_theme;
use crate::theme::merge::deep_merge;
use crate::value::{Object, Value};

/// Result of one composition
#[derive(Debug, Clone)]
pub struct ComposedTheme {
    pub theme: Value,
    pub global_error: Option<EvalFailure>,
    pub component_errors: Vec<(String, EvalFailure)>,
}

impl ComposedTheme {
    pub fn component_error(&self, key: &str) -> Option<&EvalFailure> {
        self.component_errors
            .iter()
            .find(|(failed, _)| failed == key)
            .map(|(_, failure)| failure)
    }
}

/// Exact source text that went into a composition
#[derive(Debug, Clone, PartialEq, Eq)]
struct ThemeInputs {
    global: String,
    components: Vec<(String, String)>,
}

impl ThemeInputs {
    fn of(store: &DataStore) -> Self {
        ThemeInputs {
            global: store.global_overrides_source().to_string(),
            components: store
                .components()
                .map(|entry| (entry.key.clone(), entry.overrides_source.clone()))
                .collect(),
        }
    }
}

pub struct ThemeCompositor {
    base: Value,
    memo: RefCell<Option<(ThemeInputs, Rc<ComposedTheme>)>>,
}

impl ThemeCompositor {
    pub fn new(evaluator: &Evaluator) -> Self {
        let base = match evaluate_object(evaluator, BASE_THEME_SOURCE) {
            Ok(base) => base,
            Err(failure) => {
                warn!(error = %failure.summary(), "base theme failed to evaluate");
                Value::empty_object()
            }
        };
        ThemeCompositor {
            base,
            memo: RefCell::new(None),
        }
    }

    pub fn base_theme(&self) -> &Value {
        &self.base
    }

    /// Evaluated overrides for one component; empty on failure or unknown key
    pub fn component_theme(&self, store: &DataStore, evaluator: &Evaluator, key: &str) -> Value {
        let Some(entry) = store.component(key) else {
            return Value::empty_object();
        };
        evaluate_object(evaluator, &entry.overrides_source).unwrap_or_else(|_| Value::empty_object())
    }

    /// Evaluated global overrides; empty on failure
    pub fn global_theme(&self, store: &DataStore, evaluator: &Evaluator) -> Value {
        evaluate_object(evaluator, store.global_overrides_source())
            .unwrap_or_else(|_| Value::empty_object())
    }

    /// Compose the full theme. Memoized on the contributing source text.
    pub fn compose(&self, store: &DataStore, evaluator: &Evaluator) -> Rc<ComposedTheme> {
        let inputs = ThemeInputs::of(store);
        if let Some((cached_inputs, composed)) = self.memo.borrow().as_ref() {
            if *cached_inputs == inputs {
                return composed.clone();
            }
        }

        let composed = Rc::new(self.compose_uncached(&inputs, evaluator));
        *self.memo.borrow_mut() = Some((inputs, composed.clone()));
        composed
    }

    fn compose_uncached(&self, inputs: &ThemeInputs, evaluator: &Evaluator) -> ComposedTheme {
        let (global, global_error) = match evaluate_object(evaluator, &inputs.global) {
            Ok(global) => (global, None),
            Err(failure) => {
                warn!(error = %failure.summary(), "global overrides failed, using base theme");
                (Value::empty_object(), Some(failure))
            }
        };

        let mut components = Object::with_capacity(inputs.components.len());
        let mut component_errors = Vec::new();
        for (key, source) in &inputs.components {
            let theme = match evaluate_object(evaluator, source) {
                Ok(theme) => theme,
                Err(failure) => {
                    warn!(key = %key, error = %failure.summary(), "component overrides failed");
                    component_errors.push((key.clone(), failure));
                    Value::empty_object()
                }
            };
            components.insert(key.clone(), theme);
        }

        let mut overlay = global.as_object().cloned().unwrap_or_default();
        overlay.insert("components".to_string(), Value::object(components));

        debug!(
            components = inputs.components.len(),
            failures = component_errors.len() + usize::from(global_error.is_some()),
            "composed theme"
        );

        ComposedTheme {
            theme: deep_merge(&self.base, &Value::object(overlay)),
            global_error,
            component_errors,
        }
    }

    /// `export const theme = ...` for the composed theme, or an empty string
    /// if it cannot be serialized
    pub fn export_source(&self, store: &DataStore, evaluator: &Evaluator) -> String {
        let composed = self.compose(store, evaluator);
        match export_theme(&composed.theme) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "theme export failed");
                String::new()
            }
        }
    }
}

/// Evaluate a snippet that must produce an object
fn evaluate_object(evaluator: &Evaluator, source: &str) -> Result<Value, EvalFailure> {
    match evaluator.evaluate(source)? {
        value @ Value::Object(_) => Ok(value),
        other => Err(EvalFailure {
            kind: FailureKind::Runtime,
            message: format!("overrides must evaluate to an object, got {}", other.type_of()),
            location: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Capabilities;
    use crate::store::NewComponent;

    fn setup() -> (DataStore, Evaluator) {
        (DataStore::new(), Evaluator::new(Capabilities::standard()))
    }

    #[test]
    fn test_base_theme_has_scales() {
        let (_, evaluator) = setup();
        let compositor = ThemeCompositor::new(&evaluator);
        let base = compositor.base_theme();
        for path in ["colors.gray.500", "colors.blue.500", "colors.green.500", "colors.red.500", "colors.brand.500"] {
            assert!(base.get_path(path).is_some(), "missing {}", path);
        }
        assert!(base.get_path("components").is_some());
    }

    #[test]
    fn test_non_object_override_counts_as_failure() {
        let (mut store, evaluator) = setup();
        store
            .add_component(NewComponent::new("Tag", "Tags").overrides_source("42"))
            .unwrap();
        let compositor = ThemeCompositor::new(&evaluator);
        let composed = compositor.compose(&store, &evaluator);
        assert!(composed.component_error("Tag").is_some());
        assert_eq!(
            composed.theme.get_path("components.Tag"),
            Some(&Value::empty_object())
        );
    }

    #[test]
    fn test_compose_is_memoized_until_sources_change() {
        let (mut store, evaluator) = setup();
        store.add_component(NewComponent::new("Tag", "Tags")).unwrap();
        let compositor = ThemeCompositor::new(&evaluator);

        let first = compositor.compose(&store, &evaluator);
        let second = compositor.compose(&store, &evaluator);
        assert!(Rc::ptr_eq(&first, &second));

        store.set_overrides_source("Tag", "{ baseStyle: { color: 'red' } }");
        let third = compositor.compose(&store, &evaluator);
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(
            third.theme.get_path("components.Tag.baseStyle.color"),
            Some(&Value::from("red"))
        );
    }

    #[test]
    fn test_global_failure_falls_back_to_base() {
        let (mut store, evaluator) = setup();
        store.set_global_overrides_source("{ colors: ");
        let compositor = ThemeCompositor::new(&evaluator);
        let composed = compositor.compose(&store, &evaluator);
        assert!(composed.global_error.is_some());
        assert_eq!(
            composed.theme.get_path("colors.gray.500"),
            compositor.base_theme().get_path("colors.gray.500")
        );
    }
}
