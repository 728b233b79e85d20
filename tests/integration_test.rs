// Integration tests for the editor pipeline: store -> compositor -> renderer

use std::rc::Rc;
use std::time::{Duration, Instant};

use themelab::fonts::StaticCatalog;
use themelab::interpreter::{Capabilities, Evaluator};
use themelab::persistence::{KeyValueStore, MemoryStore, PersistenceBridge, STORAGE_KEY};
use themelab::render::{RenderProps, RendererBridge};
use themelab::store::{DataStore, NewComponent, ValidationError};
use themelab::studio::Studio;
use themelab::theme::ThemeCompositor;
use themelab::value::Value;

fn store_with(components: &[(&str, &str)]) -> DataStore {
    let mut store = DataStore::new();
    for (key, overrides) in components {
        store
            .add_component(NewComponent::new(*key, *key).overrides_source(*overrides))
            .expect("component should be accepted");
    }
    store
}

#[test]
fn test_component_overrides_compose_independently() {
    let evaluator = Evaluator::new(Capabilities::standard());
    let compositor = ThemeCompositor::new(&evaluator);
    let store = store_with(&[
        ("A", "{ baseStyle: { color: 'red' } }"),
        ("B", "{ sizes: { sm: { px: 2 } } }"),
    ]);

    let composed = compositor.compose(&store, &evaluator);
    let a = evaluator.evaluate("{ baseStyle: { color: 'red' } }").unwrap();
    let b = evaluator.evaluate("{ sizes: { sm: { px: 2 } } }").unwrap();

    assert_eq!(composed.theme.get_path("components.A"), Some(&a));
    assert_eq!(composed.theme.get_path("components.B"), Some(&b));
    assert!(composed.component_errors.is_empty());
}

#[test]
fn test_broken_component_override_is_contained() {
    let evaluator = Evaluator::new(Capabilities::standard());
    let compositor = ThemeCompositor::new(&evaluator);
    let store = store_with(&[
        ("A", "{ baseStyle: { color: "),
        ("B", "{ sizes: { sm: { px: 2 } } }"),
    ]);

    let composed = compositor.compose(&store, &evaluator);
    assert_eq!(
        composed.theme.get_path("components.A"),
        Some(&Value::empty_object())
    );
    assert_eq!(
        composed.theme.get_path("components.B.sizes.sm.px"),
        Some(&Value::Number(2.0))
    );
    assert!(composed.component_error("A").is_some());
    assert!(composed.component_error("B").is_none());
}

#[test]
fn test_global_override_is_partial() {
    let evaluator = Evaluator::new(Capabilities::standard());
    let compositor = ThemeCompositor::new(&evaluator);
    let mut store = DataStore::new();
    store.set_global_overrides_source("{ colors: { brand: { 500: '#ff0000' } } }");

    let composed = compositor.compose(&store, &evaluator);
    let base = compositor.base_theme();

    assert_eq!(
        composed.theme.get_path("colors.brand.500"),
        Some(&Value::from("#ff0000"))
    );
    assert_eq!(
        composed.theme.get_path("colors.brand.600"),
        base.get_path("colors.brand.600")
    );
    assert_eq!(
        composed.theme.get_path("colors.gray"),
        base.get_path("colors.gray")
    );
    assert!(base.get_path("colors.gray.100").is_some());
}

#[test]
fn test_broken_global_falls_back_to_base() {
    let evaluator = Evaluator::new(Capabilities::standard());
    let compositor = ThemeCompositor::new(&evaluator);
    let mut store = DataStore::new();
    store.set_global_overrides_source("{ colors: { brand: ");

    let composed = compositor.compose(&store, &evaluator);
    assert!(composed.global_error.is_some());
    assert_eq!(
        composed.theme.get_path("colors"),
        compositor.base_theme().get_path("colors")
    );
}

#[test]
fn test_throwing_renderer_is_isolated() {
    let mut store = DataStore::new();
    store
        .add_component(
            NewComponent::new("X", "Broken")
                .render_source("({ size, variant }) => { throw new Error('boom') }"),
        )
        .unwrap();
    store
        .add_component(
            NewComponent::new("Y", "Fine")
                .render_source("({ size }) => ui.Button({ size }, 'ok')"),
        )
        .unwrap();
    let evaluator = Evaluator::new(Capabilities::standard());
    let bridge = RendererBridge::new(&store, &evaluator);

    let failure = bridge
        .render("X", &RenderProps::new(Some("md"), Some("solid")))
        .unwrap_err();
    assert_eq!(failure.key, "X");
    assert!(failure.message.contains("boom"), "{}", failure.message);

    let element = bridge
        .render("Y", &RenderProps::new(Some("md"), None))
        .expect("valid component should still render");
    assert_eq!(element.tag, "Button");
    assert_eq!(element.text_content(), "ok");
}

#[test]
fn test_render_failure_is_per_cell() {
    let mut store = DataStore::new();
    store
        .add_component(
            NewComponent::new("X", "X")
                .overrides_source("{ sizes: { sm: {}, lg: {} } }")
                .render_source(
                    "({ size }) => { if (size === 'lg') { throw new Error('too big') } return ui.Box({ size }) }",
                ),
        )
        .unwrap();
    let studio = Studio::new(store);
    let cells = studio.preview_grid("X");

    let outcomes: Vec<(Option<&str>, bool)> = cells
        .iter()
        .map(|cell| (cell.size.as_deref(), cell.output.is_ok()))
        .collect();
    assert_eq!(
        outcomes,
        vec![(Some("sm"), true), (Some("lg"), false), (None, true)]
    );
}

#[test]
fn test_unchanged_render_source_reuses_renderer() {
    let store = store_with(&[("X", "{}")]);
    let evaluator = Evaluator::new(Capabilities::standard());
    let bridge = RendererBridge::new(&store, &evaluator);

    let first = bridge.renderer("X").unwrap();
    let compilations = evaluator.compilations();
    let second = bridge.renderer("X").unwrap();

    assert!(first.same_as(&second));
    assert_eq!(evaluator.compilations(), compilations);
}

#[test]
fn test_duplicate_key_is_rejected() {
    let mut store = DataStore::new();
    store
        .add_component(NewComponent::new("Foo", "First"))
        .unwrap();
    let before = store.component("Foo").cloned();

    let err = store
        .add_component(NewComponent::new("Foo", "Second"))
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::DuplicateKey {
            key: "Foo".to_string()
        }
    );
    assert_eq!(store.len(), 1);
    assert_eq!(store.component("Foo").cloned(), before);
}

#[test]
fn test_unselecting_absent_font_is_noop() {
    let mut store = DataStore::new();
    store.select_font("Inter");
    store.select_font("Inter");
    let revision = store.revision();

    assert!(!store.unselect_font("Roboto"));
    assert_eq!(store.fonts(), ["Inter", "Inter"]);
    assert_eq!(store.revision(), revision);

    assert!(store.unselect_font("Inter"));
    assert_eq!(store.fonts(), ["Inter"]);
}

#[test]
fn test_snapshot_round_trip() {
    let mut store = DataStore::with_defaults();
    store
        .add_component(NewComponent::new("Tag", "Tags"))
        .unwrap();
    store.set_render_source("Button", "() => ui.Button(null, 'Go')");
    store.set_global_overrides_source("{ colors: { brand: { 500: 'teal' } } }");
    store.select(Some("Tag"));
    store.select_font("Lora");

    let snapshot = store.snapshot();
    let mut restored = DataStore::new();
    restored.restore(snapshot.clone());
    assert_eq!(restored.snapshot(), snapshot);
}

/// Lets the test read what the bridge wrote
struct Shared(Rc<MemoryStore>);

impl KeyValueStore for Shared {
    fn name(&self) -> &str {
        "Shared"
    }

    fn get(&self, key: &str) -> std::io::Result<Option<String>> {
        self.0.get(key)
    }

    fn set(&self, key: &str, value: &str) -> std::io::Result<()> {
        self.0.set(key, value)
    }
}

#[test]
fn test_studio_persists_across_sessions() {
    let memory = Rc::new(MemoryStore::new());
    let quiet = Duration::from_millis(100);

    let mut studio = Studio::open(
        PersistenceBridge::with_quiet_period(Box::new(Shared(memory.clone())), quiet),
        Box::new(StaticCatalog::common()),
    );
    studio
        .add_component(NewComponent::new("Badge", "Badges"))
        .unwrap();
    studio.select(Some("Badge"));

    let start = Instant::now();
    assert!(!studio.tick(start));
    assert!(studio.save_pending());
    assert!(memory.get(STORAGE_KEY).unwrap().is_none());
    assert!(studio.tick(start + quiet * 2));

    let reopened = Studio::open(
        PersistenceBridge::new(Box::new(Shared(memory.clone()))),
        Box::new(StaticCatalog::common()),
    );
    assert_eq!(reopened.store().selected(), Some("Badge"));
    assert_eq!(reopened.store().snapshot(), studio.store().snapshot());
}

#[test]
fn test_export_is_a_module_statement() {
    let studio = Studio::new(DataStore::with_defaults());
    let exported = studio.export_source();

    let body = exported
        .strip_prefix("export const theme = ")
        .expect("export prefix");
    let parsed: serde_json::Value = serde_json::from_str(body.trim_end()).unwrap();
    assert_eq!(parsed["components"]["Button"]["defaultProps"]["size"], "md");
    assert_eq!(parsed["colors"]["brand"]["500"], "#6f02e5");
}
