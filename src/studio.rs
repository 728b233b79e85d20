//! Editor facade
//!
//! [`Studio`] owns the store and the derived machinery (evaluator,
//! compositor, persistence, font catalog) and is what the TUI talks to. All
//! edits go through here so that derived state is always recomputed from
//! the store, and the persistence schedule sees every revision.

use std::rc::Rc;
use std::time::Instant;

use tracing::info;

use crate::fonts::{self, FontCatalog, FontFamily, StaticCatalog};
use crate::interpreter::{Capabilities, Evaluator};
use crate::persistence::PersistenceBridge;
use crate::render::{PreviewCell, RendererBridge};
use crate::store::{templates, ComponentEntry, DataStore, NewComponent, ValidationError};
use crate::theme::{ComposedTheme, ThemeCompositor};

pub struct Studio {
    store: DataStore,
    evaluator: Evaluator,
    compositor: ThemeCompositor,
    persistence: Option<PersistenceBridge>,
    fonts: Box<dyn FontCatalog>,
}

impl Studio {
    /// Studio over `store` with the standard capabilities and no persistence
    pub fn new(store: DataStore) -> Self {
        let evaluator = Evaluator::new(Capabilities::standard());
        let compositor = ThemeCompositor::new(&evaluator);
        Studio {
            store,
            evaluator,
            compositor,
            persistence: None,
            fonts: Box::new(StaticCatalog::common()),
        }
    }

    /// Restore saved state through `persistence`, falling back to the seeded
    /// defaults, and keep saving to it from then on. Restored font families
    /// are handed to `fonts` to load.
    pub fn open(mut persistence: PersistenceBridge, fonts: Box<dyn FontCatalog>) -> Self {
        let store = match persistence.load() {
            Some(snapshot) => {
                let mut store = DataStore::new();
                store.restore(snapshot);
                store
            }
            None => DataStore::with_defaults(),
        };
        persistence.watch(&store);

        let mut studio = Self::new(store);
        studio.persistence = Some(persistence);
        studio.fonts = fonts;
        if !studio.store.fonts().is_empty() {
            studio.fonts.load(studio.store.fonts());
        }
        studio
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    // ===== Derived views =====

    /// Current composed theme (memoized on the override text)
    pub fn theme(&self) -> Rc<ComposedTheme> {
        self.compositor.compose(&self.store, &self.evaluator)
    }

    pub fn export_source(&self) -> String {
        self.compositor.export_source(&self.store, &self.evaluator)
    }

    pub fn renderer_bridge(&self) -> RendererBridge<'_> {
        RendererBridge::new(&self.store, &self.evaluator)
    }

    /// Preview cells for `key` against the current theme
    pub fn preview_grid(&self, key: &str) -> Vec<PreviewCell> {
        let composed = self.theme();
        self.renderer_bridge().preview_grid(&composed.theme, key)
    }

    pub fn available_fonts(&self) -> Vec<FontFamily> {
        fonts::available_families(self.fonts.as_ref())
    }

    /// `{ body, heading, mono }` snippet for the active font families
    pub fn font_stack_snippet(&self) -> String {
        fonts::font_stack_snippet(self.store.fonts())
    }

    // ===== Edits =====

    pub fn add_component(&mut self, new: NewComponent) -> Result<(), ValidationError> {
        self.store.add_component(new)
    }

    pub fn remove_component(&mut self, key: &str) -> Option<ComponentEntry> {
        self.store.remove_component(key)
    }

    pub fn set_overrides_source(&mut self, key: &str, text: &str) -> bool {
        self.store.set_overrides_source(key, text)
    }

    pub fn set_render_source(&mut self, key: &str, text: &str) -> bool {
        self.store.set_render_source(key, text)
    }

    pub fn set_global_overrides_source(&mut self, text: &str) {
        self.store.set_global_overrides_source(text);
    }

    /// Put the default global overrides back, recovering from a broken
    /// global snippet
    pub fn reset_global_overrides(&mut self) {
        info!("resetting global overrides");
        self.store
            .set_global_overrides_source(&templates::default_global_overrides());
    }

    pub fn select(&mut self, key: Option<&str>) -> bool {
        self.store.select(key)
    }

    /// Activate a font family and ask the catalog to load the full set
    pub fn select_font(&mut self, family: &str) {
        self.store.select_font(family);
        self.fonts.load(self.store.fonts());
    }

    pub fn unselect_font(&mut self, family: &str) -> bool {
        self.store.unselect_font(family)
    }

    /// Unselect `family` if it is active, select it otherwise. Returns
    /// whether it is active afterwards.
    pub fn toggle_font(&mut self, family: &str) -> bool {
        if self.unselect_font(family) {
            return false;
        }
        self.select_font(family);
        true
    }

    /// Add a `fonts` entry built from the active families to the end of the
    /// global overrides object. Fails when the overrides have no closing
    /// brace to insert before.
    pub fn insert_font_stack(&mut self) -> bool {
        let source = self.store.global_overrides_source().to_string();
        let Some(close) = source.rfind('}') else {
            return false;
        };
        let head = source[..close].trim_end();
        let separator = if head.ends_with('{') || head.ends_with(',') {
            ""
        } else {
            ","
        };
        let snippet = self.font_stack_snippet().replace('\n', "\n  ");
        let updated = format!("{head}{separator}\n  fonts: {snippet}\n{}", &source[close..]);
        info!(fonts = self.store.fonts().len(), "inserted font stack");
        self.store.set_global_overrides_source(&updated);
        true
    }

    // ===== Persistence =====

    /// Drive the debounced save from the event loop
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.persistence.as_mut() {
            Some(persistence) => persistence.tick(&self.store, now),
            None => false,
        }
    }

    /// Write any unsaved change immediately
    pub fn flush(&mut self) -> bool {
        match self.persistence.as_mut() {
            Some(persistence) => persistence.flush(&self.store),
            None => false,
        }
    }

    pub fn save_pending(&self) -> bool {
        self.persistence
            .as_ref()
            .is_some_and(PersistenceBridge::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::FontError;
    use crate::persistence::{KeyValueStore, MemoryStore, STORAGE_KEY};
    use crate::value::Value;
    use std::cell::RefCell;

    #[test]
    fn test_defaults_compose_cleanly() {
        let studio = Studio::new(DataStore::with_defaults());
        let composed = studio.theme();
        assert!(composed.global_error.is_none());
        assert!(composed.component_errors.is_empty());
        assert_eq!(
            composed.theme.get_path("colors.brand.500"),
            Some(&Value::from("#6f02e5"))
        );
        assert!(studio.export_source().starts_with("export const theme = {"));
    }

    #[test]
    fn test_reset_recovers_from_broken_global() {
        let mut studio = Studio::new(DataStore::new());
        studio.set_global_overrides_source("{ colors: ");
        assert!(studio.theme().global_error.is_some());

        studio.reset_global_overrides();
        assert!(studio.theme().global_error.is_none());
    }

    #[test]
    fn test_preview_grid_for_seeded_button() {
        let mut studio = Studio::new(DataStore::with_defaults());
        assert_eq!(studio.preview_grid("Button").len(), 1);

        studio.set_overrides_source(
            "Button",
            "{ sizes: { sm: {}, md: {}, lg: {} }, variants: { solid: {}, outline: {} } }",
        );
        let cells = studio.preview_grid("Button");
        // sm, md, lg and default sizes x solid, outline and default variants
        assert_eq!(cells.len(), 12);
        assert!(cells.iter().all(|cell| cell.output.is_ok()));
    }

    /// Records every `load` so tests can see what reached the catalog
    struct Recording(Rc<RefCell<Vec<Vec<String>>>>);

    impl FontCatalog for Recording {
        fn list(&self) -> Result<Vec<FontFamily>, FontError> {
            Ok(vec![FontFamily::new("Inter"), FontFamily::new("Lora")])
        }

        fn load(&self, families: &[String]) {
            self.0.borrow_mut().push(families.to_vec());
        }
    }

    #[test]
    fn test_open_without_saved_state_seeds_defaults() {
        let studio = Studio::open(
            PersistenceBridge::new(Box::new(MemoryStore::new())),
            Box::new(StaticCatalog::common()),
        );
        assert!(studio.store().component("Button").is_some());
        assert!(!studio.save_pending());
    }

    #[test]
    fn test_open_loads_restored_fonts_through_given_catalog() {
        let backend = MemoryStore::new();
        let mut saved = DataStore::new();
        saved.select_font("Lora");
        backend
            .set(STORAGE_KEY, &saved.snapshot().to_json().unwrap())
            .unwrap();

        let loads = Rc::new(RefCell::new(Vec::new()));
        let studio = Studio::open(
            PersistenceBridge::new(Box::new(backend)),
            Box::new(Recording(loads.clone())),
        );
        assert_eq!(studio.store().fonts(), ["Lora"]);
        assert_eq!(*loads.borrow(), vec![vec!["Lora".to_string()]]);
        assert_eq!(studio.available_fonts().len(), 2);
    }

    #[test]
    fn test_toggle_font() {
        let mut studio = Studio::new(DataStore::new());
        assert!(studio.toggle_font("Inter"));
        assert_eq!(studio.store().fonts(), ["Inter"]);
        assert!(!studio.toggle_font("Inter"));
        assert!(studio.store().fonts().is_empty());
    }

    #[test]
    fn test_insert_font_stack_into_global_overrides() {
        let mut studio = Studio::new(DataStore::new());
        studio.set_global_overrides_source("{ colors: { brand: { 500: 'teal' } } }");
        studio.select_font("Inter");
        studio.select_font("Fira Code");

        assert!(studio.insert_font_stack());
        let composed = studio.theme();
        assert!(composed.global_error.is_none(), "{:?}", composed.global_error);
        assert_eq!(
            composed.theme.get_path("fonts.heading"),
            Some(&Value::from("'Inter', 'Fira Code'"))
        );
        assert_eq!(
            composed.theme.get_path("colors.brand.500"),
            Some(&Value::from("teal"))
        );

        studio.set_global_overrides_source("null");
        assert!(!studio.insert_font_stack());
    }
}
