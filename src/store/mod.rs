//! Component registry and editable state
//!
//! [`DataStore`] is the single owner of everything the user edits: component
//! entries with their raw override and render text, the global override
//! text, the selected component and the active font families. Everything
//! else in the editor (composed theme, renderers, previews) is derived from
//! it on read.
//!
//! Every mutation bumps [`DataStore::revision`], which is how the persistence
//! scheduler and derived caches learn that something changed.

pub mod snapshot;
pub mod templates;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use snapshot::{GlobalSnapshot, Snapshot};

/// One registered component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentEntry {
    pub key: String,
    pub name: String,
    pub overrides_source: String,
    pub render_source: String,
}

/// Input to [`DataStore::add_component`]; omitted sources use the templates
#[derive(Debug, Clone, Default)]
pub struct NewComponent {
    pub key: String,
    pub name: String,
    pub render_source: Option<String>,
    pub overrides_source: Option<String>,
}

impl NewComponent {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn render_source(mut self, source: impl Into<String>) -> Self {
        self.render_source = Some(source.into());
        self
    }

    pub fn overrides_source(mut self, source: impl Into<String>) -> Self {
        self.overrides_source = Some(source.into());
        self
    }
}

/// Reasons a component cannot be added
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("component name must not be empty")]
    EmptyName,
    #[error("component key must not be empty")]
    EmptyKey,
    #[error("component key '{key}' must not contain whitespace")]
    KeyContainsWhitespace { key: String },
    #[error("a component with key '{key}' already exists")]
    DuplicateKey { key: String },
}

#[derive(Debug, Clone)]
pub struct DataStore {
    components: BTreeMap<String, ComponentEntry>,
    global_overrides_source: String,
    selected: Option<String>,
    fonts: Vec<String>,
    revision: u64,
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DataStore {
    /// Empty registry with the default global overrides
    pub fn new() -> Self {
        DataStore {
            components: BTreeMap::new(),
            global_overrides_source: templates::default_global_overrides(),
            selected: None,
            fonts: Vec::new(),
            revision: 0,
        }
    }

    /// Registry seeded with the built-in starter components
    pub fn with_defaults() -> Self {
        let mut store = Self::new();
        for (key, name, render) in templates::seed_components() {
            store.components.insert(
                key.to_string(),
                ComponentEntry {
                    key: key.to_string(),
                    name: name.to_string(),
                    overrides_source: templates::default_overrides(key),
                    render_source: render,
                },
            );
        }
        store
    }

    /// Monotonic change counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // ===== Components =====

    pub fn add_component(&mut self, new: NewComponent) -> Result<(), ValidationError> {
        if new.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if new.key.trim().is_empty() {
            return Err(ValidationError::EmptyKey);
        }
        if new.key.chars().any(char::is_whitespace) {
            return Err(ValidationError::KeyContainsWhitespace { key: new.key });
        }
        if self.components.contains_key(&new.key) {
            return Err(ValidationError::DuplicateKey { key: new.key });
        }

        let entry = ComponentEntry {
            overrides_source: new
                .overrides_source
                .unwrap_or_else(|| templates::default_overrides(&new.key)),
            render_source: new
                .render_source
                .unwrap_or_else(|| templates::default_render(&new.key)),
            key: new.key.clone(),
            name: new.name,
        };
        debug!(key = %entry.key, "component added");
        self.components.insert(new.key, entry);
        self.touch();
        Ok(())
    }

    /// Remove a component; clears the selection if it pointed at it
    pub fn remove_component(&mut self, key: &str) -> Option<ComponentEntry> {
        let removed = self.components.remove(key)?;
        if self.selected.as_deref() == Some(key) {
            self.selected = None;
        }
        debug!(key, "component removed");
        self.touch();
        Some(removed)
    }

    pub fn component(&self, key: &str) -> Option<&ComponentEntry> {
        self.components.get(key)
    }

    /// Entries in ascending key order
    pub fn components(&self) -> impl Iterator<Item = &ComponentEntry> {
        self.components.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    // ===== Raw text =====

    pub fn set_overrides_source(&mut self, key: &str, text: &str) -> bool {
        self.update_entry(key, |entry| &mut entry.overrides_source, text)
    }

    /// Override text for `key`; empty for unknown keys
    pub fn overrides_source(&self, key: &str) -> &str {
        self.components
            .get(key)
            .map_or("", |entry| entry.overrides_source.as_str())
    }

    pub fn set_render_source(&mut self, key: &str, text: &str) -> bool {
        self.update_entry(key, |entry| &mut entry.render_source, text)
    }

    /// Render text for `key`; empty for unknown keys
    pub fn render_source(&self, key: &str) -> &str {
        self.components
            .get(key)
            .map_or("", |entry| entry.render_source.as_str())
    }

    pub fn set_global_overrides_source(&mut self, text: &str) {
        if self.global_overrides_source != text {
            self.global_overrides_source = text.to_string();
            self.touch();
        }
    }

    pub fn global_overrides_source(&self) -> &str {
        &self.global_overrides_source
    }

    fn update_entry(
        &mut self,
        key: &str,
        field: fn(&mut ComponentEntry) -> &mut String,
        text: &str,
    ) -> bool {
        let Some(entry) = self.components.get_mut(key) else {
            return false;
        };
        let slot = field(entry);
        if slot.as_str() != text {
            *slot = text.to_string();
            self.touch();
        }
        true
    }

    // ===== Selection =====

    /// Select a component, or clear the selection with `None`.
    /// Unknown keys are rejected and leave the selection unchanged.
    pub fn select(&mut self, key: Option<&str>) -> bool {
        match key {
            Some(key) if !self.components.contains_key(key) => false,
            _ => {
                let next = key.map(str::to_string);
                if self.selected != next {
                    self.selected = next;
                    self.touch();
                }
                true
            }
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    // ===== Fonts =====

    pub fn select_font(&mut self, name: &str) {
        self.fonts.push(name.to_string());
        self.touch();
    }

    /// Remove the first occurrence of `name`; returns whether one was found
    pub fn unselect_font(&mut self, name: &str) -> bool {
        match self.fonts.iter().position(|font| font == name) {
            Some(index) => {
                self.fonts.remove(index);
                self.touch();
                true
            }
            None => false,
        }
    }

    pub fn fonts(&self) -> &[String] {
        &self.fonts
    }

    // ===== Snapshots =====

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            global: GlobalSnapshot {
                overrides_source: self.global_overrides_source.clone(),
            },
            components: self.components.clone(),
            fonts: self.fonts.clone(),
            selected: self.selected.clone(),
        }
    }

    /// Replace all state from a snapshot. Map keys are authoritative for
    /// entry keys, and a selection naming a missing component is dropped.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.components = snapshot
            .components
            .into_iter()
            .map(|(key, mut entry)| {
                entry.key = key.clone();
                (key, entry)
            })
            .collect();
        self.global_overrides_source = snapshot.global.overrides_source;
        self.fonts = snapshot.fonts;
        self.selected = snapshot
            .selected
            .filter(|key| self.components.contains_key(key));
        debug!(components = self.components.len(), "store restored");
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_order() {
        let mut store = DataStore::new();
        assert_eq!(
            store.add_component(NewComponent::new("", "")),
            Err(ValidationError::EmptyName)
        );
        assert_eq!(
            store.add_component(NewComponent::new("  ", "Tags")),
            Err(ValidationError::EmptyKey)
        );
        assert_eq!(
            store.add_component(NewComponent::new("my tag", "Tags")),
            Err(ValidationError::KeyContainsWhitespace {
                key: "my tag".to_string()
            })
        );
        store.add_component(NewComponent::new("Tag", "Tags")).unwrap();
        assert_eq!(
            store.add_component(NewComponent::new("Tag", "Other")),
            Err(ValidationError::DuplicateKey {
                key: "Tag".to_string()
            })
        );
        assert_eq!(store.component("Tag").unwrap().name, "Tags");
    }

    #[test]
    fn test_omitted_sources_use_templates() {
        let mut store = DataStore::new();
        store.add_component(NewComponent::new("Tag", "Tags")).unwrap();
        assert_eq!(store.overrides_source("Tag"), templates::default_overrides("Tag"));
        assert_eq!(store.render_source("Tag"), templates::default_render("Tag"));
    }

    #[test]
    fn test_unknown_keys_read_as_empty() {
        let mut store = DataStore::new();
        assert_eq!(store.render_source("Nope"), "");
        assert!(!store.set_render_source("Nope", "x"));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_removing_selected_component_clears_selection() {
        let mut store = DataStore::with_defaults();
        assert!(store.select(Some("Button")));
        store.remove_component("Button");
        assert_eq!(store.selected(), None);
        assert!(store.remove_component("Button").is_none());
    }

    #[test]
    fn test_select_unknown_key_is_rejected() {
        let mut store = DataStore::with_defaults();
        store.select(Some("Input"));
        assert!(!store.select(Some("Missing")));
        assert_eq!(store.selected(), Some("Input"));
        assert!(store.select(None));
        assert_eq!(store.selected(), None);
    }

    #[test]
    fn test_unselect_font_removes_one_occurrence() {
        let mut store = DataStore::new();
        store.select_font("Inter");
        store.select_font("Lora");
        store.select_font("Inter");
        assert!(store.unselect_font("Inter"));
        assert_eq!(store.fonts(), ["Lora".to_string(), "Inter".to_string()]);
        assert!(!store.unselect_font("Missing"));
    }

    #[test]
    fn test_revision_tracks_real_changes() {
        let mut store = DataStore::with_defaults();
        let start = store.revision();
        store.set_overrides_source("Button", "{ a: 1 }");
        assert_eq!(store.revision(), start + 1);
        store.set_overrides_source("Button", "{ a: 1 }");
        assert_eq!(store.revision(), start + 1);
    }

    #[test]
    fn test_restore_drops_dangling_selection() {
        let mut store = DataStore::with_defaults();
        let mut snapshot = store.snapshot();
        snapshot.selected = Some("Gone".to_string());
        store.restore(snapshot);
        assert_eq!(store.selected(), None);
        assert_eq!(store.len(), 3);
    }
}
