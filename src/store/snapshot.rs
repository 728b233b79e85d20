//! Serializable form of the editable state
//!
//! The layout is the persisted JSON document:
//!
//! ```text
//! { "global": { "overridesSource": "..." },
//!   "components": { "<key>": { "key", "name", "overridesSource", "renderSource" } },
//!   "fonts": ["..."],
//!   "selected": "<key>" | null }
//! ```
//!
//! `selected` may be missing when reading older documents.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::ComponentEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSnapshot {
    pub overrides_source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub global: GlobalSnapshot,
    pub components: BTreeMap<String, ComponentEntry>,
    pub fonts: Vec<String>,
    #[serde(default)]
    pub selected: Option<String>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_layout_without_selection() {
        let text = r#"{
            "global": { "overridesSource": "{}" },
            "components": {
                "Tag": { "key": "Tag", "name": "Tags", "overridesSource": "{}", "renderSource": "() => 1" }
            },
            "fonts": ["Inter"]
        }"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.selected, None);
        assert_eq!(snapshot.components["Tag"].name, "Tags");
        assert_eq!(snapshot.fonts, vec!["Inter".to_string()]);
    }

    #[test]
    fn test_field_names_are_camel_case() {
        let mut components = BTreeMap::new();
        components.insert(
            "Tag".to_string(),
            ComponentEntry {
                key: "Tag".to_string(),
                name: "Tags".to_string(),
                overrides_source: "{}".to_string(),
                render_source: "() => 1".to_string(),
            },
        );
        let snapshot = Snapshot {
            global: GlobalSnapshot {
                overrides_source: "{}".to_string(),
            },
            components,
            fonts: Vec::new(),
            selected: Some("Tag".to_string()),
        };
        let text = snapshot.to_json().unwrap();
        assert!(text.contains("\"overridesSource\""));
        assert!(text.contains("\"renderSource\""));
        assert!(!text.contains("overrides_source"));
    }
}
