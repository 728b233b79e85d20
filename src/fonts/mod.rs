//! Font catalog collaborator
//!
//! Listing available families is best effort: a catalog that fails yields
//! an empty list and a log line, never an error in the editor. Loading is
//! fire and forget.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontFamily {
    pub family: String,
}

impl FontFamily {
    pub fn new(family: impl Into<String>) -> Self {
        FontFamily {
            family: family.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("font catalog {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub trait FontCatalog {
    fn list(&self) -> Result<Vec<FontFamily>, FontError>;

    /// Make `families` available to the preview. Failures are the
    /// catalog's to log.
    fn load(&self, families: &[String]);
}

/// Fixed in-memory list
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    families: Vec<FontFamily>,
}

impl StaticCatalog {
    pub fn new<I, S>(families: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        StaticCatalog {
            families: families.into_iter().map(FontFamily::new).collect(),
        }
    }

    /// A handful of common families, used when no catalog file is configured
    pub fn common() -> Self {
        Self::new([
            "Inter",
            "Roboto",
            "Open Sans",
            "Lato",
            "Montserrat",
            "Source Sans Pro",
            "Merriweather",
            "Playfair Display",
            "Lora",
            "Fira Code",
            "JetBrains Mono",
        ])
    }
}

impl FontCatalog for StaticCatalog {
    fn list(&self) -> Result<Vec<FontFamily>, FontError> {
        Ok(self.families.clone())
    }

    fn load(&self, families: &[String]) {
        debug!(count = families.len(), "static catalog load");
    }
}

/// Reads `[{ "family": ... }, ...]` from a file on every `list`
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileCatalog {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl FontCatalog for JsonFileCatalog {
    fn list(&self) -> Result<Vec<FontFamily>, FontError> {
        let text = fs::read_to_string(&self.path).map_err(|source| FontError::Io {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| FontError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    fn load(&self, families: &[String]) {
        debug!(path = %self.path.display(), ?families, "file catalog load");
    }
}

/// Families offered by `catalog`, or an empty list when it fails
pub fn available_families(catalog: &dyn FontCatalog) -> Vec<FontFamily> {
    match catalog.list() {
        Ok(families) => families,
        Err(err) => {
            warn!(error = %err, "font catalog unavailable");
            Vec::new()
        }
    }
}

/// `{ body, heading, mono }` snippet using the selected families, ready to
/// paste into the global overrides
pub fn font_stack_snippet(fonts: &[String]) -> String {
    let stack = fonts
        .iter()
        .map(|family| format!("'{family}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut object = serde_json::Map::new();
    for slot in ["body", "heading", "mono"] {
        object.insert(slot.to_string(), serde_json::Value::String(stack.clone()));
    }
    serde_json::to_string_pretty(&serde_json::Value::Object(object)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Broken;

    impl FontCatalog for Broken {
        fn list(&self) -> Result<Vec<FontFamily>, FontError> {
            Err(FontError::Io {
                path: PathBuf::from("/nowhere"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            })
        }

        fn load(&self, _families: &[String]) {}
    }

    #[test]
    fn test_failing_catalog_lists_nothing() {
        assert!(available_families(&Broken).is_empty());
    }

    #[test]
    fn test_json_file_catalog() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("fonts.json");
        fs::write(&path, r#"[{ "family": "Inter" }, { "family": "Lora" }]"#).unwrap();

        let families = available_families(&JsonFileCatalog::new(&path));
        assert_eq!(families, vec![FontFamily::new("Inter"), FontFamily::new("Lora")]);

        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            JsonFileCatalog::new(&path).list(),
            Err(FontError::Malformed { .. })
        ));
    }

    #[test]
    fn test_font_stack_snippet() {
        let snippet = font_stack_snippet(&["Inter".to_string(), "Lora".to_string()]);
        let parsed: serde_json::Value = serde_json::from_str(&snippet).unwrap();
        assert_eq!(parsed["body"], "'Inter', 'Lora'");
        assert_eq!(parsed["mono"], "'Inter', 'Lora'");
    }
}
