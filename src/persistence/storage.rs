//! Durable key-value backends

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Minimal string key-value store the editor state is written to
pub trait KeyValueStore {
    /// Human-readable name for logging
    fn name(&self) -> &str;

    /// Stored value, or `None` on first run
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// In-memory backend for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<FxHashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a
/// crash mid-write never leaves a truncated state file.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FileStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn name(&self) -> &str {
        "FileStore"
    }

    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));
        {
            let mut writer = BufWriter::new(File::create(&tmp_path)?);
            writer.write_all(value.as_bytes())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &path)?;

        tracing::debug!(path = %path.display(), bytes = value.len(), "wrote state file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join("nested"));

        assert_eq!(store.get("state").unwrap(), None);
        store.set("state", "{\"a\":1}").unwrap();
        assert_eq!(store.get("state").unwrap().as_deref(), Some("{\"a\":1}"));
        assert!(!tmp.path().join("nested").join("state.json.tmp").exists());
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        store.set("k", "1").unwrap();
        store.set("k", "2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("2"));
    }
}
