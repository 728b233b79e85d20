//! Persistence bridge
//!
//! Saves store snapshots to a [`KeyValueStore`] on a trailing-edge debounce
//! and reads them back at startup.
//!
//! # Failure Modes
//!
//! | Failure | Behavior |
//! |---------|----------|
//! | No stored state | `load` returns `None`, store keeps defaults |
//! | Unparseable state | Logged, `load` returns `None` |
//! | Backend I/O error | Logged, the edit stays in memory |
//!
//! Nothing here returns an error to the editor.

pub mod debounce;
pub mod storage;

use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::store::{DataStore, Snapshot};

pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
pub use storage::{FileStore, KeyValueStore, MemoryStore};

/// Key the editor state is stored under
pub const STORAGE_KEY: &str = "themelab.state";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("state is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub struct PersistenceBridge {
    backend: Box<dyn KeyValueStore>,
    debouncer: Debouncer,
    /// Store revision the bridge last saw
    seen_revision: Option<u64>,
}

impl PersistenceBridge {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self::with_quiet_period(backend, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(backend: Box<dyn KeyValueStore>, quiet: Duration) -> Self {
        PersistenceBridge {
            backend,
            debouncer: Debouncer::new(quiet),
            seen_revision: None,
        }
    }

    /// Read the stored snapshot; absent or unreadable data yields `None`
    pub fn load(&self) -> Option<Snapshot> {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                info!(
                    backend = self.backend.name(),
                    components = snapshot.components.len(),
                    "loaded saved state"
                );
                Some(snapshot)
            }
            Ok(None) => {
                info!(backend = self.backend.name(), "no saved state, using defaults");
                None
            }
            Err(err) => {
                warn!(backend = self.backend.name(), error = %err, "ignoring saved state");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match self.backend.get(STORAGE_KEY)? {
            Some(text) => Ok(Some(Snapshot::from_json(&text)?)),
            None => Ok(None),
        }
    }

    /// Write a snapshot now. Failures are logged; returns whether it was
    /// written.
    pub fn save(&self, snapshot: &Snapshot) -> bool {
        match self.try_save(snapshot) {
            Ok(()) => true,
            Err(err) => {
                warn!(backend = self.backend.name(), error = %err, "failed to save state");
                false
            }
        }
    }

    fn try_save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let text = snapshot.to_json()?;
        self.backend.set(STORAGE_KEY, &text)?;
        Ok(())
    }

    /// Start tracking `store` from its current revision without scheduling
    /// a save
    pub fn watch(&mut self, store: &DataStore) {
        self.seen_revision = Some(store.revision());
        self.debouncer.cancel();
    }

    /// Drive the schedule from the event loop: a changed revision re-arms
    /// the timer, and an expired timer saves. Returns whether a save ran.
    pub fn tick(&mut self, store: &DataStore, now: Instant) -> bool {
        if self.seen_revision != Some(store.revision()) {
            self.seen_revision = Some(store.revision());
            self.debouncer.notify(now);
        }
        if self.debouncer.poll(now) {
            return self.save(&store.snapshot());
        }
        false
    }

    /// Save immediately if a save is pending (used on exit)
    pub fn flush(&mut self, store: &DataStore) -> bool {
        let changed = self.seen_revision != Some(store.revision());
        if self.debouncer.cancel() || changed {
            self.seen_revision = Some(store.revision());
            return self.save(&store.snapshot());
        }
        false
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    /// Shares one memory store between the bridge and the test
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
    fn test_garbage_loads_as_none() {
        let memory = Rc::new(MemoryStore::new());
        memory.set(STORAGE_KEY, "not json").unwrap();
        let bridge = PersistenceBridge::new(Box::new(Shared(memory)));
        assert!(bridge.load().is_none());
    }

    #[test]
    fn test_tick_saves_after_quiet_period() {
        let memory = Rc::new(MemoryStore::new());
        let mut bridge = PersistenceBridge::with_quiet_period(
            Box::new(Shared(memory.clone())),
            Duration::from_millis(100),
        );
        let mut store = DataStore::with_defaults();
        bridge.watch(&store);

        let start = Instant::now();
        assert!(!bridge.tick(&store, start));

        store.select_font("Inter");
        assert!(!bridge.tick(&store, start + Duration::from_millis(10)));
        store.select_font("Lora");
        assert!(!bridge.tick(&store, start + Duration::from_millis(60)));
        assert!(memory.get(STORAGE_KEY).unwrap().is_none());

        assert!(bridge.tick(&store, start + Duration::from_millis(200)));
        let saved = Snapshot::from_json(&memory.get(STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.fonts, vec!["Inter".to_string(), "Lora".to_string()]);
    }

    #[test]
    fn test_flush_writes_pending_changes() {
        let memory = Rc::new(MemoryStore::new());
        let mut bridge = PersistenceBridge::new(Box::new(Shared(memory.clone())));
        let mut store = DataStore::new();
        bridge.watch(&store);
        assert!(!bridge.flush(&store));

        store.set_global_overrides_source("{}");
        assert!(bridge.flush(&store));
        assert!(memory.get(STORAGE_KEY).unwrap().is_some());
    }
}
