//! services/app/src/adapters/store.rs
//!
//! Durable local key-value storage adapters implementing the `KeyValueStore`
//! port from the `core` crate. `FileStore` mirrors browser localStorage onto a
//! single JSON object file; `MemoryStore` backs tests and ephemeral runs.

use novelink_core::ports::KeyValueStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

//=========================================================================================
// FileStore
//=========================================================================================

/// A file-backed key-value store.
///
/// The whole map is loaded once at construction and written back on every
/// mutation (write-through, matching the synchronous persistence the
/// preference store relies on). A missing or corrupt file degrades to an
/// empty map rather than failing.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str::<HashMap<String, String>>(&raw).unwrap_or_else(|e| {
                warn!("Local store at {} is corrupt ({}); starting empty", path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        // Persistence failures degrade to in-memory-only operation.
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    warn!("Failed to write local store {}: {}", self.path.display(), e);
                }
            }
            Err(e) => warn!("Failed to serialize local store: {}", e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if entries.remove(key).is_some() {
            self.persist(&entries);
        }
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

//=========================================================================================
// MemoryStore
//=========================================================================================

/// An in-memory key-value store with the same semantics as `FileStore`,
/// minus the file.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().expect("store lock poisoned").get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.lock().expect("store lock poisoned").remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .expect("store lock poisoned")
            .keys()
            .cloned()
            .collect()
    }
}
