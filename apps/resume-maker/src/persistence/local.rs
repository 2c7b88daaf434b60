//! Local durable storage: the working Document mirrored under one key.
//!
//! Reads and writes are best effort. Nothing here ever surfaces an error to the
//! editor; failures are logged and the caller carries on with what it has.

use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::Document;

/// Key the working Document is stored under.
pub const STORAGE_KEY: &str = "resume-maker:v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

// ────────────────────────────────────────────────────────────────────────────
// File store
// ────────────────────────────────────────────────────────────────────────────

/// One JSON file per key inside `dir`. Writes go through a temp file in the
/// same directory and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[cfg(test)]
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Memory store
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub use memory::MemoryStore;

#[cfg(test)]
mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::{KeyValueStore, StoreError};

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            Ok(entries.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document mirror
// ────────────────────────────────────────────────────────────────────────────

/// The Document stored under `key`, or `None` if absent or unreadable.
pub fn load_local(store: &dyn KeyValueStore, key: &str) -> Option<Document> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "local store read failed, starting from defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(doc) => Some(doc),
        Err(e) => {
            warn!(key, error = %e, "stored document unparseable, starting from defaults");
            None
        }
    }
}

/// Mirrors `doc` under `key`. Failures are logged and dropped.
pub fn save_local(store: &dyn KeyValueStore, key: &str, doc: &Document) {
    let result = serde_json::to_string(doc)
        .map_err(StoreError::from)
        .and_then(|raw| store.set(key, &raw));
    match result {
        Ok(()) => debug!(key, "document mirrored locally"),
        Err(e) => warn!(key, error = %e, "local save failed"),
    }
}
