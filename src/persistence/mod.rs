//! Key-value settings store
//!
//! Small persisted values (high score, preferences) go through the
//! `SettingsStore` trait so the simulation never touches storage directly.
//! - `MemoryStore`: process-local, used by tests and as a fallback
//! - `JsonFileStore`: flat JSON object on disk, rewritten on every set

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

/// Errors from a backing store
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Generic named-value store
pub trait SettingsStore {
    /// Read an integer value
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Write an integer value
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError>;

    /// Read a string value
    fn get_string(&self, key: &str) -> Option<String>;

    /// Write a string value
    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        Ok(())
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        Ok(())
    }
}

/// Store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, Value>,
}

impl JsonFileStore {
    /// Open a store at `path`; a missing file starts empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No store at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    /// Open a store, falling back to an empty one if the file is unreadable
    pub fn open_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::open(path).unwrap_or_else(|e| {
            log::warn!("Store {} unreadable ({}), starting fresh", path.display(), e);
            Self {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
            }
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.values)?;
        // Temp file then rename, so readers see the old or the new contents
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get_int(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(Value::as_i64)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush()
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), Value::from(value));
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("snowtoss_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get_int("high_score"), None);

        store.set_int("high_score", 42).unwrap();
        assert_eq!(store.get_int("high_score"), Some(42));

        store.set_string("name", "frosty").unwrap();
        assert_eq!(store.get_string("name").as_deref(), Some("frosty"));
        // Type mismatch reads as missing
        assert_eq!(store.get_int("name"), None);
    }

    #[test]
    fn test_file_store_persists() {
        let path = temp_path("persists");
        let _ = std::fs::remove_file(&path);

        {
            let mut store = JsonFileStore::open(&path).unwrap();
            assert_eq!(store.get_int("high_score"), None);
            store.set_int("high_score", 130).unwrap();
        }

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("high_score"), Some(130));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_store_corrupt_falls_back() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{{{ nope").unwrap();

        assert!(matches!(
            JsonFileStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
        let store = JsonFileStore::open_or_empty(&path);
        assert_eq!(store.get_int("high_score"), None);

        let _ = std::fs::remove_file(&path);
    }
}
