use crate::error::{HearthError, Result};
use crate::storage::{validate_key, DocumentStore};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Flat-file backend: one pretty-printed `<key>.json` per document
///
/// Every `put` rewrites the whole file. Concurrent writers from separate
/// processes race with last-writer-wins semantics.
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`, creating the directory if needed
    ///
    /// # Examples
    ///
    /// ```
    /// use hearth::storage::{DocumentStore, JsonFileStore};
    ///
    /// let dir = tempfile::tempdir().unwrap();
    /// let store = JsonFileStore::new(dir.path().join("data")).unwrap();
    /// store.put("routing-log", &serde_json::json!([])).unwrap();
    /// assert!(dir.path().join("data/routing-log.json").exists());
    /// ```
    pub fn new<P: Into<PathBuf>>(root: P) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .context("Failed to create data directory")
            .map_err(|e| HearthError::Storage(e.to_string()))?;
        Ok(Self { root })
    }

    /// Directory holding the documents
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl DocumentStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let path = self.path_for(key)?;
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(HearthError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                ))
                .into())
            }
        };

        let value = serde_json::from_str(&contents).map_err(|e| {
            HearthError::CorruptDocument(format!("{}: {}", path.display(), e))
        })?;
        Ok(Some(value))
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(value).map_err(HearthError::Serialization)?;
        std::fs::write(&path, json).map_err(|e| {
            HearthError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root).map_err(|e| {
            HearthError::Storage(format!("Failed to list {}: {}", self.root.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HearthError::Storage(e.to_string()))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                keys.push(stem.to_string());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
