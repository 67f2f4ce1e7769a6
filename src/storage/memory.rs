use crate::error::{HearthError, Result};
use crate::storage::{validate_key, DocumentStore};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// In-process backend, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, serde_json::Value>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, serde_json::Value>>> {
        self.documents
            .lock()
            .map_err(|_| HearthError::Storage("Memory store lock poisoned".into()).into())
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        validate_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        validate_key(key)?;
        self.lock()?.insert(key.to_string(), value.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
