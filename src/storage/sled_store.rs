use crate::error::{HearthError, Result};
use crate::storage::{validate_key, DocumentStore};
use sled::Db;
use std::path::Path;

/// Embedded key-value backend
///
/// Values are stored as JSON bytes under the document key and the tree is
/// flushed after every write.
pub struct SledStore {
    db: Db,
}

impl SledStore {
    /// Open (or create) a sled database at `path`
    ///
    /// # Errors
    ///
    /// Returns `HearthError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use hearth::storage::{DocumentStore, SledStore};
    ///
    /// # fn main() -> hearth::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::new(dir.path().join("hearth.sled"))?;
    /// store.put("meal-plan", &serde_json::json!([]))?;
    /// assert_eq!(store.list()?, vec!["meal-plan".to_string()]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)
            .map_err(|e| HearthError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }
}

impl DocumentStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        validate_key(key)?;
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| HearthError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| HearthError::CorruptDocument(format!("{}: {}", key, e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        validate_key(key)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| HearthError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| HearthError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| HearthError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        for result in self.db.iter() {
            let (key, _) =
                result.map_err(|e| HearthError::Storage(format!("Iteration failed: {}", e)))?;
            keys.push(String::from_utf8_lossy(&key).into_owned());
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_sled_store_put_get() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::new(dir.path().join("db")).unwrap();
        store.put("routing-log", &json!([{"a": 1}])).unwrap();
        assert_eq!(store.get("routing-log").unwrap(), Some(json!([{"a": 1}])));
        assert!(store.get("other").unwrap().is_none());
    }

    #[test]
    fn test_sled_store_invalid_json_is_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::new(dir.path().join("db")).unwrap();
        store.db.insert("routing-log", &b"[{\"trunc"[..]).unwrap();
        let err = store.get("routing-log").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HearthError>(),
            Some(HearthError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_sled_store_lists_keys_sorted() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::new(dir.path().join("db")).unwrap();
        store.put("b", &json!(1)).unwrap();
        store.put("a", &json!(1)).unwrap();
        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
    }
}
