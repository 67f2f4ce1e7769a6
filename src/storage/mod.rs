//! Document storage for history logs and saved plans
//!
//! The routing and planning code never touches files directly. Everything
//! persistent goes through [`DocumentStore`], a small key/value repository of
//! JSON documents, so the backend (flat files, sled, memory) can be swapped
//! by configuration alone.

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{HearthError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

pub mod json_file;
pub mod memory;
pub mod sled_store;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sled_store::SledStore;

/// Repository of JSON documents addressed by string keys
///
/// Implementations must rewrite a document in full on `put`; there is no
/// partial update or append primitive.
#[cfg_attr(test, mockall::automock)]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, `None` when the key has never been written
    ///
    /// A stored document that is not valid JSON is reported as
    /// `HearthError::CorruptDocument`.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Create or replace a document
    fn put(&self, key: &str, value: &serde_json::Value) -> Result<()>;

    /// All stored keys, sorted
    fn list(&self) -> Result<Vec<String>>;
}

/// Shared handle used by the router, history log and commands
pub type SharedStore = Arc<dyn DocumentStore>;

/// Load and deserialize a typed document
///
/// # Errors
///
/// Returns the backend error, or `HearthError::Serialization` when the stored
/// JSON does not match `T`.
pub fn load_document<T: DeserializeOwned>(store: &dyn DocumentStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(value) => {
            let typed = serde_json::from_value(value).map_err(HearthError::Serialization)?;
            Ok(Some(typed))
        }
        None => Ok(None),
    }
}

/// Serialize and store a typed document
pub fn store_document<T: Serialize + ?Sized>(
    store: &dyn DocumentStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let json = serde_json::to_value(value).map_err(HearthError::Serialization)?;
    store.put(key, &json)
}

/// Reject keys that could escape a store root or collide across backends
///
/// Keys are limited to ASCII letters, digits, `-`, `_` and `.`, must not be
/// empty and must not start with a dot.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(HearthError::Storage(format!("Invalid document key: {:?}", key)).into())
    }
}

/// Resolve the data directory: configured value, else the platform data dir
pub fn resolve_data_dir(config: &StorageConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }

    let proj_dirs = ProjectDirs::from("com", "hearth", "hearth")
        .ok_or_else(|| HearthError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Open the configured backend
///
/// # Examples
///
/// ```
/// use hearth::config::{StorageBackend, StorageConfig};
/// use hearth::storage::open_store;
///
/// let dir = tempfile::tempdir().unwrap();
/// let config = StorageConfig {
///     backend: StorageBackend::Json,
///     data_dir: Some(dir.path().to_path_buf()),
/// };
/// let store = open_store(&config).unwrap();
/// assert!(store.list().unwrap().is_empty());
/// ```
pub fn open_store(config: &StorageConfig) -> Result<SharedStore> {
    let data_dir = resolve_data_dir(config)?;
    tracing::debug!("Opening {:?} store in {}", config.backend, data_dir.display());

    let store: SharedStore = match config.backend {
        StorageBackend::Json => Arc::new(JsonFileStore::new(data_dir)?),
        StorageBackend::Sled => Arc::new(SledStore::new(data_dir.join("hearth.sled"))?),
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Note {
        title: String,
        pinned: bool,
    }

    #[test]
    fn test_validate_key_accepts_plain_names() {
        assert!(validate_key("session-home-history").is_ok());
        assert!(validate_key("routing_log.v2").is_ok());
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
    }

    #[test]
    fn test_typed_helpers_through_memory_store() {
        let store = MemoryStore::new();
        let note = Note {
            title: "groceries".to_string(),
            pinned: true,
        };
        store_document(&store, "note", &note).unwrap();
        let loaded: Option<Note> = load_document(&store, "note").unwrap();
        assert_eq!(loaded, Some(note));
    }

    #[test]
    fn test_load_document_missing_key() {
        let store = MemoryStore::new();
        let loaded: Option<Note> = load_document(&store, "absent").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_document_shape_mismatch() {
        let store = MemoryStore::new();
        store.put("note", &serde_json::json!([1, 2, 3])).unwrap();
        let result: Result<Option<Note>> = load_document(&store, "note");
        assert!(result.is_err());
    }

    #[test]
    fn test_open_store_memory_backend() {
        let config = StorageConfig {
            backend: StorageBackend::Memory,
            data_dir: Some(PathBuf::from("/nonexistent/unused")),
        };
        let store = open_store(&config).unwrap();
        store.put("k", &serde_json::json!({"v": 1})).unwrap();
        assert_eq!(store.list().unwrap(), vec!["k".to_string()]);
    }
}
