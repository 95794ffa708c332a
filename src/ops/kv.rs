use crate::error::StorageError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Synchronous string key-value storage.
///
/// Reading an absent key is not an error, it simply yields `None`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Key-value store persisted as a single JSON object on disk.
///
/// The whole map is rewritten on every `set`.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileKeyValueStore {
    /// Opens the store at `path`. A missing or unreadable file yields an empty store.
    pub fn open(path: impl Into<PathBuf>) -> FileKeyValueStore {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    tracing::warn!(path = %path.display(), "ignoring malformed storage file: {err}");
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to read storage file: {err}");
                BTreeMap::new()
            }
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened storage");

        FileKeyValueStore { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }
}

/// In-memory store. Clones share the same map, so a clone outlives the
/// store that wrote to it and can be handed to a fresh one.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<BTreeMap<String, String>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> MemoryKeyValueStore {
        MemoryKeyValueStore::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::open(dir.path().join("storage.json"));
        assert_eq!(store.get("todos"), None);
    }

    #[test]
    fn test_set_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let mut store = FileKeyValueStore::open(&path);
        store.set("todos", "[]".to_string()).unwrap();
        store.set("other", "value".to_string()).unwrap();

        let reopened = FileKeyValueStore::open(&path);
        assert_eq!(reopened.get("todos").as_deref(), Some("[]"));
        assert_eq!(reopened.get("other").as_deref(), Some("value"));
        assert_eq!(reopened.path(), path.as_path());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let mut store = FileKeyValueStore::open(&path);
        assert_eq!(store.get("todos"), None);

        // A write replaces the garbage with a valid document.
        store.set("todos", "[]".to_string()).unwrap();
        let reopened = FileKeyValueStore::open(&path);
        assert_eq!(reopened.get("todos").as_deref(), Some("[]"));
    }

    #[test]
    fn test_memory_clones_share_entries() {
        let mut store = MemoryKeyValueStore::new();
        let other = store.clone();
        store.set("todos", "[1]".to_string()).unwrap();
        assert_eq!(other.get("todos").as_deref(), Some("[1]"));
    }
}
