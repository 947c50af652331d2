//! Key-value backends the store persists through.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{StoreError, StoreResult};

/// A local key-value slot holder. The store only ever uses one key.
pub trait StateStorage {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&mut self, key: &str) -> StoreResult<()>;
}

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStorage for FileStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            StoreError::Storage(format!(
                "Could not create data directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let path = self.path_for(key);
        let temp = self.dir.join(format!("{key}.json.tmp"));

        std::fs::write(&temp, value)
            .map_err(|e| StoreError::Storage(format!("Could not write {}: {e}", temp.display())))?;
        std::fs::rename(&temp, &path)
            .map_err(|e| StoreError::Storage(format!("Could not replace {}: {e}", path.display())))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// In-process storage, used by tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        MemoryStorage { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StateStorage for MemoryStorage {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read("state").unwrap(), None);

        storage.write("state", r#"{"a":1}"#).unwrap();
        assert_eq!(storage.read("state").unwrap().as_deref(), Some(r#"{"a":1}"#));
        assert!(!dir.path().join("nested/state.json.tmp").exists());

        storage.remove("state").unwrap();
        assert_eq!(storage.read("state").unwrap(), None);
    }

    #[test]
    fn test_file_storage_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path());

        storage.write("state", "first").unwrap();
        storage.write("state", "second").unwrap();
        assert_eq!(storage.read("state").unwrap().as_deref(), Some("second"));
    }
}
