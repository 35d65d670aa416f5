//! Storage backends for the progress store
//!
//! The store owns exactly one key in a key-value storage; the backend behind
//! that key is an injected dependency so tests can substitute an in-memory
//! fake for the filesystem.

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A minimal key-value storage interface
///
/// Mirrors the browser local-storage contract: string keys, string values,
/// last write wins. The store reads and writes a single key through this.
pub trait StorageBackend {
    /// Read the value stored under `key`, if any
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Filesystem-backed storage: one file per key under a base directory
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open or create file storage at the given directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path).context("Failed to create storage directory")?;
        debug!(?base_path, "Opened file storage");
        Ok(Self { base_path })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;
        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        fs::write(&path, value).context(format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory storage fake for unit tests
    #[derive(Default)]
    pub struct MemoryStorage {
        values: RefCell<HashMap<String, String>>,
        fail_writes: bool,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        /// A backend whose writes always fail, for persistence-error paths
        pub fn failing() -> Self {
            Self {
                values: RefCell::new(HashMap::new()),
                fail_writes: true,
            }
        }

        /// Seed a value before the store is created
        pub fn seed(self, key: &str, value: &str) -> Self {
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
            self
        }

        pub fn get(&self, key: &str) -> Option<String> {
            self.values.borrow().get(key).cloned()
        }
    }

    impl StorageBackend for MemoryStorage {
        fn read(&self, key: &str) -> Result<Option<String>> {
            Ok(self.values.borrow().get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(eyre::eyre!("storage quota exceeded"));
            }
            self.values.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_absent_key() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();
        assert!(storage.read("math-progress").unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let storage = FileStorage::open(temp.path()).unwrap();

        storage.write("math-progress", r#"{"completed":[]}"#).unwrap();
        assert_eq!(storage.read("math-progress").unwrap().as_deref(), Some(r#"{"completed":[]}"#));

        // Last write wins
        storage.write("math-progress", r#"{"completed":["a"]}"#).unwrap();
        assert_eq!(
            storage.read("math-progress").unwrap().as_deref(),
            Some(r#"{"completed":["a"]}"#)
        );
    }
}
