//! File-backed storage.
//!
//! All keys live in one JSON object on disk. Writes go to a sibling temp
//! file that is then renamed over the original, so a reader never observes a
//! half-written document.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

type Entries = BTreeMap<String, String>;

/// Key/value storage persisted to a single JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Use `path` as the backing file. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Entries::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries to build the next write on. A corrupt file is replaced rather
    /// than blocking every later write.
    fn entries_for_write(&self) -> Result<Entries, StorageError> {
        match self.read_entries() {
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Storage file is corrupt, starting from an empty document"
                );
                Ok(Entries::new())
            }
            other => other,
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries_for_write()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("pocket-shop-{}", uuid::Uuid::new_v4()))
            .join("storage.json")
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let storage = FileStorage::new(temp_path());
        assert_eq!(storage.get_item("cart").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let path = temp_path();
        let storage = FileStorage::new(&path);
        storage.set_item("cart", "[]").unwrap();
        storage.set_item("other", "x").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(reopened.get_item("cart").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get_item("other").unwrap().as_deref(), Some("x"));
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_remove_item() {
        let path = temp_path();
        let storage = FileStorage::new(&path);
        storage.set_item("cart", "[]").unwrap();
        storage.remove_item("cart").unwrap();
        storage.remove_item("never-set").unwrap();
        assert_eq!(storage.get_item("cart").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_errors_on_read_and_recovers_on_write() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not-json").unwrap();

        let storage = FileStorage::new(&path);
        assert!(matches!(
            storage.get_item("cart"),
            Err(StorageError::Corrupt(_))
        ));

        storage.set_item("cart", "[]").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
