//! Key-value persistence for the active session.
//!
//! Values are opaque strings. Every write replaces the previous value for the key,
//! there is no history and no partial write visible to readers.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DatabaseError;

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), DatabaseError>;

    fn remove(&mut self, key: &str) -> Result<(), DatabaseError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), DatabaseError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DatabaseError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, kept fully in memory and rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Opens the store, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DatabaseError> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| {
                DatabaseError::CorruptStorage {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!("storage file {} does not exist yet", path.display());
                BTreeMap::new()
            }
            Err(source) => return Err(DatabaseError::Storage { path, source }),
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), DatabaseError> {
        let contents = serde_json::to_vec_pretty(&self.entries)?;
        let mut temporary = self.path.clone().into_os_string();
        temporary.push(".tmp");
        let temporary = PathBuf::from(temporary);
        fs::write(&temporary, contents)
            .and_then(|()| fs::rename(&temporary, &self.path))
            .map_err(|source| DatabaseError::Storage {
                path: self.path.clone(),
                source,
            })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.entries.get(key).cloned())
    }

    /// On a failed write the previous value is put back.
    fn set(&mut self, key: &str, value: String) -> Result<(), DatabaseError> {
        let previous = self.entries.insert(key.to_owned(), value);
        if let Err(error) = self.flush() {
            match previous {
                Some(previous) => self.entries.insert(key.to_owned(), previous),
                None => self.entries.remove(key),
            };
            return Err(error);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), DatabaseError> {
        if let Some(previous) = self.entries.remove(key) {
            if let Err(error) = self.flush() {
                self.entries.insert(key.to_owned(), previous);
                return Err(error);
            }
        }
        Ok(())
    }
}

/// The backend picked from configuration.
#[derive(Debug)]
pub enum Storage {
    Memory(MemoryStore),
    File(FileStore),
}

impl Storage {
    pub fn open(path: Option<&Path>) -> Result<Self, DatabaseError> {
        Ok(match path {
            Some(path) => Self::File(FileStore::open(path)?),
            None => Self::Memory(MemoryStore::new()),
        })
    }
}

impl KeyValueStore for Storage {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        match self {
            Self::Memory(store) => store.get(key),
            Self::File(store) => store.get(key),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), DatabaseError> {
        match self {
            Self::Memory(store) => store.set(key, value),
            Self::File(store) => store.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), DatabaseError> {
        match self {
            Self::Memory(store) => store.remove(key),
            Self::File(store) => store.remove(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_last_write_wins() {
        let mut store = MemoryStore::new();
        store.set("ieee_user", "first".to_owned()).unwrap();
        store.set("ieee_user", "second".to_owned()).unwrap();
        assert_eq!(store.get("ieee_user").unwrap().as_deref(), Some("second"));
        store.remove("ieee_user").unwrap();
        assert_eq!(store.get("ieee_user").unwrap(), None);
        // removing a missing key is fine
        store.remove("ieee_user").unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("ieee_admin").unwrap(), None);
        store.set("ieee_admin", "{\"id\":\"a1\"}".to_owned()).unwrap();
        store.set("ieee_user", "{}".to_owned()).unwrap();
        store.remove("ieee_user").unwrap();
        drop(store);

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("ieee_admin").unwrap().as_deref(),
            Some("{\"id\":\"a1\"}")
        );
        assert_eq!(reopened.get("ieee_user").unwrap(), None);
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        let error = FileStore::open(&path).unwrap_err();
        assert!(matches!(error, DatabaseError::CorruptStorage { .. }));
    }

    #[test]
    fn failed_write_keeps_previous_entries() {
        let dir = tempfile::tempdir().unwrap();
        let parent = dir.path().join("sessions");
        fs::create_dir(&parent).unwrap();
        let mut store = FileStore::open(parent.join("session.json")).unwrap();
        store.set("ieee_admin", "old".to_owned()).unwrap();
        fs::remove_dir_all(&parent).unwrap();

        let error = store.set("ieee_admin", "new".to_owned()).unwrap_err();
        assert!(matches!(error, DatabaseError::Storage { .. }));
        assert_eq!(store.get("ieee_admin").unwrap().as_deref(), Some("old"));

        store.set("ieee_user", "{}".to_owned()).unwrap_err();
        assert_eq!(store.get("ieee_user").unwrap(), None);

        store.remove("ieee_admin").unwrap_err();
        assert_eq!(store.get("ieee_admin").unwrap().as_deref(), Some("old"));
    }

    #[test]
    fn storage_without_path_is_in_memory() {
        let storage = Storage::open(None).unwrap();
        assert!(matches!(storage, Storage::Memory(_)));
    }
}
