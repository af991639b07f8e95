use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt snapshot: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// External key-value store the task collection persists through.
/// Values are opaque strings; the store neither parses nor orders them.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Key-value entries kept in a single JSON file. Every `set` rewrites the
/// whole file; reads are served from the in-memory copy loaded at open.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            log::debug!("no snapshot at {}, starting empty", path.display());
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("taskdeck-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn entries_survive_reopening_the_file() {
        let path = temp_path("reopen");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
        store.set("tasks", "[]").unwrap();
        store.set("taskId", "4").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("tasks").unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get("taskId").unwrap().as_deref(), Some("4"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn garbage_file_is_reported_as_corrupt() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, StorageError::Corrupt(_)));

        let _ = fs::remove_file(&path);
    }
}
