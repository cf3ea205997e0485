use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::debug;
use serde::{Deserialize, Serialize};

use super::store_traits::LocalStore;
use crate::errors::{Result, StorageError};

const FILE_FORMAT_VERSION: u32 = 1;

/// All blobs in one JSON file.
#[derive(Debug)]
pub struct FileLocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

impl FileLocalStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at `<dir>/local-state.json`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("local-state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn with_entries<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut entries = self.load_locked()?;
        op(&mut entries);
        self.persist_locked(entries)
    }

    fn load_locked(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read(&self.path)?;
        if raw.is_empty() {
            return Ok(BTreeMap::new());
        }
        let file: StoreFile = serde_json::from_slice(&raw).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(file.entries)
    }

    fn persist_locked(&self, entries: BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = StoreFile {
            version: FILE_FORMAT_VERSION,
            entries,
        };
        let json = serde_json::to_string_pretty(&file).map_err(|e| StorageError::Corrupt {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })?;

        // Write next to the target and rename so readers never see a torn file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!("Persisted local state to {}", self.path.display());
        Ok(())
    }
}

impl LocalStore for FileLocalStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(self.load_locked()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_entries(|entries| {
            entries.remove(key);
        })
    }
}
