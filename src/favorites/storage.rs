//! Whole-value key/value persistence, the desktop stand-in for browser
//! local storage.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::AppError;

/// Values are raw bytes. Callers decode them, so undecodable content is their
/// concern and never a read error.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing was ever written under `key`.
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Replaces the whole value stored under `key`.
    fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for JsonFileStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        match fs::read(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        fs::create_dir_all(&self.dir)?;

        // Write to a sibling file first so a crash never leaves half a list behind.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
        let store = Self::new();
        store.values.write().insert(key.to_string(), value.into());
        store
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.values.read().get(key).cloned()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), AppError> {
        self.values.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
