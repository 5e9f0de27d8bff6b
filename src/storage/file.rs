//! JSON-file key-value store.
//!
//! DESIGN
//! ======
//! All keys live in one flat JSON object at `<dir>/storage.json`. The file
//! is created on first write. Each write rewrites the whole object to a
//! sibling temp file and renames it over the original, so a crash leaves
//! either the old or the new contents, never a torn file.
//!
//! Read-modify-write cycles are serialized through an async mutex so that
//! writers for different keys (theme, auth) cannot drop each other's
//! updates.
//!
//! A corrupt file is reported on read but never blocks a write: the bad
//! file is moved to `storage.json.corrupt` and the write starts from an
//! empty object.

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};

const FILE_NAME: &str = "storage.json";
const TEMP_FILE_NAME: &str = "storage.json.tmp";
const CORRUPT_FILE_NAME: &str = "storage.json.corrupt";

pub struct FileStore {
    dir: PathBuf,
    io_lock: Mutex<()>,
}

impl FileStore {
    /// Create a store rooted at `dir`. Nothing touches the disk until the
    /// first read or write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), io_lock: Mutex::new(()) }
    }

    /// Full path of the backing JSON file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(FILE_NAME)
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match tokio::fs::read_to_string(self.path()).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path().display())))
    }

    async fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(entries)?;
        let temp = self.dir.join(TEMP_FILE_NAME);
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, self.path()).await?;
        debug!(path = %self.path().display(), keys = entries.len(), "storage file written");
        Ok(())
    }

    /// Entries to start a read-modify-write from.
    async fn entries_for_write(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_entries().await {
            Err(StorageError::Corrupt(reason)) => {
                let backup = self.dir.join(CORRUPT_FILE_NAME);
                warn!(%reason, backup = %backup.display(), "storage file corrupt; rewriting from empty");
                if let Err(e) = tokio::fs::rename(self.path(), &backup).await {
                    warn!(error = %e, "could not set corrupt storage file aside");
                }
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.entries_for_write().await?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.entries_for_write().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.write_entries(&entries).await
    }
}
