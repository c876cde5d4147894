//! JSON file store
//!
//! One file per key under a directory. Writes go to a temporary sibling and
//! are renamed into place, so a crash mid-write leaves the previous value.

use crate::error::{Result, StorageError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tonearm_core::{PersistedQueue, QueueStore};
use tracing::debug;

/// Queue store backed by JSON files
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store files under `dir`, creating it on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding `key`
    ///
    /// Keys may only contain ASCII letters, digits, `-`, `_` and `.`, and may
    /// not start with a dot.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Write `queue` under `key`
    pub async fn write(&self, key: &str, queue: &PersistedQueue) -> Result<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_vec_pretty(queue)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(key, path = %path.display(), tracks = queue.tracks.len(), "Saved queue");
        Ok(())
    }

    /// Read the value under `key`, `None` if it was never written
    pub async fn read(&self, key: &str) -> Result<Option<PersistedQueue>> {
        let path = self.path_for(key)?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let queue: PersistedQueue = serde_json::from_slice(&bytes)?;
        Ok(Some(PersistedQueue::new(queue.tracks, queue.cursor)))
    }
}

#[async_trait]
impl QueueStore for JsonFileStore {
    async fn save(&self, key: &str, queue: &PersistedQueue) -> tonearm_core::Result<()> {
        Ok(self.write(key, queue).await?)
    }

    async fn load(&self, key: &str) -> tonearm_core::Result<Option<PersistedQueue>> {
        Ok(self.read(key).await?)
    }
}
