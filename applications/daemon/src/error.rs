/// Daemon error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DaemonError>;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Library manifest error: {0}")]
    Manifest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] tonearm_storage::StorageError),

    #[error("Playback error: {0}")]
    Playback(#[from] tonearm_playback::PlaybackError),

    #[error(transparent)]
    Core(#[from] tonearm_core::CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
