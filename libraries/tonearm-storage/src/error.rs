/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key cannot be mapped to a storage location
    #[error("Invalid store key: {0:?}")]
    InvalidKey(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for tonearm_core::CoreError {
    fn from(err: StorageError) -> Self {
        tonearm_core::CoreError::store(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonearm_core::CoreError;

    #[test]
    fn converts_to_core_store_error() {
        let err: CoreError = StorageError::InvalidKey(String::new()).into();
        assert!(matches!(err, CoreError::Store(msg) if msg.contains("Invalid store key")));
    }
}
