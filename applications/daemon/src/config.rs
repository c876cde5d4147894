/// Daemon configuration
use crate::error::{DaemonError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tonearm_playback::PlaybackConfig;

const DEFAULT_CONFIG_FILE: &str = "tonearm.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DaemonConfig {
    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend, database file for `sqlite`
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Refuse to load sources that are not present on disk
    #[serde(default = "default_verify_sources")]
    pub verify_sources: bool,

    /// Assumed length of tracks whose manifest entry has no duration
    #[serde(default = "default_track_secs")]
    pub default_track_secs: u64,
}

impl DaemonConfig {
    /// Load configuration from file and environment
    ///
    /// `path` falls back to `tonearm.toml` in the working directory. Either
    /// file is optional. Variables such as `TONEARM_PLAYBACK__REPEAT=one`
    /// override file values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(DaemonError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        // Double underscore separates sections so keys like `queue_key` survive
        settings = settings.add_source(
            config::Environment::with_prefix("TONEARM")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| DaemonError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| DaemonError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let playback = &self.playback;

        if !(playback.full_volume > 0.0 && playback.full_volume <= 1.0) {
            return Err(DaemonError::Config(format!(
                "playback.full_volume must be in (0, 1], got {}",
                playback.full_volume
            )));
        }

        if !(0.0..=playback.full_volume).contains(&playback.duck_volume) {
            return Err(DaemonError::Config(format!(
                "playback.duck_volume must be between 0 and full_volume, got {}",
                playback.duck_volume
            )));
        }

        if playback.load_timeout_ms == 0 {
            return Err(DaemonError::Config(
                "playback.load_timeout_ms must be positive".to_string(),
            ));
        }

        if playback.outbox_capacity == 0 {
            return Err(DaemonError::Config(
                "playback.outbox_capacity must be positive".to_string(),
            ));
        }

        if playback.queue_key.trim().is_empty() {
            return Err(DaemonError::Config(
                "playback.queue_key is required".to_string(),
            ));
        }

        if self.library.default_track_secs == 0 {
            return Err(DaemonError::Config(
                "library.default_track_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// `SQLite` connection string for the configured database file
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.storage.path.display())
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            playback: PlaybackConfig::default(),
            storage: default_storage(),
            library: default_library(),
        }
    }
}

// Default values
fn default_storage() -> StorageSettings {
    StorageSettings {
        backend: StorageBackend::default(),
        path: default_storage_path(),
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        manifest: default_manifest(),
        verify_sources: default_verify_sources(),
        default_track_secs: default_track_secs(),
    }
}

fn default_manifest() -> PathBuf {
    PathBuf::from("./library.json")
}

fn default_verify_sources() -> bool {
    true
}

fn default_track_secs() -> u64 {
    180
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tonearm_playback::RepeatMode;

    #[test]
    fn defaults_are_valid() {
        let config = DaemonConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.playback.repeat, RepeatMode::All);
    }

    #[test]
    fn loads_sections_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daemon.toml");
        std::fs::write(
            &path,
            r#"
[playback]
repeat = "one"
duck_volume = 0.3

[storage]
backend = "sqlite"
path = "/var/lib/tonearm/queue.db"

[library]
manifest = "/srv/music/library.json"
verify_sources = false
"#,
        )
        .unwrap();

        let config = DaemonConfig::load(Some(&path)).unwrap();
        assert_eq!(config.playback.repeat, RepeatMode::One);
        assert_eq!(config.playback.duck_volume, 0.3);
        // Unset keys keep their defaults
        assert_eq!(config.playback.queue_key, "playingQueue");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.database_url(), "sqlite:///var/lib/tonearm/queue.db");
        assert!(!config.library.verify_sources);
        assert_eq!(config.library.default_track_secs, 180);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = DaemonConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, DaemonError::Config(_)));
    }

    #[test]
    fn rejects_duck_louder_than_full() {
        let mut config = DaemonConfig::default();
        config.playback.duck_volume = 0.9;
        config.playback.full_volume = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let mut config = DaemonConfig::default();
        config.playback.load_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_queue_key() {
        let mut config = DaemonConfig::default();
        config.playback.queue_key = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
