//! Error types for playback orchestration

use std::time::Duration;
use thiserror::Error;
use tonearm_core::TrackId;

/// Playback errors
///
/// None of these escape to command issuers. The state machine logs them and
/// degrades to `Paused` or `Stopped`.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Render source unreachable or corrupt
    #[error("Couldn't play track {track_id}: {reason}")]
    Source { track_id: TrackId, reason: String },

    /// The render engine never answered a load
    #[error("Timed out after {timeout:?} loading track {track_id}")]
    LoadTimeout { track_id: TrackId, timeout: Duration },

    /// Focus request rejected outright
    #[error("Audio focus request denied")]
    FocusDenied,

    /// Store write/read failure
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Command needs a current track but the queue is empty
    #[error("Queue is empty")]
    EmptyQueue,

    /// The playback service is no longer running
    #[error("Playback service is not running")]
    ServiceClosed,
}

impl PlaybackError {
    /// Whether the error should be shown to the user as "couldn't play track"
    pub fn is_source_failure(&self) -> bool {
        matches!(self, Self::Source { .. } | Self::LoadTimeout { .. })
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_count_as_source_failures() {
        let err = PlaybackError::LoadTimeout {
            track_id: TrackId::new("a"),
            timeout: Duration::from_secs(10),
        };
        assert!(err.is_source_failure());
        assert!(!PlaybackError::FocusDenied.is_source_failure());
        assert!(!PlaybackError::EmptyQueue.is_source_failure());
    }

    #[test]
    fn source_error_mentions_track() {
        let err = PlaybackError::Source {
            track_id: TrackId::new("42"),
            reason: "file not found".to_string(),
        };
        assert_eq!(err.to_string(), "Couldn't play track 42: file not found");
    }
}
