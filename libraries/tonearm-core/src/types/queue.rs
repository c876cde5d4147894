use serde::{Deserialize, Serialize};

use super::TrackDescriptor;

/// The queue as written to and read from the persistent store
///
/// `cursor` is `None` exactly when `tracks` is empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedQueue {
    /// Tracks in playback order
    pub tracks: Vec<TrackDescriptor>,

    /// Index of the current track
    pub cursor: Option<usize>,
}

impl PersistedQueue {
    /// Build a persisted queue, normalizing the cursor against the track list
    pub fn new(tracks: Vec<TrackDescriptor>, cursor: Option<usize>) -> Self {
        let cursor = if tracks.is_empty() {
            None
        } else {
            Some(cursor.unwrap_or(0).min(tracks.len() - 1))
        };
        Self { tracks, cursor }
    }

    /// Check if the persisted queue holds no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
