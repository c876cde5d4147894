use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::time::Duration;

use super::TrackId;

/// Immutable description of a playable track
///
/// Created by the catalog and never mutated afterwards. Equality and hashing
/// only consider `id`, so two descriptors built from different catalog
/// snapshots of the same row compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name
    pub album: String,

    /// Track duration
    pub duration: Duration,

    /// Track number in album (optional)
    pub track_number: Option<u32>,

    /// Source locator handed to the render engine (URI or path)
    pub source: String,

    /// Artwork locator (optional)
    pub artwork: Option<String>,
}

impl TrackDescriptor {
    /// Create a descriptor with the mandatory fields; the rest default to empty
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: String::new(),
            album: String::new(),
            duration: Duration::ZERO,
            track_number: None,
            source: source.into(),
            artwork: None,
        }
    }

    /// Set the artist name
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the album name
    #[must_use]
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the duration
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the track number
    #[must_use]
    pub fn with_track_number(mut self, number: u32) -> Self {
        self.track_number = Some(number);
        self
    }

    /// Set the artwork locator
    #[must_use]
    pub fn with_artwork(mut self, artwork: impl Into<String>) -> Self {
        self.artwork = Some(artwork.into());
        self
    }

    /// Duration in whole milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}

impl PartialEq for TrackDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TrackDescriptor {}

impl Hash for TrackDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
