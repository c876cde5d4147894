//! Library manifest catalog
//!
//! The daemon has no media scanner. Its library is a JSON manifest listing
//! tracks and playlists:
//!
//! ```json
//! {
//!   "tracks": [
//!     {
//!       "id": "kob-1",
//!       "title": "So What",
//!       "artist": "Miles Davis",
//!       "album": "Kind of Blue",
//!       "genres": ["jazz"],
//!       "duration_ms": 562000,
//!       "track_number": 1,
//!       "source": "/music/kind-of-blue/01.flac"
//!     }
//!   ],
//!   "playlists": { "late-night": ["kob-1"] }
//! }
//! ```
//!
//! Albums, artists and genres are addressed by name, matched case-insensitively.

use crate::error::{DaemonError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;
use tonearm_core::{Catalog, CatalogCategory, CoreError, TrackDescriptor, TrackId};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Manifest {
    #[serde(default)]
    pub tracks: Vec<ManifestTrack>,

    #[serde(default)]
    pub playlists: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ManifestTrack {
    pub id: String,
    pub title: String,
    pub source: String,

    #[serde(default)]
    pub artist: String,

    #[serde(default)]
    pub album: String,

    #[serde(default)]
    pub genres: Vec<String>,

    #[serde(default)]
    pub duration_ms: Option<u64>,

    #[serde(default)]
    pub track_number: Option<u32>,

    #[serde(default)]
    pub artwork: Option<String>,
}

#[derive(Debug, Clone)]
struct Entry {
    descriptor: TrackDescriptor,
    genres: Vec<String>,
}

/// Read-only catalog over a [`Manifest`]
#[derive(Debug, Clone)]
pub struct ManifestCatalog {
    entries: Vec<Entry>,
    playlists: HashMap<String, Vec<TrackId>>,
}

impl ManifestCatalog {
    /// Build a catalog; tracks without a duration get `default_duration`
    pub fn new(manifest: Manifest, default_duration: Duration) -> Result<Self> {
        let mut entries = Vec::with_capacity(manifest.tracks.len());
        let mut seen = HashSet::new();

        for track in manifest.tracks {
            if !seen.insert(track.id.clone()) {
                return Err(DaemonError::Manifest(format!(
                    "Duplicate track id: {}",
                    track.id
                )));
            }

            let duration = track
                .duration_ms
                .map(Duration::from_millis)
                .unwrap_or(default_duration);

            let mut descriptor = TrackDescriptor::new(track.id, track.title, track.source)
                .with_artist(track.artist)
                .with_album(track.album)
                .with_duration(duration);
            if let Some(number) = track.track_number {
                descriptor = descriptor.with_track_number(number);
            }
            if let Some(artwork) = track.artwork {
                descriptor = descriptor.with_artwork(artwork);
            }

            entries.push(Entry {
                descriptor,
                genres: track.genres,
            });
        }

        let mut playlists = HashMap::new();
        for (name, members) in manifest.playlists {
            for member in &members {
                if !seen.contains(member) {
                    return Err(DaemonError::Manifest(format!(
                        "Playlist {name} references unknown track {member}"
                    )));
                }
            }
            playlists.insert(name, members.into_iter().map(TrackId::new).collect());
        }

        Ok(Self { entries, playlists })
    }

    /// Read and index a manifest file
    pub async fn load(path: &Path, default_duration: Duration) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DaemonError::Manifest(format!("Cannot read {}: {e}", path.display()))
        })?;
        let manifest: Manifest = serde_json::from_str(&content)?;
        let catalog = Self::new(manifest, default_duration)?;

        info!(
            path = %path.display(),
            tracks = catalog.len(),
            playlists = catalog.playlists.len(),
            "Loaded library manifest"
        );
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a single track
    pub fn track(&self, id: &str) -> Option<&TrackDescriptor> {
        self.entries
            .iter()
            .map(|entry| &entry.descriptor)
            .find(|track| track.id.as_str() == id)
    }

    /// Every track, in manifest order
    pub fn tracks(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.entries.iter().map(|entry| &entry.descriptor)
    }

    /// Tracks of a category, in playback order
    ///
    /// Albums are ordered by track number (unnumbered tracks last, in
    /// manifest order). Everything else keeps manifest order, playlists keep
    /// playlist order. Unknown names yield an empty listing.
    pub fn resolve(&self, category: &CatalogCategory) -> Vec<TrackDescriptor> {
        match category {
            CatalogCategory::Album(name) => {
                let mut album: Vec<_> = self
                    .tracks()
                    .filter(|track| track.album.eq_ignore_ascii_case(name))
                    .cloned()
                    .collect();
                album.sort_by_key(|track| track.track_number.unwrap_or(u32::MAX));
                album
            }
            CatalogCategory::Artist(name) => self
                .tracks()
                .filter(|track| track.artist.eq_ignore_ascii_case(name))
                .cloned()
                .collect(),
            CatalogCategory::Genre(name) => self
                .entries
                .iter()
                .filter(|entry| entry.genres.iter().any(|g| g.eq_ignore_ascii_case(name)))
                .map(|entry| entry.descriptor.clone())
                .collect(),
            CatalogCategory::Playlist(name) => self
                .playlists
                .get(name)
                .map(|members| {
                    members
                        .iter()
                        .filter_map(|id| self.track(id.as_str()).cloned())
                        .collect()
                })
                .unwrap_or_default(),
            CatalogCategory::AllTracks => self.tracks().cloned().collect(),
        }
    }

    /// Source locator and duration of every track, for the render engine
    pub fn durations(&self) -> HashMap<String, Duration> {
        self.tracks()
            .map(|track| (track.source.clone(), track.duration))
            .collect()
    }
}

#[async_trait]
impl Catalog for ManifestCatalog {
    async fn list(&self, category: &CatalogCategory) -> tonearm_core::Result<Vec<TrackDescriptor>> {
        if let CatalogCategory::Playlist(name) = category {
            if !self.playlists.contains_key(name) {
                return Err(CoreError::not_found("playlist", name.as_str()));
            }
        }

        let tracks = self.resolve(category);
        debug!(%category, tracks = tracks.len(), "Listed category");
        Ok(tracks)
    }
}
