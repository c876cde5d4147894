//! Commands accepted by the playback service

use crate::actions::PlaybackActions;
use crate::events::StateSnapshot;
use crate::types::{FocusGrant, PlaybackState, RepeatMode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::oneshot;
use tonearm_core::{CatalogCategory, EngineEvent, FocusChange, TrackDescriptor};

/// What a `PlayFrom` command should play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum PlaySource {
    Album(String),
    Artist(String),
    Playlist(String),
    Genre(String),
    AllTracks,

    /// Every track in the library, shuffled
    ShuffleAll,

    /// An entry of the current queue; no catalog lookup
    QueueIndex(usize),
}

impl PlaySource {
    /// Catalog category to list, or `None` for `QueueIndex`
    pub fn category(&self) -> Option<CatalogCategory> {
        match self {
            Self::Album(id) => Some(CatalogCategory::Album(id.clone())),
            Self::Artist(id) => Some(CatalogCategory::Artist(id.clone())),
            Self::Playlist(id) => Some(CatalogCategory::Playlist(id.clone())),
            Self::Genre(id) => Some(CatalogCategory::Genre(id.clone())),
            Self::AllTracks | Self::ShuffleAll => Some(CatalogCategory::AllTracks),
            Self::QueueIndex(_) => None,
        }
    }

    /// Whether the listed tracks are shuffled before they replace the queue
    pub fn shuffles(&self) -> bool {
        matches!(self, Self::ShuffleAll)
    }
}

/// Playback commands
///
/// Commands are fire-and-forget: a command that is not legal in the current
/// state is dropped without publishing anything.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Publish the current track and queue without rendering
    Prepare,

    /// Start, or resume a paused track
    Play,

    /// Pause rendering
    Pause,

    /// Stop and release everything
    Stop,

    /// Move the play head
    SeekTo(Duration),

    /// Next queue entry, wrapping around
    SkipToNext,

    /// Previous queue entry, wrapping around
    SkipToPrevious,

    /// Jump to a queue entry and play it
    SkipToQueueIndex(usize),

    /// Replace the queue from the catalog (or jump within it) and play
    PlayFrom(PlaySource),

    SetRepeatMode(RepeatMode),

    /// Turning shuffle on reshuffles the queue and restarts at the first entry
    SetShuffleMode(bool),

    /// Replace the queue outright
    ReplaceQueue {
        tracks: Vec<TrackDescriptor>,
        start_index: usize,
    },

    /// Append to the end of the queue
    AddToQueue(TrackDescriptor),

    /// Insert right after the current track
    PlayNext(TrackDescriptor),

    /// Stop and empty the queue
    ClearQueue,

    /// Stop and end the service
    Shutdown,
}

impl Command {
    /// Action that must be in the legal mask for the command to run
    ///
    /// Queue edits and shutdown are never gated.
    pub fn required_action(&self) -> Option<PlaybackActions> {
        match self {
            Self::Prepare => Some(PlaybackActions::PREPARE),
            Self::Play => Some(PlaybackActions::PLAY),
            Self::Pause => Some(PlaybackActions::PAUSE),
            Self::Stop => Some(PlaybackActions::STOP),
            Self::SeekTo(_) => Some(PlaybackActions::SEEK_TO),
            Self::SkipToNext => Some(PlaybackActions::SKIP_TO_NEXT),
            Self::SkipToPrevious => Some(PlaybackActions::SKIP_TO_PREVIOUS),
            Self::SkipToQueueIndex(_) => Some(PlaybackActions::SKIP_TO_QUEUE_ITEM),
            Self::PlayFrom(_) => Some(PlaybackActions::PLAY_FROM_CATEGORY),
            Self::SetRepeatMode(_) => Some(PlaybackActions::SET_REPEAT_MODE),
            Self::SetShuffleMode(_) => Some(PlaybackActions::SET_SHUFFLE_MODE),
            Self::ReplaceQueue { .. }
            | Self::AddToQueue(_)
            | Self::PlayNext(_)
            | Self::ClearQueue
            | Self::Shutdown => None,
        }
    }
}

/// Point-in-time view of the service, for diagnostics and tests
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackStatus {
    pub state: PlaybackState,
    pub cursor: Option<usize>,
    pub queue: Vec<TrackDescriptor>,
    pub current: Option<TrackDescriptor>,
    pub repeat: RepeatMode,
    pub shuffle: bool,
    pub focus: FocusGrant,
    pub resume_on_gain: bool,
    pub volume: f32,

    /// Set by prepare or play, cleared by stop
    pub session_active: bool,

    pub snapshot: Option<StateSnapshot>,
}

/// Everything the service loop consumes, in arrival order
#[derive(Debug)]
pub(crate) enum Input {
    Command(Command),

    /// Event from the render handle issued at `generation`
    Engine {
        generation: u64,
        event: EngineEvent,
    },

    Focus(FocusChange),

    /// Catalog lookup finished
    CatalogLoaded {
        request_id: u64,
        shuffle: bool,
        result: tonearm_core::Result<Vec<TrackDescriptor>>,
    },

    Status(oneshot::Sender<PlaybackStatus>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_index_needs_no_catalog() {
        assert_eq!(PlaySource::QueueIndex(3).category(), None);
        assert_eq!(
            PlaySource::Album("7".into()).category(),
            Some(CatalogCategory::Album("7".into()))
        );
    }

    #[test]
    fn shuffle_all_lists_everything() {
        assert_eq!(PlaySource::ShuffleAll.category(), Some(CatalogCategory::AllTracks));
        assert!(PlaySource::ShuffleAll.shuffles());
        assert!(!PlaySource::AllTracks.shuffles());
    }

    #[test]
    fn queue_edits_are_not_gated() {
        assert_eq!(Command::ClearQueue.required_action(), None);
        assert_eq!(Command::Shutdown.required_action(), None);
        assert_eq!(Command::Play.required_action(), Some(PlaybackActions::PLAY));
    }

    #[test]
    fn play_source_serializes_tagged() {
        let json = serde_json::to_string(&PlaySource::Artist("12".into())).unwrap();
        assert_eq!(json, r#"{"kind":"artist","id":"12"}"#);
    }
}
