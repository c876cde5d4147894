//! Session updates
//!
//! Everything observers learn about the session arrives as a
//! [`SessionUpdate`]:
//! - State snapshots (every transition, plus seeks)
//! - Current-track metadata (prepare, track changes)
//! - The queue listing (prepare, queue edits)
//! - Repeat/shuffle mode changes
//! - User-visible errors

use crate::actions::PlaybackActions;
use crate::types::{PlaybackState, RepeatMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tonearm_core::TrackDescriptor;

/// Immutable record of the playback state at one instant
///
/// Observers extrapolate the live position as
/// `position + (now - updated_at) * speed` while `state` is `Playing`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: PlaybackState,
    pub position: Duration,
    pub speed: f32,
    pub updated_at: DateTime<Utc>,
    pub actions: PlaybackActions,
}

impl StateSnapshot {
    /// Snapshot of `state` at `position`, stamped now
    pub fn capture(state: PlaybackState, position: Duration) -> Self {
        Self {
            state,
            position,
            speed: 1.0,
            updated_at: Utc::now(),
            actions: PlaybackActions::for_state(state),
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.position.as_millis() as u64
    }

    /// Whether a controller may issue `action` right now
    pub fn allows(&self, action: PlaybackActions) -> bool {
        self.actions.contains(action)
    }
}

/// Update published to every session observer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionUpdate {
    /// Playback state changed (or the position jumped)
    State(StateSnapshot),

    /// Current-track metadata; `None` once the queue is cleared
    Metadata(Option<TrackDescriptor>),

    /// Full queue listing with the cursor
    Queue {
        tracks: Vec<TrackDescriptor>,
        cursor: Option<usize>,
    },

    /// Repeat or shuffle mode changed
    Modes { repeat: RepeatMode, shuffle: bool },

    /// Something the user should hear about
    Error { message: String },
}

impl SessionUpdate {
    /// The snapshot carried by a `State` update
    pub fn as_snapshot(&self) -> Option<&StateSnapshot> {
        match self {
            Self::State(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}
