//! Core types for playback orchestration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
///
/// The two skip states are transient: they are published while the next or
/// previous track loads, then replaced by `Playing` (or by the recovery state
/// when the load fails).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No render handle, focus released
    Stopped,

    /// Rendering with focus held
    Playing,

    /// Render handle kept, not rendering
    Paused,

    /// Loading the next queue entry
    SkippingNext,

    /// Loading the previous queue entry
    SkippingPrevious,
}

impl PlaybackState {
    /// `Playing` or one of the transient skip states
    pub fn is_active(self) -> bool {
        matches!(
            self,
            Self::Playing | Self::SkippingNext | Self::SkippingPrevious
        )
    }
}

/// Repeat policy applied when a track completes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop after the current track
    None,

    /// Replay the current track
    One,

    /// Advance, wrapping from the last entry to the first
    All,
}

/// Audio focus held by this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusGrant {
    /// Focus not held
    None,

    /// Exclusive focus
    Held,

    /// Focus held, but another producer asked us to attenuate
    HeldWithDuckRequest,
}

/// Direction of a circular queue step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Configuration for the playback orchestrator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial repeat mode (default: All)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Output gain while ducked (default: 0.2)
    pub duck_volume: f32,

    /// Output gain otherwise (default: 1.0)
    pub full_volume: f32,

    /// Upper bound on a single render-engine load, in milliseconds (default: 10 000)
    pub load_timeout_ms: u64,

    /// Buffered session updates per subscriber before the oldest are dropped (default: 64)
    pub outbox_capacity: usize,

    /// Give focus back on a user pause (default: true)
    pub abandon_focus_on_pause: bool,

    /// Store key of the persisted queue (default: "playingQueue")
    pub queue_key: String,
}

impl PlaybackConfig {
    /// Load timeout as a `Duration`
    pub fn load_timeout(&self) -> Duration {
        Duration::from_millis(self.load_timeout_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            repeat: RepeatMode::All,
            shuffle: false,
            duck_volume: 0.2,
            full_volume: 1.0,
            load_timeout_ms: 10_000,
            outbox_capacity: 64,
            abandon_focus_on_pause: true,
            queue_key: "playingQueue".to_string(),
        }
    }
}
