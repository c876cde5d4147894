use serde::{Deserialize, Serialize};

/// Transport button shown on the persistent notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationAction {
    /// Skip to previous track
    Previous,
    /// Resume or start playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to next track
    Next,
}

/// Renderable payload for the host's notification / foreground indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Content title (track title)
    pub title: String,

    /// Content text (artist)
    pub artist: String,

    /// Album name
    pub album: String,

    /// Large icon locator
    pub artwork: Option<String>,

    /// Whether playback is currently rendering
    pub is_playing: bool,

    /// Whether the user may swipe the notification away (paused)
    pub dismissible: bool,

    /// Transport buttons in display order
    pub actions: Vec<NotificationAction>,
}
