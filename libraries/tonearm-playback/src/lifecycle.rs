//! Process lifecycle
//!
//! Maps each published state to what the hosting environment must do:
//! keep the process in the foreground with a notification while playing,
//! stay resident with a dismissible notification while paused, and let the
//! host reclaim the process once stopped.

use crate::actions::PlaybackActions;
use crate::events::StateSnapshot;
use crate::types::PlaybackState;
use tonearm_core::{HostEnvironment, Notification, NotificationAction, TrackDescriptor};
use tracing::{debug, info};

/// Host-level requirement derived from a playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleDirective {
    /// Must run in the foreground with an up-to-date notification
    Foreground,

    /// Stay resident, notification becomes dismissible
    Resident,

    /// Leave the foreground and let the host reclaim the process
    Release,
}

/// Directive for `state`
///
/// Skip states are transient and leave the host mode untouched.
pub fn directive_for(state: PlaybackState) -> Option<LifecycleDirective> {
    match state {
        PlaybackState::Playing => Some(LifecycleDirective::Foreground),
        PlaybackState::Paused => Some(LifecycleDirective::Resident),
        PlaybackState::Stopped => Some(LifecycleDirective::Release),
        PlaybackState::SkippingNext | PlaybackState::SkippingPrevious => None,
    }
}

/// Build the notification for `track` as of `snapshot`
pub fn build_notification(snapshot: &StateSnapshot, track: &TrackDescriptor) -> Notification {
    let is_playing = snapshot.state == PlaybackState::Playing;

    let mut actions = Vec::with_capacity(3);
    if snapshot.allows(PlaybackActions::SKIP_TO_PREVIOUS) {
        actions.push(NotificationAction::Previous);
    }
    actions.push(if is_playing {
        NotificationAction::Pause
    } else {
        NotificationAction::Play
    });
    if snapshot.allows(PlaybackActions::SKIP_TO_NEXT) {
        actions.push(NotificationAction::Next);
    }

    Notification {
        title: track.title.clone(),
        artist: track.artist.clone(),
        album: track.album.clone(),
        artwork: track.artwork.clone(),
        is_playing,
        dismissible: !is_playing,
        actions,
    }
}

/// Drives the [`HostEnvironment`] from published snapshots
pub struct LifecycleManager {
    host: Box<dyn HostEnvironment>,
    started: bool,
    foreground: bool,
}

impl LifecycleManager {
    pub fn new(host: Box<dyn HostEnvironment>) -> Self {
        Self {
            host,
            started: false,
            foreground: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_foreground(&self) -> bool {
        self.foreground
    }

    /// Apply the directive for a freshly published snapshot
    pub fn apply(&mut self, snapshot: &StateSnapshot, track: Option<&TrackDescriptor>) {
        let Some(directive) = directive_for(snapshot.state) else {
            return;
        };

        match directive {
            LifecycleDirective::Foreground => {
                let Some(track) = track else {
                    debug!("Playing without a current track, leaving host mode alone");
                    return;
                };
                let notification = build_notification(snapshot, track);
                if !self.started {
                    info!("Starting playback service");
                    self.host.start_service();
                    self.started = true;
                }
                if self.foreground {
                    self.host.update_notification(&notification);
                } else {
                    info!("Entering foreground");
                    self.host.enter_foreground(&notification);
                    self.foreground = true;
                }
            }
            LifecycleDirective::Resident => {
                if !self.started {
                    debug!("Paused before the service started, leaving host mode alone");
                    return;
                }
                if self.foreground {
                    self.host.exit_foreground(false);
                    self.foreground = false;
                }
                if let Some(track) = track {
                    self.host
                        .update_notification(&build_notification(snapshot, track));
                }
            }
            LifecycleDirective::Release => {
                if self.started || self.foreground {
                    info!("Releasing playback service");
                    self.host.exit_foreground(true);
                    self.host.stop_service();
                }
                self.started = false;
                self.foreground = false;
            }
        }
    }
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("started", &self.started)
            .field("foreground", &self.foreground)
            .finish_non_exhaustive()
    }
}
