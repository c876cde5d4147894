/// Collaborator traits for the playback orchestrator
use crate::error::Result;
use crate::types::{
    CatalogCategory, EngineEvent, EventSink, FocusChange, Notification, PersistedQueue,
    TrackDescriptor,
};
use async_trait::async_trait;
use std::time::Duration;

/// Read-only media catalog
///
/// Implementers turn a category into an ordered list of tracks. Lookups run
/// as independent tasks and never touch playback state directly.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List the tracks of a category, in playback order
    ///
    /// # Errors
    /// Returns an error if the underlying media index cannot be queried
    async fn list(&self, category: &CatalogCategory) -> Result<Vec<TrackDescriptor>>;
}

/// Durable key-value store for the play queue
///
/// Writes are best-effort from the caller's point of view: the orchestrator
/// logs a failed `save` and keeps its in-memory queue authoritative.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Persist `queue` under `key`, replacing any previous value
    ///
    /// # Errors
    /// Returns an error if the value cannot be written
    async fn save(&self, key: &str, queue: &PersistedQueue) -> Result<()>;

    /// Load the value stored under `key`
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    /// Returns an error if the value exists but cannot be read or decoded
    async fn load(&self, key: &str) -> Result<Option<PersistedQueue>>;
}

/// Audio decode/render engine
///
/// Exactly one source is loaded at a time. `load` may take arbitrarily long
/// (probing, buffering); every other call is expected to return promptly.
#[async_trait]
pub trait RenderEngine: Send {
    /// Load a source and prepare it for rendering from position zero
    ///
    /// `events` receives [`EngineEvent::Completed`] when the source ends and
    /// [`EngineEvent::SeekCompleted`] when a seek lands. Events for a source
    /// must stop after [`RenderEngine::release`].
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Source`] if the locator is unreachable or
    /// malformed
    async fn load(&mut self, source: &str, events: EventSink<EngineEvent>) -> Result<()>;

    /// Start or resume rendering
    fn start(&mut self);

    /// Pause rendering, keeping the position
    fn pause(&mut self);

    /// Move the play head
    fn seek(&mut self, position: Duration);

    /// Current play head position as last reported by the engine
    fn position(&self) -> Duration;

    /// Whether the engine is physically rendering right now
    fn is_rendering(&self) -> bool;

    /// Set output gain (0.0 = silent, 1.0 = full volume)
    fn set_volume(&mut self, volume: f32);

    /// Drop the loaded source
    fn release(&mut self);
}

/// Answer to a focus request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusResponse {
    /// Focus is held from now on
    Granted,

    /// Focus will be delivered later through [`FocusChange::Gained`]
    Delayed,

    /// Request rejected outright
    Denied,
}

/// Arbiter for the system-wide shared audio output
pub trait FocusArbiter: Send {
    /// Ask for focus
    ///
    /// `changes` stays registered until [`FocusArbiter::abandon`] and receives
    /// every later grant or revocation.
    fn request(&mut self, changes: EventSink<FocusChange>) -> FocusResponse;

    /// Give focus back and unregister the change listener
    fn abandon(&mut self);
}

/// The environment hosting the long-running playback process
pub trait HostEnvironment: Send {
    /// Ask the host to keep the process running on its own
    ///
    /// Issued once per session, before the first foreground transition.
    fn start_service(&mut self);

    /// Enter foreground/visible mode showing `notification`
    fn enter_foreground(&mut self, notification: &Notification);

    /// Replace the visible notification without changing the mode
    fn update_notification(&mut self, notification: &Notification);

    /// Leave foreground mode, optionally removing the notification
    fn exit_foreground(&mut self, remove_notification: bool);

    /// Allow the host to reclaim the process
    fn stop_service(&mut self);
}
