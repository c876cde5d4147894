//! Playback service actor
//!
//! The [`PlaybackService`] owns the [`PlaybackManager`] and applies inputs one
//! at a time, in arrival order. Controllers talk to it through cloneable
//! [`PlaybackHandle`]s.

use crate::{
    command::{Command, Input, PlaySource, PlaybackStatus},
    error::{PlaybackError, Result},
    events::SessionUpdate,
    manager::{Collaborators, PlaybackManager},
    publisher::Subscription,
    types::{PlaybackConfig, RepeatMode},
};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tonearm_core::TrackDescriptor;
use tracing::info;

/// Serialized owner of the session
#[derive(Debug)]
pub struct PlaybackService {
    manager: PlaybackManager,
    inbox: mpsc::UnboundedReceiver<Input>,
}

impl PlaybackService {
    /// Build the service and a first handle to it
    ///
    /// Nothing runs until [`PlaybackService::run`] (or `spawn`) is called, so
    /// subscriptions opened before that see the cold-start restore.
    pub fn new(config: PlaybackConfig, collaborators: Collaborators) -> (Self, PlaybackHandle) {
        let (inputs, inbox) = mpsc::unbounded_channel();
        let manager = PlaybackManager::new(config, collaborators, inputs.clone());
        let handle = PlaybackHandle {
            inputs,
            updates: manager.update_sender(),
        };
        (Self { manager, inbox }, handle)
    }

    /// Restore the persisted queue, then process inputs until shutdown
    pub async fn run(mut self) {
        self.manager.restore().await;
        info!("Playback service running");

        while let Some(input) = self.inbox.recv().await {
            if self.manager.handle(input).await.is_break() {
                break;
            }
        }

        info!("Playback service stopped");
    }

    /// Run on the current tokio runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

/// Cloneable command/observe handle to a running [`PlaybackService`]
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    inputs: mpsc::UnboundedSender<Input>,
    updates: broadcast::Sender<SessionUpdate>,
}

impl PlaybackHandle {
    /// Queue a command
    ///
    /// Returns once the command is enqueued, not once it is applied.
    pub fn send(&self, command: Command) -> Result<()> {
        self.inputs
            .send(Input::Command(command))
            .map_err(|_| PlaybackError::ServiceClosed)
    }

    /// Observe session updates published from now on
    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.updates.subscribe())
    }

    /// Current status, after every input queued before this call
    pub async fn status(&self) -> Result<PlaybackStatus> {
        let (reply, response) = oneshot::channel();
        self.inputs
            .send(Input::Status(reply))
            .map_err(|_| PlaybackError::ServiceClosed)?;
        response.await.map_err(|_| PlaybackError::ServiceClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.inputs.is_closed()
    }

    // ===== Convenience =====

    pub fn prepare(&self) -> Result<()> {
        self.send(Command::Prepare)
    }

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(Command::Pause)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.send(Command::SeekTo(position))
    }

    pub fn skip_to_next(&self) -> Result<()> {
        self.send(Command::SkipToNext)
    }

    pub fn skip_to_previous(&self) -> Result<()> {
        self.send(Command::SkipToPrevious)
    }

    pub fn skip_to_queue_index(&self, index: usize) -> Result<()> {
        self.send(Command::SkipToQueueIndex(index))
    }

    pub fn play_from(&self, source: PlaySource) -> Result<()> {
        self.send(Command::PlayFrom(source))
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) -> Result<()> {
        self.send(Command::SetRepeatMode(mode))
    }

    pub fn set_shuffle_mode(&self, enabled: bool) -> Result<()> {
        self.send(Command::SetShuffleMode(enabled))
    }

    pub fn replace_queue(&self, tracks: Vec<TrackDescriptor>, start_index: usize) -> Result<()> {
        self.send(Command::ReplaceQueue {
            tracks,
            start_index,
        })
    }

    pub fn add_to_queue(&self, track: TrackDescriptor) -> Result<()> {
        self.send(Command::AddToQueue(track))
    }

    pub fn play_next(&self, track: TrackDescriptor) -> Result<()> {
        self.send(Command::PlayNext(track))
    }

    pub fn clear_queue(&self) -> Result<()> {
        self.send(Command::ClearQueue)
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown)
    }
}
