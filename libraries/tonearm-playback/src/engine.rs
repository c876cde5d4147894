//! Render-engine adapter
//!
//! Wraps the [`RenderEngine`] with the bookkeeping the state machine needs:
//! which track the handle holds, a handle generation for filtering stale
//! events, a bounded load, and a pinned position while seeking paused.

use crate::error::{PlaybackError, Result};
use std::time::Duration;
use tonearm_core::{EngineEvent, EventSink, RenderEngine, TrackDescriptor, TrackId};
use tracing::debug;

/// Render handle bookkeeping around a [`RenderEngine`]
pub struct EngineAdapter {
    engine: Box<dyn RenderEngine>,
    generation: u64,
    loaded: Option<TrackId>,
    pinned_position: Option<Duration>,
    volume: f32,
}

impl EngineAdapter {
    pub fn new(engine: Box<dyn RenderEngine>, volume: f32) -> Self {
        Self {
            engine,
            generation: 0,
            loaded: None,
            pinned_position: None,
            volume,
        }
    }

    /// Generation of the current handle
    ///
    /// Bumped on every load and release; events tagged with an older value
    /// belong to a handle that no longer exists.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.loaded.is_some() && generation == self.generation
    }

    pub fn has_handle(&self) -> bool {
        self.loaded.is_some()
    }

    /// Whether the handle was loaded with `id`
    pub fn holds(&self, id: &TrackId) -> bool {
        self.loaded.as_ref() == Some(id)
    }

    pub fn loaded_track(&self) -> Option<&TrackId> {
        self.loaded.as_ref()
    }

    pub fn is_rendering(&self) -> bool {
        self.loaded.is_some() && self.engine.is_rendering()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Release any previous handle and load `track`
    ///
    /// `sink_for` builds the event sink for the new generation. The load is
    /// abandoned after `timeout`, which counts as a source failure.
    pub async fn load(
        &mut self,
        track: &TrackDescriptor,
        sink_for: impl FnOnce(u64) -> EventSink<EngineEvent>,
        timeout: Duration,
    ) -> Result<()> {
        self.release();
        self.generation += 1;
        let events = sink_for(self.generation);

        debug!(track_id = %track.id, source = %track.source, "Loading track");
        let outcome = tokio::time::timeout(timeout, self.engine.load(&track.source, events)).await;

        match outcome {
            Ok(Ok(())) => {
                self.loaded = Some(track.id.clone());
                self.engine.set_volume(self.volume);
                Ok(())
            }
            Ok(Err(e)) => {
                self.engine.release();
                self.generation += 1;
                Err(PlaybackError::Source {
                    track_id: track.id.clone(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                self.engine.release();
                self.generation += 1;
                Err(PlaybackError::LoadTimeout {
                    track_id: track.id.clone(),
                    timeout,
                })
            }
        }
    }

    /// Start rendering the loaded handle
    pub fn start(&mut self) {
        if self.loaded.is_some() && !self.engine.is_rendering() {
            self.engine.start();
        }
    }

    pub fn pause(&mut self) {
        if self.is_rendering() {
            self.engine.pause();
        }
    }

    /// Seek the loaded handle
    ///
    /// While not rendering some engines keep reporting the old position until
    /// they start again, so the requested position is pinned until the seek
    /// is confirmed or rendering resumes.
    pub fn seek(&mut self, position: Duration) {
        if self.loaded.is_none() {
            return;
        }
        if !self.engine.is_rendering() {
            self.pinned_position = Some(position);
        }
        self.engine.seek(position);
    }

    /// Seek confirmation from the engine
    pub fn seek_completed(&mut self) {
        self.pinned_position = None;
    }

    /// Drop the pinned position once rendering resumes
    pub fn unpin(&mut self) {
        self.pinned_position = None;
    }

    /// Position to publish
    pub fn position(&self) -> Duration {
        if self.loaded.is_none() {
            return Duration::ZERO;
        }
        self.pinned_position
            .unwrap_or_else(|| self.engine.position())
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if self.loaded.is_some() {
            self.engine.set_volume(volume);
        }
    }

    /// Release the handle, if any
    pub fn release(&mut self) {
        if self.loaded.take().is_some() {
            self.engine.release();
            self.generation += 1;
        }
        self.pinned_position = None;
    }
}

impl std::fmt::Debug for EngineAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineAdapter")
            .field("generation", &self.generation)
            .field("loaded", &self.loaded)
            .field("pinned_position", &self.pinned_position)
            .field("volume", &self.volume)
            .finish_non_exhaustive()
    }
}
