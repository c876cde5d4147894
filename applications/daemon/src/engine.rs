//! Clock-driven render engine
//!
//! Stands in for a decoder: it validates the source, then advances a play
//! head against the tokio clock and reports completion when the track's
//! duration has elapsed. No samples are produced.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tonearm_core::{CoreError, EngineEvent, EventSink, RenderEngine};
use tracing::{debug, info};

struct Loaded {
    source: String,
    duration: Duration,
    events: EventSink<EngineEvent>,
    /// Play head at the last start, pause or seek
    offset: Duration,
    started_at: Option<Instant>,
    completion: Option<JoinHandle<()>>,
}

impl Loaded {
    fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map(|started| started.elapsed())
            .unwrap_or_default();
        (self.offset + elapsed).min(self.duration)
    }

    fn schedule_completion(&mut self) {
        self.cancel_completion();
        let remaining = self.duration.saturating_sub(self.offset);
        let events = self.events.clone();
        self.completion = Some(tokio::spawn(async move {
            tokio::time::sleep(remaining).await;
            events.emit(EngineEvent::Completed);
        }));
    }

    fn cancel_completion(&mut self) {
        if let Some(task) = self.completion.take() {
            task.abort();
        }
    }
}

impl Drop for Loaded {
    fn drop(&mut self) {
        self.cancel_completion();
    }
}

/// Render engine that simulates playback timing
pub struct SimulatedEngine {
    durations: HashMap<String, Duration>,
    default_duration: Duration,
    verify_sources: bool,
    loaded: Option<Loaded>,
    volume: f32,
}

impl SimulatedEngine {
    /// `durations` maps source locators to track lengths
    pub fn new(durations: HashMap<String, Duration>, default_duration: Duration) -> Self {
        Self {
            durations,
            default_duration,
            verify_sources: true,
            loaded: None,
            volume: 1.0,
        }
    }

    /// Skip the on-disk check for local sources
    pub fn without_source_check(mut self) -> Self {
        self.verify_sources = false;
        self
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn loaded_source(&self) -> Option<&str> {
        self.loaded.as_ref().map(|loaded| loaded.source.as_str())
    }

    async fn check_source(&self, source: &str) -> tonearm_core::Result<()> {
        // Remote locators can't be probed without a network stack
        if !self.verify_sources || source.contains("://") {
            return Ok(());
        }

        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|e| CoreError::source(format!("{source}: {e}")))?;
        if !metadata.is_file() {
            return Err(CoreError::source(format!("{source}: not a file")));
        }
        Ok(())
    }
}

#[async_trait]
impl RenderEngine for SimulatedEngine {
    async fn load(&mut self, source: &str, events: EventSink<EngineEvent>) -> tonearm_core::Result<()> {
        self.loaded = None;
        self.check_source(source).await?;

        let duration = self
            .durations
            .get(source)
            .copied()
            .unwrap_or(self.default_duration);

        debug!(source, ?duration, "Loaded source");
        self.loaded = Some(Loaded {
            source: source.to_string(),
            duration,
            events,
            offset: Duration::ZERO,
            started_at: None,
            completion: None,
        });
        Ok(())
    }

    fn start(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.started_at.is_none() {
                loaded.started_at = Some(Instant::now());
                loaded.schedule_completion();
                info!(source = %loaded.source, position = ?loaded.offset, "Rendering");
            }
        }
    }

    fn pause(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            if loaded.started_at.is_some() {
                loaded.offset = loaded.position();
                loaded.started_at = None;
                loaded.cancel_completion();
            }
        }
    }

    fn seek(&mut self, position: Duration) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.offset = position.min(loaded.duration);
            if loaded.started_at.is_some() {
                loaded.started_at = Some(Instant::now());
                loaded.schedule_completion();
            }
            loaded.events.emit(EngineEvent::SeekCompleted(loaded.offset));
        }
    }

    fn position(&self) -> Duration {
        self.loaded
            .as_ref()
            .map(Loaded::position)
            .unwrap_or_default()
    }

    fn is_rendering(&self) -> bool {
        self.loaded
            .as_ref()
            .is_some_and(|loaded| loaded.started_at.is_some())
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(volume, "Output gain");
        self.volume = volume;
    }

    fn release(&mut self) {
        if let Some(loaded) = self.loaded.take() {
            debug!(source = %loaded.source, "Released source");
        }
    }
}
