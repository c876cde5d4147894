//! Tonearm - Playback Orchestration
//!
//! The long-running core of a media player: one playback session with an
//! ordered queue, driven by commands from any number of controllers.
//!
//! This crate provides:
//! - Ordered queue with a circular cursor, persisted after every edit
//! - Session state machine (Stopped, Playing, Paused, Skipping)
//! - Legal-action mask, published with every snapshot and enforced on commands
//! - Audio focus handling (duck, transient loss with resume, permanent loss)
//! - Render-engine adapter with a bounded load and stale-event filtering
//! - Session publisher with bounded per-observer buffers
//! - Process lifecycle (foreground while playing, reclaimable once stopped)
//! - Repeat modes (None, One, All) and shuffle
//!
//! # Architecture
//!
//! `tonearm-playback` is platform-agnostic. Everything it drives sits behind
//! the collaborator traits in `tonearm-core`:
//! - `RenderEngine` decodes and renders one source at a time
//! - `FocusArbiter` grants and revokes the shared audio output
//! - `HostEnvironment` keeps the process alive and shows the notification
//! - `Catalog` lists tracks for a category
//! - `QueueStore` persists the queue
//!
//! A [`PlaybackService`] owns the session and applies commands, engine events,
//! focus changes and catalog completions strictly one at a time. Controllers
//! hold cloneable [`PlaybackHandle`]s.
//!
//! # Example: Driving a Session
//!
//! ```rust,no_run
//! use tonearm_playback::{Collaborators, PlaySource, PlaybackConfig, PlaybackService, SessionUpdate};
//! # use tonearm_core::*;
//! # use std::sync::Arc;
//! # use std::time::Duration;
//! # struct Engine;
//! # #[async_trait::async_trait]
//! # impl RenderEngine for Engine {
//! #     async fn load(&mut self, _: &str, _: EventSink<EngineEvent>) -> Result<()> { Ok(()) }
//! #     fn start(&mut self) {}
//! #     fn pause(&mut self) {}
//! #     fn seek(&mut self, _: Duration) {}
//! #     fn position(&self) -> Duration { Duration::ZERO }
//! #     fn is_rendering(&self) -> bool { false }
//! #     fn set_volume(&mut self, _: f32) {}
//! #     fn release(&mut self) {}
//! # }
//! # struct Focus;
//! # impl FocusArbiter for Focus {
//! #     fn request(&mut self, _: EventSink<FocusChange>) -> FocusResponse { FocusResponse::Granted }
//! #     fn abandon(&mut self) {}
//! # }
//! # struct Host;
//! # impl HostEnvironment for Host {
//! #     fn start_service(&mut self) {}
//! #     fn enter_foreground(&mut self, _: &Notification) {}
//! #     fn update_notification(&mut self, _: &Notification) {}
//! #     fn exit_foreground(&mut self, _: bool) {}
//! #     fn stop_service(&mut self) {}
//! # }
//! # struct Library;
//! # #[async_trait::async_trait]
//! # impl Catalog for Library {
//! #     async fn list(&self, _: &CatalogCategory) -> Result<Vec<TrackDescriptor>> { Ok(Vec::new()) }
//! # }
//! # struct Store;
//! # #[async_trait::async_trait]
//! # impl QueueStore for Store {
//! #     async fn save(&self, _: &str, _: &PersistedQueue) -> Result<()> { Ok(()) }
//! #     async fn load(&self, _: &str) -> Result<Option<PersistedQueue>> { Ok(None) }
//! # }
//!
//! # async fn example() -> tonearm_playback::Result<()> {
//! let collaborators = Collaborators {
//!     engine: Box::new(Engine),
//!     focus: Box::new(Focus),
//!     host: Box::new(Host),
//!     catalog: Arc::new(Library),
//!     store: Arc::new(Store),
//! };
//!
//! let (service, handle) = PlaybackService::new(PlaybackConfig::default(), collaborators);
//! let mut updates = handle.subscribe();
//! service.spawn();
//!
//! handle.play_from(PlaySource::Album("kind-of-blue".into()))?;
//!
//! while let Some(update) = updates.recv().await {
//!     if let SessionUpdate::State(snapshot) = update {
//!         println!("{:?} at {}ms", snapshot.state, snapshot.position_ms());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod actions;
pub mod command;
pub mod engine;
mod error;
pub mod events;
pub mod focus;
pub mod lifecycle;
mod manager;
pub mod publisher;
pub mod queue;
mod service;
pub mod shuffle;
pub mod types;

// Public exports
pub use actions::PlaybackActions;
pub use command::{Command, PlaySource, PlaybackStatus};
pub use error::{PlaybackError, Result};
pub use events::{SessionUpdate, StateSnapshot};
pub use manager::{Collaborators, PlaybackManager};
pub use publisher::Subscription;
pub use queue::Queue;
pub use service::{PlaybackHandle, PlaybackService};
pub use types::{Direction, FocusGrant, PlaybackConfig, PlaybackState, RepeatMode};
