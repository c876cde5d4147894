//! Playback manager - the session state machine
//!
//! Owns the queue, the render handle, focus bookkeeping, the publisher and the
//! lifecycle manager. Every input (command, engine event, focus change,
//! catalog completion) is applied here one at a time by the service loop.

use crate::{
    actions::PlaybackActions,
    command::{Command, Input, PlaySource, PlaybackStatus},
    engine::EngineAdapter,
    error::{PlaybackError, Result},
    events::{SessionUpdate, StateSnapshot},
    focus::{FocusAction, FocusController},
    lifecycle::LifecycleManager,
    publisher::{SessionPublisher, Subscription},
    queue::Queue,
    shuffle::shuffle_tracks,
    types::{Direction, PlaybackConfig, PlaybackState, RepeatMode},
};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tonearm_core::{
    Catalog, EngineEvent, EventSink, FocusArbiter, FocusChange, FocusResponse, HostEnvironment,
    PersistedQueue, QueueStore, RenderEngine, TrackDescriptor, TrackId,
};
use tracing::{debug, error, info, warn};

pub(crate) type InputSender = mpsc::UnboundedSender<Input>;

/// Message published when a track cannot be rendered
const SOURCE_ERROR_MESSAGE: &str = "Couldn't play track";

/// Message published when a catalog lookup fails
const CATALOG_ERROR_MESSAGE: &str = "Couldn't load tracks";

/// External collaborators the manager drives
pub struct Collaborators {
    pub engine: Box<dyn RenderEngine>,
    pub focus: Box<dyn FocusArbiter>,
    pub host: Box<dyn HostEnvironment>,
    pub catalog: Arc<dyn Catalog>,
    pub store: Arc<dyn QueueStore>,
}

/// Where the session was before a transition that may fail
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    cursor: Option<usize>,
    state: PlaybackState,
}

/// Session state machine
pub struct PlaybackManager {
    config: PlaybackConfig,
    state: PlaybackState,
    queue: Queue,
    repeat: RepeatMode,
    shuffle: bool,

    engine: EngineAdapter,
    focus: FocusController,
    publisher: SessionPublisher,
    lifecycle: LifecycleManager,
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn QueueStore>,

    /// Loop-back channel for engine, focus and catalog callbacks
    inputs: InputSender,

    /// Set by prepare/play, cleared by stop
    session_active: bool,

    /// Track whose metadata was published last
    announced: Option<TrackId>,

    last_request_id: u64,
    pending_request: Option<u64>,
}

impl PlaybackManager {
    pub(crate) fn new(
        config: PlaybackConfig,
        collaborators: Collaborators,
        inputs: InputSender,
    ) -> Self {
        let Collaborators {
            engine,
            focus,
            host,
            catalog,
            store,
        } = collaborators;

        Self {
            state: PlaybackState::Stopped,
            queue: Queue::new(),
            repeat: config.repeat,
            shuffle: config.shuffle,
            engine: EngineAdapter::new(engine, config.full_volume),
            focus: FocusController::new(focus),
            publisher: SessionPublisher::new(config.outbox_capacity),
            lifecycle: LifecycleManager::new(host),
            catalog,
            store,
            inputs,
            session_active: false,
            announced: None,
            last_request_id: 0,
            pending_request: None,
            config,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Actions legal in the current state
    pub fn legal_actions(&self) -> PlaybackActions {
        PlaybackActions::for_state(self.state)
    }

    pub fn subscribe(&self) -> Subscription {
        self.publisher.subscribe()
    }

    pub(crate) fn update_sender(&self) -> broadcast::Sender<SessionUpdate> {
        self.publisher.sender()
    }

    pub(crate) fn status(&self) -> PlaybackStatus {
        PlaybackStatus {
            state: self.state,
            cursor: self.queue.cursor(),
            queue: self.queue.tracks().to_vec(),
            current: self.queue.current().cloned(),
            repeat: self.repeat,
            shuffle: self.shuffle,
            focus: self.focus.grant(),
            resume_on_gain: self.focus.resume_on_gain(),
            volume: self.engine.volume(),
            session_active: self.session_active,
            snapshot: self.publisher.latest().cloned(),
        }
    }

    // ===== Input Dispatch =====

    /// Apply one input
    ///
    /// Breaks once a `Shutdown` command has been applied.
    pub(crate) async fn handle(&mut self, input: Input) -> ControlFlow<()> {
        match input {
            Input::Command(command) => {
                let shutdown = command == Command::Shutdown;
                self.dispatch(command).await;
                if shutdown {
                    return ControlFlow::Break(());
                }
            }
            Input::Engine { generation, event } => self.on_engine_event(generation, event).await,
            Input::Focus(change) => self.on_focus_change(change),
            Input::CatalogLoaded {
                request_id,
                shuffle,
                result,
            } => self.on_catalog_loaded(request_id, shuffle, result).await,
            Input::Status(reply) => {
                let _ = reply.send(self.status());
            }
        }
        ControlFlow::Continue(())
    }

    async fn dispatch(&mut self, command: Command) {
        // Stop cancels pending lookups even where the mask drops it
        if command == Command::Stop {
            self.invalidate_catalog_request();
        }

        if let Some(action) = command.required_action() {
            if !self.legal_actions().contains(action) {
                debug!(?command, state = ?self.state, "Ignoring command not legal in current state");
                return;
            }
        }

        let result = match command {
            Command::Prepare => self.prepare(),
            Command::Play => self.play().await,
            Command::Pause => {
                self.pause();
                Ok(())
            }
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::SeekTo(position) => {
                self.seek_to(position);
                Ok(())
            }
            Command::SkipToNext => self.skip(Direction::Next).await,
            Command::SkipToPrevious => self.skip(Direction::Previous).await,
            Command::SkipToQueueIndex(index) => self.skip_to_index(index).await,
            Command::PlayFrom(source) => self.play_from(source).await,
            Command::SetRepeatMode(mode) => {
                self.set_repeat_mode(mode);
                Ok(())
            }
            Command::SetShuffleMode(enabled) => self.set_shuffle_mode(enabled).await,
            Command::ReplaceQueue {
                tracks,
                start_index,
            } => {
                self.invalidate_catalog_request();
                self.install_queue(tracks, start_index).await;
                Ok(())
            }
            Command::AddToQueue(track) => {
                self.queue.append(track);
                self.queue_changed().await;
                Ok(())
            }
            Command::PlayNext(track) => {
                self.queue.insert_next(track);
                self.queue_changed().await;
                Ok(())
            }
            Command::ClearQueue => {
                self.invalidate_catalog_request();
                self.stop_if_active();
                self.queue.clear();
                self.queue_changed().await;
                Ok(())
            }
            Command::Shutdown => {
                info!("Shutting down playback");
                self.invalidate_catalog_request();
                self.stop_if_active();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    /// Log a failed transition; source failures are also shown to the user
    fn report(&mut self, err: &PlaybackError) {
        if err.is_source_failure() {
            error!(error = %err, "Playback failed");
            self.publisher.publish(SessionUpdate::Error {
                message: SOURCE_ERROR_MESSAGE.to_string(),
            });
            return;
        }

        match err {
            PlaybackError::EmptyQueue => debug!(error = %err, "Nothing to do"),
            PlaybackError::ServiceClosed => warn!(error = %err, "Playback service unavailable"),
            _ => warn!(error = %err, "Playback degraded"),
        }
    }

    // ===== Cold Start =====

    /// Install the persisted queue if nothing is loaded yet
    ///
    /// The restored track is announced but not rendered; state stays `Stopped`.
    pub(crate) async fn restore(&mut self) {
        if !self.queue.is_empty() {
            return;
        }

        match self.store.load(&self.config.queue_key).await {
            Ok(Some(persisted)) if !persisted.is_empty() => {
                self.queue = Queue::from_persisted(persisted);
                info!(
                    tracks = self.queue.len(),
                    cursor = ?self.queue.cursor(),
                    "Restored play queue"
                );
                if let Err(e) = self.prepare() {
                    self.report(&e);
                }
                self.publish_state();
            }
            Ok(_) => debug!(key = %self.config.queue_key, "No persisted queue"),
            Err(e) => self.report(&PlaybackError::Persistence(e.to_string())),
        }
    }

    // ===== Playback Control =====

    /// Announce the queue and current track without rendering
    fn prepare(&mut self) -> Result<()> {
        let current = self.queue.current().cloned().ok_or(PlaybackError::EmptyQueue)?;
        self.session_active = true;
        self.publish_queue();
        self.announced = Some(current.id.clone());
        self.publisher.publish(SessionUpdate::Metadata(Some(current)));
        Ok(())
    }

    async fn play(&mut self) -> Result<()> {
        let prior = self.checkpoint();
        self.play_current(prior).await
    }

    /// Resume the paused handle if it holds the current track, otherwise load
    async fn play_current(&mut self, prior: Checkpoint) -> Result<()> {
        let current = self
            .queue
            .current()
            .map(|track| track.id.clone())
            .ok_or(PlaybackError::EmptyQueue)?;

        if self.state == PlaybackState::Paused && self.engine.holds(&current) {
            debug!(track_id = %current, "Resuming paused track");
            return self.acquire_focus_and_start();
        }

        self.start_track(prior).await
    }

    /// Load the current queue entry and start it
    ///
    /// On failure the cursor goes back to `prior` and the state degrades to
    /// `Stopped` (if that is where we came from) or `Paused`.
    async fn start_track(&mut self, prior: Checkpoint) -> Result<()> {
        let track = self
            .queue
            .current()
            .cloned()
            .ok_or(PlaybackError::EmptyQueue)?;

        self.session_active = true;
        self.announce_current();

        let inputs = self.inputs.clone();
        let timeout = self.config.load_timeout();
        let loaded = self
            .engine
            .load(&track, move |generation| engine_sink(inputs, generation), timeout)
            .await;

        if let Err(e) = loaded {
            self.recover(prior);
            return Err(e);
        }

        info!(track_id = %track.id, title = %track.title, "Track loaded");
        self.acquire_focus_and_start()
    }

    fn recover(&mut self, prior: Checkpoint) {
        self.queue.restore_cursor(prior.cursor);
        self.focus.abandon();
        self.announce_current();

        let state = if prior.state == PlaybackState::Stopped {
            PlaybackState::Stopped
        } else {
            PlaybackState::Paused
        };
        if self.state != state {
            self.set_state(state);
        }
    }

    fn acquire_focus_and_start(&mut self) -> Result<()> {
        let changes = self.focus_sink();
        match self.focus.request(changes) {
            FocusResponse::Granted => {
                self.engine.set_volume(self.config.full_volume);
                self.engine.start();
                self.set_state(PlaybackState::Playing);
                Ok(())
            }
            FocusResponse::Delayed => {
                self.set_state(PlaybackState::Paused);
                Ok(())
            }
            FocusResponse::Denied => {
                self.set_state(PlaybackState::Paused);
                Err(PlaybackError::FocusDenied)
            }
        }
    }

    fn pause(&mut self) {
        self.engine.pause();
        self.focus.on_user_pause(self.config.abandon_focus_on_pause);
        self.set_state(PlaybackState::Paused);
    }

    fn stop(&mut self) {
        self.invalidate_catalog_request();
        self.focus.abandon();
        self.engine.release();
        self.session_active = false;
        self.set_state(PlaybackState::Stopped);
    }

    fn stop_if_active(&mut self) {
        if self.state != PlaybackState::Stopped {
            self.stop();
        }
    }

    fn seek_to(&mut self, position: Duration) {
        if !self.engine.has_handle() {
            debug!(?position, "No render handle, ignoring seek");
            return;
        }
        self.engine.seek(position);
        self.publish_state();
    }

    async fn skip(&mut self, direction: Direction) -> Result<()> {
        let prior = self.checkpoint();
        self.queue
            .advance(direction)
            .ok_or(PlaybackError::EmptyQueue)?;

        self.set_state(match direction {
            Direction::Next => PlaybackState::SkippingNext,
            Direction::Previous => PlaybackState::SkippingPrevious,
        });
        self.start_track(prior).await
    }

    async fn skip_to_index(&mut self, index: usize) -> Result<()> {
        let prior = self.checkpoint();
        if !self.queue.set_cursor(index) {
            debug!(index, len = self.queue.len(), "Queue index out of range");
            return Ok(());
        }
        self.play_current(prior).await
    }

    // ===== Catalog =====

    async fn play_from(&mut self, source: PlaySource) -> Result<()> {
        match source {
            PlaySource::QueueIndex(index) => self.skip_to_index(index).await,
            other => {
                self.request_catalog(&other);
                Ok(())
            }
        }
    }

    /// Start a catalog lookup; its completion comes back through the inbox
    fn request_catalog(&mut self, source: &PlaySource) {
        let Some(category) = source.category() else {
            return;
        };

        self.last_request_id += 1;
        let request_id = self.last_request_id;
        self.pending_request = Some(request_id);

        info!(%category, request_id, "Requesting tracks from catalog");

        let catalog = Arc::clone(&self.catalog);
        let inputs = self.inputs.clone();
        let shuffle = source.shuffles();
        tokio::spawn(async move {
            let result = catalog.list(&category).await;
            let _ = inputs.send(Input::CatalogLoaded {
                request_id,
                shuffle,
                result,
            });
        });
    }

    fn invalidate_catalog_request(&mut self) {
        if let Some(request_id) = self.pending_request.take() {
            debug!(request_id, "Cancelled pending catalog lookup");
        }
    }

    async fn on_catalog_loaded(
        &mut self,
        request_id: u64,
        shuffle: bool,
        result: tonearm_core::Result<Vec<TrackDescriptor>>,
    ) {
        if self.pending_request != Some(request_id) {
            debug!(request_id, "Discarding stale catalog result");
            return;
        }
        self.pending_request = None;

        let mut tracks = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                warn!(error = %e, request_id, "Catalog lookup failed");
                self.publisher.publish(SessionUpdate::Error {
                    message: CATALOG_ERROR_MESSAGE.to_string(),
                });
                return;
            }
        };

        if tracks.is_empty() {
            info!(request_id, "Catalog returned no tracks");
            return;
        }

        if shuffle {
            shuffle_tracks(&mut tracks);
        }

        self.install_queue(tracks, 0).await;
        let prior = self.checkpoint();
        if let Err(e) = self.play_current(prior).await {
            self.report(&e);
        }
    }

    // ===== Queue =====

    /// Stop whatever plays and replace the queue
    async fn install_queue(&mut self, tracks: Vec<TrackDescriptor>, start_index: usize) {
        self.stop_if_active();
        self.queue.replace(tracks, start_index);
        info!(tracks = self.queue.len(), cursor = ?self.queue.cursor(), "Queue replaced");
        self.queue_changed().await;
    }

    /// Persist the queue and announce the new listing
    async fn queue_changed(&mut self) {
        let persisted = self.queue.to_persisted();
        if let Err(e) = persist(self.store.as_ref(), &self.config.queue_key, &persisted).await {
            self.report(&e);
        }
        self.publish_queue();
        self.announce_current();
    }

    // ===== Repeat & Shuffle =====

    fn set_repeat_mode(&mut self, mode: RepeatMode) {
        self.repeat = mode;
        self.publish_modes();
    }

    /// Turning shuffle on reshuffles and restarts from the first entry
    async fn set_shuffle_mode(&mut self, enabled: bool) -> Result<()> {
        self.shuffle = enabled;
        self.publish_modes();

        if !enabled || self.queue.is_empty() {
            return Ok(());
        }

        let prior = self.checkpoint();
        self.queue.shuffle();
        self.queue_changed().await;
        self.start_track(prior).await
    }

    // ===== Collaborator Events =====

    async fn on_engine_event(&mut self, generation: u64, event: EngineEvent) {
        if !self.engine.is_current(generation) {
            debug!(generation, ?event, "Ignoring event from released render handle");
            return;
        }

        match event {
            EngineEvent::SeekCompleted(position) => {
                debug!(?position, "Seek completed");
                self.engine.seek_completed();
                self.publish_state();
            }
            EngineEvent::Completed => self.on_track_completed().await,
        }
    }

    async fn on_track_completed(&mut self) {
        info!(repeat = ?self.repeat, "Track completed");

        let result = match self.repeat {
            RepeatMode::One => {
                let prior = self.checkpoint();
                self.start_track(prior).await
            }
            RepeatMode::All => self.skip(Direction::Next).await,
            RepeatMode::None => {
                self.engine.pause();
                self.set_state(PlaybackState::Paused);
                self.stop();
                Ok(())
            }
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    fn on_focus_change(&mut self, change: FocusChange) {
        if self.state == PlaybackState::Stopped {
            debug!(?change, "Ignoring focus change while stopped");
            return;
        }

        let action = self.focus.on_change(change, self.engine.is_rendering());
        debug!(?change, ?action, "Audio focus changed");

        match action {
            FocusAction::Resume => {
                if !self.engine.has_handle() {
                    debug!("Focus regained without a render handle");
                    return;
                }
                self.engine.set_volume(self.config.full_volume);
                self.engine.start();
                self.set_state(PlaybackState::Playing);
            }
            FocusAction::RestoreVolume => self.engine.set_volume(self.config.full_volume),
            FocusAction::Duck => self.engine.set_volume(self.config.duck_volume),
            FocusAction::Pause | FocusAction::PauseAndAbandon => {
                if self.state.is_active() {
                    info!(?change, "Pausing for audio focus loss");
                    self.engine.pause();
                    self.set_state(PlaybackState::Paused);
                }
            }
            FocusAction::Ignore => {}
        }
    }

    // ===== Publishing =====

    fn set_state(&mut self, state: PlaybackState) {
        if state == PlaybackState::Playing {
            self.engine.unpin();
        }
        let previous = std::mem::replace(&mut self.state, state);
        if previous != state {
            info!(from = ?previous, to = ?state, "Playback state changed");
        }
        self.publish_state();
    }

    fn publish_state(&mut self) {
        let snapshot = StateSnapshot::capture(self.state, self.engine.position());
        self.lifecycle.apply(&snapshot, self.queue.current());
        self.publisher.publish(SessionUpdate::State(snapshot));
    }

    fn publish_queue(&mut self) {
        self.publisher.publish(SessionUpdate::Queue {
            tracks: self.queue.tracks().to_vec(),
            cursor: self.queue.cursor(),
        });
    }

    fn publish_modes(&mut self) {
        self.publisher.publish(SessionUpdate::Modes {
            repeat: self.repeat,
            shuffle: self.shuffle,
        });
    }

    /// Publish metadata if the current track changed since the last announcement
    fn announce_current(&mut self) {
        let current = self.queue.current();
        if current.map(|t| &t.id) == self.announced.as_ref() {
            return;
        }
        self.announced = current.map(|t| t.id.clone());
        let update = SessionUpdate::Metadata(current.cloned());
        self.publisher.publish(update);
    }

    // ===== Helpers =====

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.queue.cursor(),
            state: self.state,
        }
    }

    fn focus_sink(&self) -> EventSink<FocusChange> {
        let inputs = self.inputs.clone();
        EventSink::new(move |change| {
            let _ = inputs.send(Input::Focus(change));
        })
    }
}

async fn persist(store: &dyn QueueStore, key: &str, queue: &PersistedQueue) -> Result<()> {
    store
        .save(key, queue)
        .await
        .map_err(|e| PlaybackError::Persistence(e.to_string()))
}

fn engine_sink(inputs: InputSender, generation: u64) -> EventSink<EngineEvent> {
    EventSink::new(move |event| {
        let _ = inputs.send(Input::Engine { generation, event });
    })
}

impl std::fmt::Debug for PlaybackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackManager")
            .field("state", &self.state)
            .field("queue", &self.queue)
            .field("repeat", &self.repeat)
            .field("shuffle", &self.shuffle)
            .field("engine", &self.engine)
            .field("focus", &self.focus)
            .field("pending_request", &self.pending_request)
            .finish_non_exhaustive()
    }
}
