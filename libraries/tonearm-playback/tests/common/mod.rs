//! Test doubles and a harness around a running playback service
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use tonearm_core::{
    Catalog, CatalogCategory, CoreError, EngineEvent, EventSink, FocusArbiter, FocusChange,
    FocusResponse, HostEnvironment, Notification, PersistedQueue, QueueStore, RenderEngine,
    TrackDescriptor,
};
use tonearm_playback::{
    Collaborators, PlaybackConfig, PlaybackHandle, PlaybackService, PlaybackState,
    PlaybackStatus, SessionUpdate, Subscription,
};

// ===== Tracks =====

pub fn track(id: &str) -> TrackDescriptor {
    TrackDescriptor::new(id, format!("Track {id}"), format!("/music/{id}.flac"))
        .with_artist("Test Artist")
        .with_album("Test Album")
        .with_duration(Duration::from_secs(180))
}

pub fn tracks(ids: &[&str]) -> Vec<TrackDescriptor> {
    ids.iter().map(|id| track(id)).collect()
}

pub fn source(id: &str) -> String {
    format!("/music/{id}.flac")
}

pub fn ids(tracks: &[TrackDescriptor]) -> Vec<String> {
    tracks.iter().map(|t| t.id.as_str().to_string()).collect()
}

// ===== Render Engine =====

#[derive(Default)]
pub struct EngineState {
    /// Successful loads, in order
    pub loads: Vec<String>,
    pub attempts: usize,
    pub rendering: bool,
    pub position: Duration,
    pub volume: f32,
    pub releases: usize,
    pub seeks: Vec<Duration>,
    pub failing: HashSet<String>,
    pub events: Option<EventSink<EngineEvent>>,
    pub retired: Vec<EventSink<EngineEvent>>,
}

pub struct FakeEngine(Arc<Mutex<EngineState>>);

#[async_trait]
impl RenderEngine for FakeEngine {
    async fn load(&mut self, source: &str, events: EventSink<EngineEvent>) -> tonearm_core::Result<()> {
        let mut state = self.0.lock().unwrap();
        state.attempts += 1;
        if state.failing.contains(source) {
            return Err(CoreError::source(format!("{source}: unreadable")));
        }
        state.loads.push(source.to_string());
        if let Some(old) = state.events.replace(events) {
            state.retired.push(old);
        }
        state.position = Duration::ZERO;
        state.rendering = false;
        Ok(())
    }

    fn start(&mut self) {
        self.0.lock().unwrap().rendering = true;
    }

    fn pause(&mut self) {
        self.0.lock().unwrap().rendering = false;
    }

    fn seek(&mut self, position: Duration) {
        let mut state = self.0.lock().unwrap();
        state.seeks.push(position);
        // Reports the new position only while rendering
        if state.rendering {
            state.position = position;
        }
    }

    fn position(&self) -> Duration {
        self.0.lock().unwrap().position
    }

    fn is_rendering(&self) -> bool {
        self.0.lock().unwrap().rendering
    }

    fn set_volume(&mut self, volume: f32) {
        self.0.lock().unwrap().volume = volume;
    }

    fn release(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.rendering = false;
        state.releases += 1;
        if let Some(old) = state.events.take() {
            state.retired.push(old);
        }
    }
}

#[derive(Clone, Default)]
pub struct EngineProbe(Arc<Mutex<EngineState>>);

impl EngineProbe {
    pub fn engine(&self) -> FakeEngine {
        FakeEngine(Arc::clone(&self.0))
    }

    pub fn loads(&self) -> Vec<String> {
        self.0.lock().unwrap().loads.clone()
    }

    pub fn attempts(&self) -> usize {
        self.0.lock().unwrap().attempts
    }

    pub fn is_rendering(&self) -> bool {
        self.0.lock().unwrap().rendering
    }

    pub fn volume(&self) -> f32 {
        self.0.lock().unwrap().volume
    }

    pub fn releases(&self) -> usize {
        self.0.lock().unwrap().releases
    }

    pub fn seeks(&self) -> Vec<Duration> {
        self.0.lock().unwrap().seeks.clone()
    }

    pub fn set_position(&self, position: Duration) {
        self.0.lock().unwrap().position = position;
    }

    pub fn fail_source(&self, source: &str) {
        self.0.lock().unwrap().failing.insert(source.to_string());
    }

    /// Raise an event on the live handle
    pub fn emit(&self, event: EngineEvent) {
        let sink = self.0.lock().unwrap().events.clone();
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }

    pub fn complete(&self) {
        self.emit(EngineEvent::Completed);
    }

    /// Raise an event on the most recently retired handle
    pub fn emit_retired(&self, event: EngineEvent) {
        let sink = self.0.lock().unwrap().retired.last().cloned();
        if let Some(sink) = sink {
            sink.emit(event);
        }
    }
}

// ===== Focus Arbiter =====

#[derive(Default)]
pub struct FocusState {
    pub responses: VecDeque<FocusResponse>,
    pub requests: usize,
    pub abandons: usize,
    pub listener: Option<EventSink<FocusChange>>,
}

pub struct FakeFocus(Arc<Mutex<FocusState>>);

impl FocusArbiter for FakeFocus {
    fn request(&mut self, changes: EventSink<FocusChange>) -> FocusResponse {
        let mut state = self.0.lock().unwrap();
        state.requests += 1;
        state.listener = Some(changes);
        state.responses.pop_front().unwrap_or(FocusResponse::Granted)
    }

    fn abandon(&mut self) {
        let mut state = self.0.lock().unwrap();
        state.abandons += 1;
        state.listener = None;
    }
}

#[derive(Clone, Default)]
pub struct FocusProbe(Arc<Mutex<FocusState>>);

impl FocusProbe {
    pub fn arbiter(&self) -> FakeFocus {
        FakeFocus(Arc::clone(&self.0))
    }

    /// Answer the next request with `response` instead of `Granted`
    pub fn script(&self, response: FocusResponse) {
        self.0.lock().unwrap().responses.push_back(response);
    }

    pub fn requests(&self) -> usize {
        self.0.lock().unwrap().requests
    }

    pub fn abandons(&self) -> usize {
        self.0.lock().unwrap().abandons
    }

    pub fn is_registered(&self) -> bool {
        self.0.lock().unwrap().listener.is_some()
    }

    /// Deliver a focus change to the registered listener
    pub fn emit(&self, change: FocusChange) {
        let listener = self.0.lock().unwrap().listener.clone();
        if let Some(listener) = listener {
            listener.emit(change);
        }
    }
}

// ===== Host Environment =====

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Start,
    Foreground(Notification),
    Update(Notification),
    Exit { remove_notification: bool },
    Stop,
}

#[derive(Clone, Default)]
pub struct HostProbe(Arc<Mutex<Vec<HostCall>>>);

impl HostProbe {
    pub fn calls(&self) -> Vec<HostCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&HostCall) -> bool) -> usize {
        self.0.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    fn push(&self, call: HostCall) {
        self.0.lock().unwrap().push(call);
    }
}

impl HostEnvironment for HostProbe {
    fn start_service(&mut self) {
        self.push(HostCall::Start);
    }

    fn enter_foreground(&mut self, notification: &Notification) {
        self.push(HostCall::Foreground(notification.clone()));
    }

    fn update_notification(&mut self, notification: &Notification) {
        self.push(HostCall::Update(notification.clone()));
    }

    fn exit_foreground(&mut self, remove_notification: bool) {
        self.push(HostCall::Exit {
            remove_notification,
        });
    }

    fn stop_service(&mut self) {
        self.push(HostCall::Stop);
    }
}

// ===== Catalog =====

#[derive(Default)]
pub struct FakeCatalog {
    listings: Mutex<HashMap<CatalogCategory, Vec<TrackDescriptor>>>,
    gate: Mutex<Option<Arc<Notify>>>,
    failing: AtomicBool,
    lookups: AtomicUsize,
}

impl FakeCatalog {
    pub fn insert(&self, category: CatalogCategory, tracks: Vec<TrackDescriptor>) {
        self.listings.lock().unwrap().insert(category, tracks);
    }

    /// Hold every lookup until the returned gate is notified
    pub fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn list(&self, category: &CatalogCategory) -> tonearm_core::Result<Vec<TrackDescriptor>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::catalog("media index unavailable"));
        }
        Ok(self
            .listings
            .lock()
            .unwrap()
            .get(category)
            .cloned()
            .unwrap_or_default())
    }
}

// ===== Queue Store =====

#[derive(Default)]
pub struct FakeStore {
    entries: Mutex<HashMap<String, PersistedQueue>>,
    failing: AtomicBool,
    saves: AtomicUsize,
}

impl FakeStore {
    pub fn with_queue(key: &str, queue: PersistedQueue) -> Self {
        let store = Self::default();
        store.entries.lock().unwrap().insert(key.to_string(), queue);
        store
    }

    pub fn get(&self, key: &str) -> Option<PersistedQueue> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QueueStore for FakeStore {
    async fn save(&self, key: &str, queue: &PersistedQueue) -> tonearm_core::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::store("disk full"));
        }
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), queue.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> tonearm_core::Result<Option<PersistedQueue>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CoreError::store("disk unreadable"));
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }
}

// ===== Harness =====

pub struct Harness {
    pub handle: PlaybackHandle,
    pub updates: Subscription,
    pub engine: EngineProbe,
    pub focus: FocusProbe,
    pub host: HostProbe,
    pub catalog: Arc<FakeCatalog>,
    pub store: Arc<FakeStore>,
}

impl Harness {
    pub fn start() -> Self {
        Self::start_with(PlaybackConfig::default(), Arc::new(FakeStore::default()))
    }

    pub fn with_config(config: PlaybackConfig) -> Self {
        Self::start_with(config, Arc::new(FakeStore::default()))
    }

    pub fn start_with(config: PlaybackConfig, store: Arc<FakeStore>) -> Self {
        let engine = EngineProbe::default();
        let focus = FocusProbe::default();
        let host = HostProbe::default();
        let catalog = Arc::new(FakeCatalog::default());

        let collaborators = Collaborators {
            engine: Box::new(engine.engine()),
            focus: Box::new(focus.arbiter()),
            host: Box::new(host.clone()),
            catalog: Arc::clone(&catalog) as Arc<dyn Catalog>,
            store: Arc::clone(&store) as Arc<dyn QueueStore>,
        };

        let (service, handle) = PlaybackService::new(config, collaborators);
        let updates = handle.subscribe();
        service.spawn();

        Self {
            handle,
            updates,
            engine,
            focus,
            host,
            catalog,
            store,
        }
    }

    /// Status after every input sent so far has been applied
    pub async fn status(&self) -> PlaybackStatus {
        self.handle.status().await.expect("playback service running")
    }

    pub async fn state(&self) -> PlaybackState {
        self.status().await.state
    }

    /// Poll until `condition` holds, for inputs raised off the service loop
    pub async fn wait_for(
        &self,
        what: &str,
        condition: impl Fn(&PlaybackStatus) -> bool,
    ) -> PlaybackStatus {
        for _ in 0..400 {
            let status = self.status().await;
            if condition(&status) {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for {what}");
    }

    /// Replace the queue and wait for it to be applied
    pub async fn load_queue(&self, ids: &[&str]) {
        self.handle.replace_queue(tracks(ids), 0).unwrap();
        self.status().await;
    }

    /// Replace the queue and start playing its first entry
    pub async fn start_playing(&self, ids: &[&str]) {
        self.load_queue(ids).await;
        self.handle.play().unwrap();
        assert_eq!(self.state().await, PlaybackState::Playing);
    }

    /// Every buffered update
    pub fn drain(&mut self) -> Vec<SessionUpdate> {
        self.updates.drain()
    }

    /// States of the buffered snapshots, in publication order
    pub fn published_states(&mut self) -> Vec<PlaybackState> {
        self.drain()
            .iter()
            .filter_map(|u| u.as_snapshot().map(|s| s.state))
            .collect()
    }
}
