//! Wiring between configuration, collaborators and the playback service

use crate::catalog::ManifestCatalog;
use crate::config::{DaemonConfig, StorageBackend};
use crate::console::{self, ConsoleInput};
use crate::engine::SimulatedEngine;
use crate::error::Result;
use crate::focus::{FocusSimulator, LocalFocusArbiter};
use crate::host::{HostView, LoggingHost};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tonearm_core::QueueStore;
use tonearm_playback::{
    Collaborators, PlaybackConfig, PlaybackError, PlaybackHandle, PlaybackService,
};
use tonearm_storage::{JsonFileStore, SqliteQueueStore};
use tracing::{info, warn};

/// Open the configured queue store
pub async fn open_store(config: &DaemonConfig) -> Result<Arc<dyn QueueStore>> {
    let store: Arc<dyn QueueStore> = match config.storage.backend {
        StorageBackend::File => {
            info!(dir = %config.storage.path.display(), "Using file queue store");
            Arc::new(JsonFileStore::new(config.storage.path.clone()))
        }
        StorageBackend::Sqlite => {
            if let Some(parent) = config.storage.path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            Arc::new(SqliteQueueStore::connect(&config.database_url()).await?)
        }
    };
    Ok(store)
}

/// A running playback service plus the local stand-ins it talks to
pub struct Daemon {
    handle: PlaybackHandle,
    catalog: Arc<ManifestCatalog>,
    focus: FocusSimulator,
    host: LoggingHost,
    task: JoinHandle<()>,
}

impl Daemon {
    /// Load the library, open the store and start the service
    pub async fn start(config: &DaemonConfig) -> Result<Self> {
        let default_duration = Duration::from_secs(config.library.default_track_secs);
        let catalog = ManifestCatalog::load(&config.library.manifest, default_duration).await?;
        let store = open_store(config).await?;

        let mut engine = SimulatedEngine::new(catalog.durations(), default_duration);
        if !config.library.verify_sources {
            engine = engine.without_source_check();
        }

        Ok(Self::start_with(
            config.playback.clone(),
            catalog,
            engine,
            store,
        ))
    }

    /// Start the service over explicit parts
    pub fn start_with(
        playback: PlaybackConfig,
        catalog: ManifestCatalog,
        engine: SimulatedEngine,
        store: Arc<dyn QueueStore>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let (focus, simulator) = LocalFocusArbiter::new();
        let host = LoggingHost::new();

        let collaborators = Collaborators {
            engine: Box::new(engine),
            focus: Box::new(focus),
            host: Box::new(host.clone()),
            catalog: Arc::clone(&catalog) as Arc<dyn tonearm_core::Catalog>,
            store,
        };

        let (service, handle) = PlaybackService::new(playback, collaborators);
        let task = service.spawn();

        Self {
            handle,
            catalog,
            focus: simulator,
            host,
            task,
        }
    }

    pub fn handle(&self) -> &PlaybackHandle {
        &self.handle
    }

    pub fn host_view(&self) -> HostView {
        self.host.view()
    }

    /// Apply one console input, returning text to show the user
    pub async fn execute(&self, input: ConsoleInput) -> Result<Option<String>> {
        let reply = match input {
            ConsoleInput::Playback(command) => {
                self.handle.send(command)?;
                None
            }
            ConsoleInput::Add(id) => match self.catalog.track(&id) {
                Some(track) => {
                    self.handle.add_to_queue(track.clone())?;
                    None
                }
                None => Some(format!("Unknown track: {id}")),
            },
            ConsoleInput::PlayNext(id) => match self.catalog.track(&id) {
                Some(track) => {
                    self.handle.play_next(track.clone())?;
                    None
                }
                None => Some(format!("Unknown track: {id}")),
            },
            ConsoleInput::Focus(change) => {
                if self.focus.emit(change) {
                    None
                } else {
                    Some("Focus is not held".to_string())
                }
            }
            ConsoleInput::Status => {
                let status = self.handle.status().await?;
                Some(console::format_status(&status))
            }
            ConsoleInput::Help => Some(console::HELP.to_string()),
            ConsoleInput::Quit => None,
        };
        Ok(reply)
    }

    /// Stop playback and wait for the service to finish
    pub async fn shutdown(self) -> Result<()> {
        match self.handle.shutdown() {
            Ok(()) | Err(PlaybackError::ServiceClosed) => {}
            Err(e) => return Err(e.into()),
        }
        if let Err(e) = self.task.await {
            warn!("Playback service task ended abnormally: {}", e);
        }
        Ok(())
    }
}

/// Read commands from `input` until `quit`, end of input or Ctrl-C
///
/// Session updates are printed as they are published.
pub async fn run_console<R>(daemon: Daemon, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut updates = daemon.handle().subscribe();
    let printer = tokio::spawn(async move {
        while let Some(update) = updates.recv().await {
            println!("{}", console::format_update(&update));
        }
    });

    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                None
            }
        };

        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match console::parse(&line) {
            Ok(ConsoleInput::Quit) => break,
            Ok(input) => {
                if let Some(reply) = daemon.execute(input).await? {
                    println!("{reply}");
                }
            }
            Err(e) => println!("{e}"),
        }
    }

    daemon.shutdown().await?;
    printer.abort();
    Ok(())
}

/// Print the persisted queue without starting playback
pub async fn show_queue(config: &DaemonConfig) -> Result<()> {
    let store = open_store(config).await?;
    match store.load(&config.playback.queue_key).await? {
        Some(queue) => println!("{}", console::format_queue(&queue.tracks, queue.cursor)),
        None => println!("No saved queue"),
    }
    Ok(())
}
