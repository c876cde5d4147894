//! Tonearm Daemon
//!
//! A headless player around `tonearm-playback`: a JSON library manifest as
//! the catalog, a clock-driven engine in place of a decoder, and a console
//! reading commands from stdin.

pub mod catalog;
pub mod config;
pub mod console;
pub mod daemon;
pub mod engine;
pub mod error;
pub mod focus;
pub mod host;

pub use catalog::{Manifest, ManifestCatalog};
pub use config::DaemonConfig;
pub use daemon::Daemon;
pub use error::{DaemonError, Result};
