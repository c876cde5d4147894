//! Tonearm Core
//!
//! Platform-agnostic types, collaborator traits, and error handling shared by
//! every Tonearm crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `TrackId`, `CatalogCategory`, `PersistedQueue`
//! - **Collaborator Traits**: `Catalog`, `QueueStore`, `RenderEngine`, `FocusArbiter`,
//!   `HostEnvironment`
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! The playback orchestrator (`tonearm-playback`) only talks to the outside
//! world through these traits, so hosts can plug in a real decoder, a real
//! audio-focus service, or the test doubles used in the integration tests.
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::types::{TrackDescriptor, TrackId};
//! use std::time::Duration;
//!
//! let track = TrackDescriptor::new("42", "So What", "/music/so-what.flac")
//!     .with_artist("Miles Davis")
//!     .with_album("Kind of Blue")
//!     .with_duration(Duration::from_secs(562));
//!
//! assert_eq!(track.id, TrackId::new("42"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use traits::{Catalog, FocusArbiter, FocusResponse, HostEnvironment, QueueStore, RenderEngine};
pub use types::{
    CatalogCategory, EngineEvent, EventSink, FocusChange, Notification, NotificationAction,
    PersistedQueue, TrackDescriptor, TrackId,
};
