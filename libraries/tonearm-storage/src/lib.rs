//! Tonearm Storage
//!
//! Durable homes for the play queue. Every store implements
//! [`tonearm_core::QueueStore`] and holds one JSON-encoded
//! [`tonearm_core::PersistedQueue`] per key.
//!
//! - [`JsonFileStore`]: one file per key, atomic replace on write
//! - [`SqliteQueueStore`]: a key-value table in `SQLite` (via `sqlx`)
//! - [`MemoryQueueStore`]: process-local, for tests and ephemeral sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use tonearm_core::{PersistedQueue, QueueStore, TrackDescriptor};
//! use tonearm_storage::SqliteQueueStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteQueueStore::connect("sqlite://tonearm.db").await?;
//!
//! let queue = PersistedQueue::new(
//!     vec![TrackDescriptor::new("1", "So What", "/music/so-what.flac")],
//!     Some(0),
//! );
//! store.save("playingQueue", &queue).await?;
//!
//! let restored = store.load("playingQueue").await?;
//! assert_eq!(restored, Some(queue));
//! # Ok(())
//! # }
//! ```

mod error;
pub mod file;
pub mod memory;
pub mod sqlite;

pub use error::{Result, StorageError};
pub use file::JsonFileStore;
pub use memory::MemoryQueueStore;
pub use sqlite::{create_pool, run_migrations, SqliteQueueStore};
