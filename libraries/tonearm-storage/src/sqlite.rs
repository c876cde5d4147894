//! SQLite store
//!
//! Queues live in a `queue_state` key-value table with JSON-serialized values.

use crate::error::Result;
use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use tonearm_core::{PersistedQueue, QueueStore};
use tracing::{debug, info};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://tonearm.db`)
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    // Every connection to `:memory:` opens its own empty database
    let pool = if database_url.contains(":memory:") {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    }
    .connect_with(options)
    .await?;

    info!(url = database_url, "Opened queue database");
    Ok(pool)
}

/// Bring the schema up to date
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Queue store backed by a `SQLite` table
#[derive(Debug, Clone)]
pub struct SqliteQueueStore {
    pool: SqlitePool,
}

impl SqliteQueueStore {
    /// Wrap an existing pool; the schema must already be migrated
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open `database_url` and run migrations
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert or replace the value under `key`
    pub async fn put(&self, key: &str, queue: &PersistedQueue) -> Result<()> {
        let value = serde_json::to_string(queue)?;
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO queue_state (key, value, updated_at)
             VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(now)
        .execute(&self.pool)
        .await?;

        debug!(key, tracks = queue.tracks.len(), "Saved queue");
        Ok(())
    }

    /// Value under `key`, `None` if it was never written
    pub async fn get(&self, key: &str) -> Result<Option<PersistedQueue>> {
        let row = sqlx::query("SELECT value FROM queue_state WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let value: String = row.try_get("value")?;
                let queue: PersistedQueue = serde_json::from_str(&value)?;
                Ok(Some(PersistedQueue::new(queue.tracks, queue.cursor)))
            }
            None => Ok(None),
        }
    }

    /// Delete the value under `key`
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM queue_state WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn save(&self, key: &str, queue: &PersistedQueue) -> tonearm_core::Result<()> {
        Ok(self.put(key, queue).await?)
    }

    async fn load(&self, key: &str) -> tonearm_core::Result<Option<PersistedQueue>> {
        Ok(self.get(key).await?)
    }
}
