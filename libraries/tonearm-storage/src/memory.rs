//! In-memory store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tonearm_core::{PersistedQueue, QueueStore};

/// Queue store that forgets everything on drop
///
/// Used when persistence is disabled and in tests.
#[derive(Debug, Default)]
pub struct MemoryQueueStore {
    entries: RwLock<HashMap<String, PersistedQueue>>,
}

impl MemoryQueueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn save(&self, key: &str, queue: &PersistedQueue) -> tonearm_core::Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), queue.clone());
        Ok(())
    }

    async fn load(&self, key: &str) -> tonearm_core::Result<Option<PersistedQueue>> {
        Ok(self.entries.read().await.get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tonearm_core::TrackDescriptor;

    #[tokio::test]
    async fn keys_are_independent() {
        let store = MemoryQueueStore::new();
        let queue = PersistedQueue::new(vec![TrackDescriptor::new("1", "One", "/1.flac")], Some(0));

        store.save("a", &queue).await.unwrap();

        assert_eq!(store.load("a").await.unwrap(), Some(queue));
        assert_eq!(store.load("b").await.unwrap(), None);
        assert_eq!(store.len().await, 1);
    }
}
