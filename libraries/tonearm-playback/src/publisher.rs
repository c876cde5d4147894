//! Session publisher
//!
//! Fans session updates out to any number of observers over a bounded
//! broadcast channel. A slow observer loses its oldest unread updates, never
//! the newest, and never slows the state machine down.

use crate::events::{SessionUpdate, StateSnapshot};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::warn;

/// Publishing side, owned by the state machine
#[derive(Debug)]
pub struct SessionPublisher {
    sender: broadcast::Sender<SessionUpdate>,
    latest: Option<StateSnapshot>,
}

impl SessionPublisher {
    /// Create a publisher buffering `capacity` updates per observer
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            latest: None,
        }
    }

    /// Send an update to every current observer
    pub fn publish(&mut self, update: SessionUpdate) {
        if let SessionUpdate::State(snapshot) = &update {
            self.latest = Some(snapshot.clone());
        }
        // No observers is fine
        let _ = self.sender.send(update);
    }

    /// Most recently published snapshot
    pub fn latest(&self) -> Option<&StateSnapshot> {
        self.latest.as_ref()
    }

    /// Sender used by handles to open new subscriptions
    pub fn sender(&self) -> broadcast::Sender<SessionUpdate> {
        self.sender.clone()
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription::new(self.sender.subscribe())
    }
}

/// Receiving side for one observer
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<SessionUpdate>,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<SessionUpdate>) -> Self {
        Self { receiver }
    }

    /// Wait for the next update
    ///
    /// Returns `None` once the session is gone. Overflow is logged and
    /// skipped.
    pub async fn recv(&mut self) -> Option<SessionUpdate> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session observer fell behind, dropped oldest updates");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered update, without waiting
    pub fn try_recv(&mut self) -> Option<SessionUpdate> {
        loop {
            match self.receiver.try_recv() {
                Ok(update) => return Some(update),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Session observer fell behind, dropped oldest updates");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }

    /// Drain every buffered update
    pub fn drain(&mut self) -> Vec<SessionUpdate> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}
