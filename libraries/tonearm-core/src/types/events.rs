use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Unsolicited event raised by a render engine for the handle it was loaded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineEvent {
    /// The loaded source played to its end
    Completed,

    /// A previously issued seek has landed at this position
    SeekCompleted(Duration),
}

/// Focus change delivered by the audio-focus arbiter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusChange {
    /// Focus (re)granted
    Gained,

    /// Another application took the output for a short while
    TransientLoss,

    /// Another application wants the output briefly but allows ducking
    TransientLossCanDuck,

    /// Another application took the output for good
    Loss,
}

/// Callback channel handed to collaborators that raise events asynchronously
///
/// Calling [`EventSink::emit`] never blocks; the receiving side decides how to
/// serialize the event into its own processing loop.
pub struct EventSink<T>(Arc<dyn Fn(T) + Send + Sync>);

impl<T> EventSink<T> {
    /// Wrap a callback
    pub fn new(f: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Deliver an event
    pub fn emit(&self, event: T) {
        (self.0)(event);
    }
}

impl<T> Clone for EventSink<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for EventSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventSink")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn sink_clones_share_the_callback() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let sink = EventSink::new(move |_: EngineEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let other = sink.clone();
        sink.emit(EngineEvent::Completed);
        other.emit(EngineEvent::SeekCompleted(Duration::from_secs(1)));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
