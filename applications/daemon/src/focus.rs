//! Local audio focus
//!
//! A terminal player has nobody to negotiate with, so every request is
//! granted. [`FocusSimulator`] lets the console inject the changes another
//! producer would cause (a phone call, a navigation prompt).

use std::sync::{Arc, Mutex};
use tonearm_core::{EventSink, FocusArbiter, FocusChange, FocusResponse};
use tracing::{debug, info};

type Listener = Arc<Mutex<Option<EventSink<FocusChange>>>>;

/// Focus arbiter that always grants
pub struct LocalFocusArbiter {
    listener: Listener,
}

impl LocalFocusArbiter {
    /// Create the arbiter and the simulator sharing its listener slot
    pub fn new() -> (Self, FocusSimulator) {
        let listener = Listener::default();
        (
            Self {
                listener: Arc::clone(&listener),
            },
            FocusSimulator { listener },
        )
    }
}

impl FocusArbiter for LocalFocusArbiter {
    fn request(&mut self, changes: EventSink<FocusChange>) -> FocusResponse {
        if let Ok(mut slot) = self.listener.lock() {
            *slot = Some(changes);
        }
        debug!("Focus granted");
        FocusResponse::Granted
    }

    fn abandon(&mut self) {
        if let Ok(mut slot) = self.listener.lock() {
            *slot = None;
        }
        debug!("Focus abandoned");
    }
}

/// Injects focus changes into the registered listener
#[derive(Clone)]
pub struct FocusSimulator {
    listener: Listener,
}

impl FocusSimulator {
    /// Deliver `change`; returns `false` when focus isn't currently requested
    pub fn emit(&self, change: FocusChange) -> bool {
        let sink = self.listener.lock().ok().and_then(|slot| slot.clone());
        match sink {
            Some(sink) => {
                info!(?change, "Simulated focus change");
                sink.emit(change);
                true
            }
            None => false,
        }
    }

    pub fn is_registered(&self) -> bool {
        self.listener
            .lock()
            .map(|slot| slot.is_some())
            .unwrap_or(false)
    }
}
