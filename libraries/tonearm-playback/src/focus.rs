//! Audio focus bookkeeping
//!
//! The controller owns the [`FocusArbiter`] and tracks what we hold. Focus
//! changes are turned into a [`FocusAction`] that the state machine applies
//! to the engine; the controller itself never touches the engine.

use crate::types::FocusGrant;
use tonearm_core::{EventSink, FocusArbiter, FocusChange, FocusResponse};
use tracing::{debug, info};

/// What the state machine should do in response to a focus change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusAction {
    /// Start rendering at full volume (resume-on-gain was armed)
    Resume,

    /// Back to full volume, keep rendering
    RestoreVolume,

    /// Attenuate to the duck volume
    Duck,

    /// Pause, keeping focus registration (transient loss)
    Pause,

    /// Pause; focus has already been given back
    PauseAndAbandon,

    /// Nothing to do
    Ignore,
}

/// Focus state plus the arbiter it talks to
pub struct FocusController {
    arbiter: Box<dyn FocusArbiter>,
    grant: FocusGrant,
    resume_on_gain: bool,
}

impl FocusController {
    pub fn new(arbiter: Box<dyn FocusArbiter>) -> Self {
        Self {
            arbiter,
            grant: FocusGrant::None,
            resume_on_gain: false,
        }
    }

    pub fn grant(&self) -> FocusGrant {
        self.grant
    }

    /// Whether the next `Gained` should restart rendering
    pub fn resume_on_gain(&self) -> bool {
        self.resume_on_gain
    }

    /// Ask the arbiter for focus
    ///
    /// A delayed grant arms resume-on-gain so rendering starts when the
    /// `Gained` callback arrives.
    pub fn request(&mut self, changes: EventSink<FocusChange>) -> FocusResponse {
        let response = self.arbiter.request(changes);
        match response {
            FocusResponse::Granted => {
                self.grant = FocusGrant::Held;
                self.resume_on_gain = false;
            }
            FocusResponse::Delayed => {
                info!("Audio focus delayed, waiting for grant");
                self.resume_on_gain = true;
            }
            FocusResponse::Denied => {
                self.grant = FocusGrant::None;
                self.resume_on_gain = false;
            }
        }
        response
    }

    /// Give focus back and forget any pending resume
    pub fn abandon(&mut self) {
        if self.grant != FocusGrant::None || self.resume_on_gain {
            debug!("Abandoning audio focus");
        }
        self.arbiter.abandon();
        self.grant = FocusGrant::None;
        self.resume_on_gain = false;
    }

    /// Handle a user pause
    ///
    /// Focus is kept while a resume-on-gain is armed so the pending grant
    /// still reaches us.
    pub fn on_user_pause(&mut self, abandon_on_pause: bool) {
        if abandon_on_pause && !self.resume_on_gain {
            self.abandon();
        }
    }

    /// Translate a focus change into an action
    ///
    /// `rendering` is whether the engine is physically rendering right now.
    pub fn on_change(&mut self, change: FocusChange, rendering: bool) -> FocusAction {
        match change {
            FocusChange::Gained => {
                self.grant = FocusGrant::Held;
                let resume = std::mem::take(&mut self.resume_on_gain);
                if resume && !rendering {
                    FocusAction::Resume
                } else if rendering {
                    FocusAction::RestoreVolume
                } else {
                    FocusAction::Ignore
                }
            }
            FocusChange::TransientLossCanDuck => {
                self.grant = FocusGrant::HeldWithDuckRequest;
                FocusAction::Duck
            }
            FocusChange::TransientLoss => {
                self.grant = FocusGrant::None;
                if rendering {
                    self.resume_on_gain = true;
                    FocusAction::Pause
                } else {
                    FocusAction::Ignore
                }
            }
            FocusChange::Loss => {
                self.abandon();
                FocusAction::PauseAndAbandon
            }
        }
    }
}

impl std::fmt::Debug for FocusController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FocusController")
            .field("grant", &self.grant)
            .field("resume_on_gain", &self.resume_on_gain)
            .finish_non_exhaustive()
    }
}
