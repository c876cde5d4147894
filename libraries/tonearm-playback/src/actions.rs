//! Legal-action mask
//!
//! Controllers read the mask from each published snapshot to decide which
//! buttons to enable. The state machine applies the same mask to incoming
//! commands and drops the ones it does not contain.

use crate::types::PlaybackState;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Transport actions a controller may issue in the current state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct PlaybackActions: u32 {
        const PLAY = 1 << 0;
        const PAUSE = 1 << 1;
        const STOP = 1 << 2;
        const SEEK_TO = 1 << 3;
        const SKIP_TO_NEXT = 1 << 4;
        const SKIP_TO_PREVIOUS = 1 << 5;
        const SKIP_TO_QUEUE_ITEM = 1 << 6;
        const PLAY_FROM_CATEGORY = 1 << 7;
        const PREPARE = 1 << 8;
        const SET_REPEAT_MODE = 1 << 9;
        const SET_SHUFFLE_MODE = 1 << 10;

        /// Always legal, whatever the transport state
        const SESSION = Self::SKIP_TO_QUEUE_ITEM.bits()
            | Self::PLAY_FROM_CATEGORY.bits()
            | Self::PREPARE.bits()
            | Self::SET_REPEAT_MODE.bits()
            | Self::SET_SHUFFLE_MODE.bits();

        /// Transport actions while a track is loaded
        const TRANSPORT = Self::STOP.bits()
            | Self::SEEK_TO.bits()
            | Self::SKIP_TO_NEXT.bits()
            | Self::SKIP_TO_PREVIOUS.bits();
    }
}

impl PlaybackActions {
    /// The mask published with a snapshot in `state`
    pub fn for_state(state: PlaybackState) -> Self {
        let transport = match state {
            PlaybackState::Stopped => Self::PLAY,
            PlaybackState::Playing
            | PlaybackState::SkippingNext
            | PlaybackState::SkippingPrevious => Self::PAUSE | Self::TRANSPORT,
            PlaybackState::Paused => Self::PLAY | Self::TRANSPORT,
        };
        transport | Self::SESSION
    }
}
