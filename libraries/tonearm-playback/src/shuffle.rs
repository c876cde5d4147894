//! Queue randomization

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng};
use tonearm_core::TrackDescriptor;

/// Shuffle tracks in place (Fisher-Yates)
///
/// Every permutation is equally likely.
pub fn shuffle_tracks(tracks: &mut [TrackDescriptor]) {
    shuffle_tracks_with(tracks, &mut thread_rng());
}

/// Shuffle tracks with a caller-provided RNG
pub fn shuffle_tracks_with<R: Rng + ?Sized>(tracks: &mut [TrackDescriptor], rng: &mut R) {
    tracks.shuffle(rng);
}
