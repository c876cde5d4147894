//! Ordered play queue with a cursor
//!
//! The cursor is `None` exactly when the queue is empty; otherwise it always
//! points at a valid entry. Every mutation keeps that invariant.

use crate::shuffle::shuffle_tracks;
use crate::types::Direction;
use tonearm_core::{PersistedQueue, TrackDescriptor};

/// Play queue
///
/// ```text
///   0: Track A
/// > 1: Track B   <- cursor
///   2: Track C
/// ```
///
/// Stepping is circular in both directions: next from the last entry lands on
/// the first, previous from the first lands on the last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Queue {
    tracks: Vec<TrackDescriptor>,
    cursor: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from a persisted blob, clamping a stale cursor
    pub fn from_persisted(persisted: PersistedQueue) -> Self {
        let mut queue = Self::new();
        let start = persisted.cursor.unwrap_or(0);
        queue.replace(persisted.tracks, start);
        queue
    }

    /// Snapshot for the store
    pub fn to_persisted(&self) -> PersistedQueue {
        PersistedQueue {
            tracks: self.tracks.clone(),
            cursor: self.cursor,
        }
    }

    /// Replace the whole queue
    ///
    /// `start_index` is clamped to the last entry.
    pub fn replace(&mut self, tracks: Vec<TrackDescriptor>, start_index: usize) {
        self.cursor = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        self.tracks = tracks;
    }

    /// Append to the end
    pub fn append(&mut self, track: TrackDescriptor) {
        self.tracks.push(track);
        if self.cursor.is_none() {
            self.cursor = Some(0);
        }
    }

    /// Insert right after the cursor
    ///
    /// On an empty queue the track becomes the only entry and the cursor
    /// points at it.
    pub fn insert_next(&mut self, track: TrackDescriptor) {
        match self.cursor {
            Some(cursor) => self.tracks.insert(cursor + 1, track),
            None => {
                self.tracks.push(track);
                self.cursor = Some(0);
            }
        }
    }

    /// Randomize the order and move the cursor to the first entry
    pub fn shuffle(&mut self) {
        shuffle_tracks(&mut self.tracks);
        if !self.tracks.is_empty() {
            self.cursor = Some(0);
        }
    }

    /// Move the cursor one step, wrapping around
    ///
    /// Returns the new cursor, or `None` on an empty queue.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        let len = self.tracks.len();
        let cursor = self.cursor?;
        let next = match direction {
            Direction::Next => (cursor + 1) % len,
            Direction::Previous => (cursor + len - 1) % len,
        };
        self.cursor = Some(next);
        self.cursor
    }

    /// Point the cursor at `index`
    ///
    /// Returns false (and leaves the cursor alone) when `index` is out of range.
    pub fn set_cursor(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.cursor = Some(index);
            true
        } else {
            false
        }
    }

    /// Restore a cursor saved before a failed transition
    pub(crate) fn restore_cursor(&mut self, cursor: Option<usize>) {
        if let Some(index) = cursor {
            self.set_cursor(index);
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Track under the cursor
    pub fn current(&self) -> Option<&TrackDescriptor> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn tracks(&self) -> &[TrackDescriptor] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
