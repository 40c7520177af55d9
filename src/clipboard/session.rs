//! Counters owned by the current editing session.

use bevy::prelude::*;

use super::item::ClipboardItem;

/// Resource owning the clipboard counters.
///
/// Every clipboard item gets its sequence index from here. The reclone and
/// discard counts are diagnostics only; nothing depends on them.
#[derive(Resource, Debug, Default)]
pub struct ClipboardSession {
    last_sequence: u64,
    reclone_count: u64,
    discard_count: u64,
}

impl ClipboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequence index. Starts at 1; 0 marks an item that did not come
    /// from a session.
    pub fn next_sequence(&mut self) -> u64 {
        self.last_sequence += 1;
        self.last_sequence
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    pub(crate) fn note_reclone(&mut self) {
        self.reclone_count += 1;
    }

    pub fn reclone_count(&self) -> u64 {
        self.reclone_count
    }

    /// Drop an item that is no longer referenced by the editor
    pub fn discard(&mut self, item: ClipboardItem) {
        self.discard_count += 1;
        debug!(
            "Discarded clipboard item #{} ({:?}), {} discarded this session",
            item.sequence_index(),
            item.variety(),
            self.discard_count
        );
    }

    pub fn discard_count(&self) -> u64 {
        self.discard_count
    }

    /// Start a new session: all counters back to zero
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
