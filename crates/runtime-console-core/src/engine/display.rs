//! The "entries to show" view and its read-only accessor

use crate::entry::{EntryId, LogEntry, Timestamp};
use crate::registry::LogRegistry;
use crate::ring_buffer::{Compaction, RingBuffer};

/// Filtered entries in display order, with index-aligned timestamps
#[derive(Debug)]
pub(crate) struct DisplayView {
    pub(crate) ids: RingBuffer<EntryId>,
    pub(crate) timestamps: Option<RingBuffer<Timestamp>>,
}

impl DisplayView {
    pub(crate) fn new(track_timestamps: bool) -> Self {
        Self {
            ids: RingBuffer::new(),
            timestamps: track_timestamps.then(RingBuffer::new),
        }
    }

    pub(crate) fn push(&mut self, id: EntryId, timestamp: Option<Timestamp>) {
        self.ids.push(id);
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.push(timestamp.expect("display tracks timestamps but entry has none"));
        }
    }

    pub(crate) fn trim_start(&mut self, count: usize) {
        let removed = self.ids.trim_start(count);
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.trim_start(removed);
        }
    }

    /// Drop entries whose repeat count reached zero
    pub(crate) fn remove_dead(&mut self, registry: &LogRegistry) -> usize {
        let mut compaction = RemoveDead { registry };
        match self.timestamps.as_mut() {
            Some(timestamps) => self.ids.remove_all_coupled(timestamps, &mut compaction),
            None => self.ids.remove_all(&mut compaction),
        }
    }

    /// Position of a collapsed entry, relying on display order following
    /// collapsed order
    pub(crate) fn position_of_collapsed(
        &self,
        registry: &LogRegistry,
        collapsed_index: usize,
    ) -> Option<usize> {
        self.ids
            .binary_search_by(|&id| registry.get(id).collapsed_index().cmp(&collapsed_index))
            .ok()
    }

    pub(crate) fn clear(&mut self) {
        self.ids.clear();
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.clear();
        }
    }
}

struct RemoveDead<'a> {
    registry: &'a LogRegistry,
}

impl Compaction<EntryId> for RemoveDead<'_> {
    fn should_remove(&mut self, id: &EntryId) -> bool {
        self.registry.get(*id).repeat_count() == 0
    }
}

/// Read-only view of the display entries
///
/// Borrowed from the console, so it is only valid until the next mutation.
#[derive(Debug, Clone, Copy)]
pub struct DisplayRef<'a> {
    view: &'a DisplayView,
    registry: &'a LogRegistry,
}

impl<'a> DisplayRef<'a> {
    pub(crate) fn new(view: &'a DisplayView, registry: &'a LogRegistry) -> Self {
        Self { view, registry }
    }

    pub fn len(&self) -> usize {
        self.view.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.view.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a LogEntry> {
        let registry = self.registry;
        self.view.ids.get(index).map(|&id| registry.get(id))
    }

    /// Handle of the entry at `index`
    pub fn id(&self, index: usize) -> Option<EntryId> {
        self.view.ids.get(index).copied()
    }

    /// Arrival time shown for the row at `index`
    ///
    /// In collapsed mode this is the most recent arrival of the entry.
    pub fn timestamp(&self, index: usize) -> Option<&'a Timestamp> {
        self.view.timestamps.as_ref()?.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a LogEntry> + 'a {
        let registry = self.registry;
        self.view.ids.iter().map(move |&id| registry.get(id))
    }

    /// Messages in display order
    pub fn messages(&self) -> Vec<&'a str> {
        self.iter().map(LogEntry::message).collect()
    }
}
