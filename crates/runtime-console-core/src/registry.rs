//! Deduplication registry
//!
//! The registry owns every canonical [`LogEntry`] and keeps them in order of
//! first occurrence. Content-equal arrivals are folded into the existing entry
//! by bumping its repeat count.

use crate::entry::{EntryArena, EntryId, LogEntry, QueuedLogEntry, Timestamp};
use crate::ring_buffer::{Compaction, RingBuffer};
use std::collections::HashMap;
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;

/// Canonical entries in first-occurrence order, with an O(1) content index
#[derive(Debug)]
pub struct LogRegistry {
    arena: EntryArena,
    order: RingBuffer<EntryId>,
    /// Most recent arrival per entry, aligned with `order`
    timestamps: Option<RingBuffer<Timestamp>>,
    /// Content hash -> entries with that hash
    index: HashMap<u64, Vec<EntryId>>,
    hasher: RandomState,
}

impl LogRegistry {
    pub fn new(pool_cap: usize, track_timestamps: bool) -> Self {
        Self {
            arena: EntryArena::new(pool_cap),
            order: RingBuffer::new(),
            timestamps: track_timestamps.then(RingBuffer::new),
            index: HashMap::new(),
            hasher: RandomState::new(),
        }
    }

    /// Fold `raw` into the registry
    ///
    /// Returns the canonical entry and whether it was created by this call.
    pub fn intern_or_bump(&mut self, raw: &QueuedLogEntry) -> (EntryId, bool) {
        let hash = self
            .hasher
            .hash_one((raw.message.as_str(), raw.context.as_str(), raw.severity));

        let existing = self.index.get(&hash).and_then(|bucket| {
            bucket
                .iter()
                .copied()
                .find(|&id| self.arena.get(id).same_content(raw))
        });

        if let Some(id) = existing {
            let entry = self.arena.get_mut(id);
            entry.bump();
            let collapsed_index = entry.collapsed_index();
            if let (Some(timestamps), Some(ts)) = (self.timestamps.as_mut(), raw.timestamp) {
                timestamps[collapsed_index] = ts;
            }
            return (id, false);
        }

        let id = self.arena.allocate(raw, self.order.len(), hash);
        self.order.push(id);
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.push(
                raw.timestamp
                    .expect("registry tracks timestamps but arrival has none"),
            );
        }
        self.index.entry(hash).or_default().push(id);
        (id, true)
    }

    pub fn get(&self, id: EntryId) -> &LogEntry {
        self.arena.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> &mut LogEntry {
        self.arena.get_mut(id)
    }

    /// Number of canonical entries
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in collapsed order
    pub fn ids(&self) -> &RingBuffer<EntryId> {
        &self.order
    }

    /// Entries in collapsed order
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.order.iter().map(|&id| self.arena.get(id))
    }

    /// Most recent arrival time of the entry at `collapsed_index`
    pub fn timestamp(&self, collapsed_index: usize) -> Option<&Timestamp> {
        self.timestamps.as_ref()?.get(collapsed_index)
    }

    pub(crate) fn timestamps(&self) -> Option<&RingBuffer<Timestamp>> {
        self.timestamps.as_ref()
    }

    /// Shells currently waiting in the pool
    pub fn pooled(&self) -> usize {
        self.arena.pooled()
    }

    /// Remove every entry whose repeat count dropped to zero
    ///
    /// Survivors get their `collapsed_index` rewritten, removed entries go
    /// back to the pool. Returns the number of removed entries.
    pub fn compact(&mut self) -> usize {
        let mut compaction = ReleaseUnreferenced {
            arena: &mut self.arena,
            index: &mut self.index,
        };
        let removed = match self.timestamps.as_mut() {
            Some(timestamps) => self.order.remove_all_coupled(timestamps, &mut compaction),
            None => self.order.remove_all(&mut compaction),
        };
        debug_assert_eq!(self.arena.live(), self.order.len());
        removed
    }

    /// Drop every entry and return all shells to the pool
    pub fn clear(&mut self) {
        self.arena.release_all();
        self.order.clear();
        if let Some(timestamps) = self.timestamps.as_mut() {
            timestamps.clear();
        }
        self.index.clear();
    }

    /// Audit the registry invariants
    ///
    /// # Panics
    ///
    /// Panics when collapsed indices are not dense, an entry has a zero
    /// repeat count, or the content index points at a dead entry.
    pub fn assert_consistent(&self) {
        for (position, &id) in self.order.iter().enumerate() {
            let entry = self.arena.get(id);
            assert_eq!(
                entry.collapsed_index(),
                position,
                "collapsed index out of sync"
            );
            assert!(entry.repeat_count() > 0, "registry holds a dead entry");
            assert!(
                self.index
                    .get(&entry.content_hash())
                    .is_some_and(|bucket| bucket.contains(&id)),
                "entry missing from content index"
            );
        }
        let indexed: usize = self.index.values().map(Vec::len).sum();
        assert_eq!(indexed, self.order.len(), "content index has stale handles");
        assert_eq!(self.arena.live(), self.order.len(), "arena leaks entries");
        if let Some(timestamps) = &self.timestamps {
            assert_eq!(timestamps.len(), self.order.len(), "timestamps out of sync");
        }
    }
}

/// Registry compaction: drops zero-count entries and renumbers survivors
struct ReleaseUnreferenced<'a> {
    arena: &'a mut EntryArena,
    index: &'a mut HashMap<u64, Vec<EntryId>>,
}

impl Compaction<EntryId> for ReleaseUnreferenced<'_> {
    fn should_remove(&mut self, id: &EntryId) -> bool {
        self.arena.get(*id).repeat_count() == 0
    }

    fn on_reindexed(&mut self, id: &EntryId, new_index: usize) {
        self.arena.get_mut(*id).set_collapsed_index(new_index);
    }

    fn on_removed(&mut self, id: EntryId) {
        let hash = self.arena.get(id).content_hash();
        if let Some(bucket) = self.index.get_mut(&hash) {
            bucket.retain(|&other| other != id);
            if bucket.is_empty() {
                self.index.remove(&hash);
            }
        }
        self.arena.release(id);
    }
}
