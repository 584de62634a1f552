//! Log entry value types and the entry arena

use crate::severity::Severity;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Stable handle of a [`LogEntry`] inside the registry's arena
///
/// Every view stores handles instead of entries, so all views observe the
/// same repeat count without aliasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u32);

impl EntryId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arrival time of a log event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timestamp {
    /// Local wall clock time at submission
    pub wall_clock: DateTime<Local>,
    /// Seconds since the console was created
    pub monotonic_secs: f64,
    /// Console tick counter at submission
    pub frame: u64,
}

/// Raw arrival record, before deduplication
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedLogEntry {
    pub message: String,
    pub context: String,
    pub severity: Severity,
    pub timestamp: Option<Timestamp>,
}

impl QueuedLogEntry {
    pub fn new(message: impl Into<String>, context: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            context: context.into(),
            severity,
            timestamp: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Canonical, possibly repeated log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    message: String,
    context: String,
    severity: Severity,
    repeat_count: u32,
    collapsed_index: usize,
    content_hash: u64,
}

impl LogEntry {
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Stack trace or other context captured with the message
    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// How many arrivals this entry currently stands for
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// Position of this entry in the registry
    pub fn collapsed_index(&self) -> usize {
        self.collapsed_index
    }

    /// Content equality used for deduplication
    pub fn same_content(&self, raw: &QueuedLogEntry) -> bool {
        self.severity == raw.severity && self.message == raw.message && self.context == raw.context
    }

    pub(crate) fn content_hash(&self) -> u64 {
        self.content_hash
    }

    pub(crate) fn bump(&mut self) {
        self.repeat_count += 1;
    }

    /// Returns the remaining repeat count
    pub(crate) fn drop_repeat(&mut self) -> u32 {
        assert!(self.repeat_count > 0, "repeat count underflow");
        self.repeat_count -= 1;
        self.repeat_count
    }

    pub(crate) fn set_collapsed_index(&mut self, index: usize) {
        self.collapsed_index = index;
    }

    fn empty() -> Self {
        Self {
            message: String::new(),
            context: String::new(),
            severity: Severity::Info,
            repeat_count: 0,
            collapsed_index: 0,
            content_hash: 0,
        }
    }

    /// Overwrite this (pooled) shell with `raw`'s content, reusing its buffers
    fn fill(&mut self, raw: &QueuedLogEntry, collapsed_index: usize, content_hash: u64) {
        self.message.clear();
        self.message.push_str(&raw.message);
        self.context.clear();
        self.context.push_str(&raw.context);
        self.severity = raw.severity;
        self.repeat_count = 1;
        self.collapsed_index = collapsed_index;
        self.content_hash = content_hash;
    }

    fn reset(&mut self) {
        self.message.clear();
        self.context.clear();
        self.repeat_count = 0;
        self.collapsed_index = 0;
        self.content_hash = 0;
    }
}

/// Slot storage for entries plus a bounded pool of recycled shells
///
/// Freed slot indices are reused for new entries. Released shells keep
/// their string capacity so a steady stream of short-lived entries stops
/// allocating once the pool is warm.
#[derive(Debug)]
pub(crate) struct EntryArena {
    slots: Vec<Option<LogEntry>>,
    free_slots: Vec<u32>,
    pool: Vec<LogEntry>,
    pool_cap: usize,
    live: usize,
}

impl EntryArena {
    pub(crate) fn new(pool_cap: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            pool: Vec::with_capacity(pool_cap.min(1024)),
            pool_cap,
            live: 0,
        }
    }

    /// Store a new entry built from `raw`, taking a pooled shell when available
    pub(crate) fn allocate(
        &mut self,
        raw: &QueuedLogEntry,
        collapsed_index: usize,
        content_hash: u64,
    ) -> EntryId {
        let mut entry = self.pool.pop().unwrap_or_else(LogEntry::empty);
        entry.fill(raw, collapsed_index, content_hash);

        self.live += 1;
        match self.free_slots.pop() {
            Some(slot) => {
                debug_assert!(self.slots[slot as usize].is_none());
                self.slots[slot as usize] = Some(entry);
                EntryId(slot)
            }
            None => {
                let slot = u32::try_from(self.slots.len()).expect("entry arena exhausted");
                self.slots.push(Some(entry));
                EntryId(slot)
            }
        }
    }

    pub(crate) fn get(&self, id: EntryId) -> &LogEntry {
        self.slots[id.index()]
            .as_ref()
            .expect("dangling entry handle")
    }

    pub(crate) fn get_mut(&mut self, id: EntryId) -> &mut LogEntry {
        self.slots[id.index()]
            .as_mut()
            .expect("dangling entry handle")
    }

    pub(crate) fn contains(&self, id: EntryId) -> bool {
        self.slots.get(id.index()).is_some_and(Option::is_some)
    }

    /// Free the slot of `id` and return its shell to the pool
    pub(crate) fn release(&mut self, id: EntryId) {
        let entry = self.slots[id.index()]
            .take()
            .expect("entry released twice");
        self.free_slots.push(id.0);
        self.live -= 1;
        self.recycle(entry);
    }

    /// Release every live entry at once
    pub(crate) fn release_all(&mut self) {
        for slot in 0..self.slots.len() {
            if let Some(entry) = self.slots[slot].take() {
                self.recycle(entry);
            }
        }
        self.slots.clear();
        self.free_slots.clear();
        self.live = 0;
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn pooled(&self) -> usize {
        self.pool.len()
    }

    fn recycle(&mut self, mut entry: LogEntry) {
        // Past the cap the shell is simply dropped
        if self.pool.len() < self.pool_cap {
            entry.reset();
            self.pool.push(entry);
        }
    }
}
