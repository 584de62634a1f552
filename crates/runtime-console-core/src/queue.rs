//! Ingestion queue between producer threads and the consumer tick
//!
//! A bounded FIFO guarded by a single mutex. When full, the oldest queued
//! entry is dropped so a burst never starves newer messages.

use crate::entry::QueuedLogEntry;
use crate::ring_buffer::RingBuffer;
use crate::severity::SeverityCounts;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct QueueState {
    items: RingBuffer<QueuedLogEntry>,
    /// Per-category counts of the items currently queued
    pending: SeverityCounts,
    /// Items dropped by the overflow policy since creation or the last clear
    dropped: u64,
}

/// Thread-safe staging area for raw log arrivals
#[derive(Debug)]
pub struct IngestionQueue {
    capacity: usize,
    state: Mutex<QueueState>,
}

impl IngestionQueue {
    /// Create a queue holding at most `capacity` entries
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ingestion queue capacity must be greater than 0");
        Self {
            capacity,
            state: Mutex::new(QueueState {
                items: RingBuffer::with_capacity(capacity.min(4096)),
                pending: SeverityCounts::default(),
                dropped: 0,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append `raw`, evicting the oldest entry first when the queue is full
    ///
    /// Returns `true` when an older entry had to be dropped.
    pub fn enqueue(&self, raw: QueuedLogEntry) -> bool {
        let mut state = self.lock();
        let mut evicted = false;
        if state.items.len() >= self.capacity {
            if let Some(oldest) = state.items.pop_front() {
                state.pending.decrement(oldest.severity);
                state.dropped += 1;
                evicted = true;
            }
        }
        state.pending.increment(raw.severity);
        state.items.push(raw);
        evicted
    }

    /// Move up to `max` entries, oldest first, into `out`
    ///
    /// Returns the per-category counts of exactly the drained entries.
    pub fn drain_into(&self, out: &mut Vec<QueuedLogEntry>, max: usize) -> SeverityCounts {
        let mut state = self.lock();
        let mut drained = SeverityCounts::default();
        let count = max.min(state.items.len());
        out.reserve(count);
        state.items.trim_start_with(count, |raw| {
            drained.increment(raw.severity);
            out.push(raw);
        });
        state.pending.subtract(drained);
        drained
    }

    /// Counts of entries waiting for the next tick
    pub fn pending_counts(&self) -> SeverityCounts {
        self.lock().pending
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// Entries dropped by the overflow policy since the last [`clear`](Self::clear)
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }

    /// Discard every queued entry and reset the counters
    pub fn clear(&self) {
        let mut state = self.lock();
        state.items.clear();
        state.pending = SeverityCounts::default();
        state.dropped = 0;
    }

    // Every critical section leaves the state consistent, so a panic on a
    // producer thread never invalidates it.
    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use std::sync::Arc;
    use std::thread;

    fn raw(message: &str, severity: Severity) -> QueuedLogEntry {
        QueuedLogEntry::new(message, "", severity)
    }

    fn messages(items: &[QueuedLogEntry]) -> Vec<&str> {
        items.iter().map(|raw| raw.message.as_str()).collect()
    }

    #[test]
    fn test_fifo_drain() {
        let queue = IngestionQueue::new(8);
        queue.enqueue(raw("a", Severity::Info));
        queue.enqueue(raw("b", Severity::Warning));
        queue.enqueue(raw("c", Severity::Error));

        let mut out = Vec::new();
        let counts = queue.drain_into(&mut out, 2);
        assert_eq!(messages(&out), vec!["a", "b"]);
        assert_eq!(counts.info, 1);
        assert_eq!(counts.warning, 1);
        assert_eq!(counts.error, 0);

        // The undrained entry is still accounted for
        assert_eq!(queue.pending_counts().error, 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let queue = IngestionQueue::new(2);
        assert!(!queue.enqueue(raw("a", Severity::Error)));
        assert!(!queue.enqueue(raw("b", Severity::Info)));
        assert!(queue.enqueue(raw("c", Severity::Info)));

        assert_eq!(queue.dropped(), 1);
        let pending = queue.pending_counts();
        assert_eq!(pending.error, 0);
        assert_eq!(pending.info, 2);

        let mut out = Vec::new();
        queue.drain_into(&mut out, usize::MAX);
        assert_eq!(messages(&out), vec!["b", "c"]);
        assert!(queue.pending_counts().is_empty());
    }

    #[test]
    fn test_clear_resets_counters() {
        let queue = IngestionQueue::new(1);
        queue.enqueue(raw("a", Severity::Warning));
        queue.enqueue(raw("b", Severity::Warning));
        assert_eq!(queue.dropped(), 1);

        queue.clear();
        assert!(queue.is_empty());
        assert!(queue.pending_counts().is_empty());
        assert_eq!(queue.dropped(), 0);
    }

    #[test]
    fn test_concurrent_producers_lose_nothing_below_capacity() {
        let queue = Arc::new(IngestionQueue::new(10_000));
        let handles: Vec<_> = (0..4)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for i in 0..500 {
                        queue.enqueue(raw(&format!("{producer}-{i}"), Severity::Info));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut out = Vec::new();
        let counts = queue.drain_into(&mut out, usize::MAX);
        assert_eq!(out.len(), 2000);
        assert_eq!(counts.info, 2000);

        // Per-producer order is preserved inside the global order
        for producer in 0..4 {
            let prefix = format!("{producer}-");
            let seq: Vec<usize> = out
                .iter()
                .filter_map(|raw| raw.message.strip_prefix(&prefix))
                .map(|n| n.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..500).collect::<Vec<_>>());
        }
    }
}
