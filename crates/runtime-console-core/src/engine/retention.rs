//! Retention policy
//!
//! As soon as the history exceeds `history_cap`, the oldest entries are
//! evicted from the head in one batch of at least `eviction_batch`. Removal
//! happens in two phases: the history head is dropped and repeat counts are
//! decremented, then the registry (and a collapsed display) are compacted
//! once for the whole batch.

use super::LogConsole;

impl LogConsole {
    /// Evict the oldest history entries if the history exceeds its cap
    ///
    /// Returns the number of evicted history entries.
    pub(super) fn enforce_retention(&mut self) -> usize {
        let surplus = self.config.eviction_count(self.history.len());
        if surplus == 0 {
            return 0;
        }

        let registry = &mut self.registry;
        let filter = &self.filter;
        let totals = &mut self.totals;
        let mut displayed_evictions = 0;
        let mut unreferenced = 0;

        let evicted = self.history.trim_start_with(surplus, |id| {
            let entry = registry.get_mut(id);
            totals.decrement(entry.severity());
            if !filter.collapsed && filter.matches(entry) {
                displayed_evictions += 1;
            }
            if entry.drop_repeat() == 0 {
                unreferenced += 1;
            }
        });
        if let Some(timestamps) = self.history_timestamps.as_mut() {
            timestamps.trim_start(evicted);
        }

        // An expanded display is exactly the filtered history, so the evicted
        // rows are its head.
        if !self.filter.collapsed {
            self.display.trim_start(displayed_evictions);
        } else if unreferenced > 0 {
            self.display.remove_dead(&self.registry);
        }

        // Compaction releases entries, so it must run after the display let go
        let released = if unreferenced > 0 {
            self.registry.compact()
        } else {
            0
        };
        debug_assert_eq!(released, unreferenced);

        log::debug!(
            "Retention evicted {} history entries ({} displayed), released {} unique entries",
            evicted,
            displayed_evictions,
            released
        );
        evicted
    }
}
