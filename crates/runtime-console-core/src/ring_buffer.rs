//! Growable ring buffer
//!
//! [`RingBuffer`] is the backing container for every log view. It supports
//! amortized O(1) appends at the tail, O(1) removal from the head, O(1)
//! random access and batched compaction through a [`Compaction`] strategy.
//!
//! ```
//! use runtime_console_core::RingBuffer;
//!
//! let mut buffer = RingBuffer::new();
//! buffer.extend([1, 2, 3, 4, 5]);
//! buffer.trim_start(2);
//! assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
//!
//! buffer.remove_where(|n| n % 2 == 0);
//! assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), vec![3, 5]);
//! ```

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::collections::vec_deque;
use std::ops::{Index, IndexMut};

/// Strategy for [`RingBuffer::remove_all`]
///
/// Keeps the removal policy out of the buffer type: the buffer only moves
/// elements around and reports what happened.
pub trait Compaction<T> {
    /// Whether `item` should be removed
    fn should_remove(&mut self, item: &T) -> bool;

    /// Called for every retained item whose index changed
    fn on_reindexed(&mut self, _item: &T, _new_index: usize) {}

    /// Receives ownership of every removed item
    fn on_removed(&mut self, _item: T) {}
}

/// [`Compaction`] built from a plain predicate
struct RemoveWhere<P>(P);

impl<T, P: FnMut(&T) -> bool> Compaction<T> for RemoveWhere<P> {
    fn should_remove(&mut self, item: &T) -> bool {
        (self.0)(item)
    }
}

/// Ordered, index-addressable sequence with cheap head removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingBuffer<T> {
    items: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allocated capacity (grows, never shrinks on `clear`)
    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn push(&mut self, item: T) {
        self.items.push_back(item);
    }

    /// Append every item of `items` in order
    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        self.items.extend(items);
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    /// Replace the item at `index`, returning the previous one
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set(&mut self, index: usize, item: T) -> T {
        std::mem::replace(&mut self.items[index], item)
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Position of the first item matching `predicate`
    pub fn index_of(&self, predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items.iter().position(predicate)
    }

    /// Binary search over a buffer sorted consistently with `f`
    pub fn binary_search_by(&self, f: impl FnMut(&T) -> Ordering) -> Result<usize, usize> {
        self.items.binary_search_by(f)
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.items.iter()
    }

    /// Remove up to `count` items from the head, dropping them
    ///
    /// Returns the number of items actually removed.
    pub fn trim_start(&mut self, count: usize) -> usize {
        self.trim_start_with(count, drop)
    }

    /// Remove up to `count` items from the head, handing each to `on_removed`
    /// in order
    pub fn trim_start_with(&mut self, count: usize, mut on_removed: impl FnMut(T)) -> usize {
        let count = count.min(self.items.len());
        for item in self.items.drain(..count) {
            on_removed(item);
        }
        count
    }

    /// Remove every item selected by `compaction`, preserving the relative
    /// order of the survivors
    ///
    /// Returns the number of removed items.
    pub fn remove_all<C: Compaction<T>>(&mut self, compaction: &mut C) -> usize {
        let keep = self.compact_front(compaction, |_, _| {});
        self.drain_removed(keep, compaction)
    }

    /// Like [`remove_all`](Self::remove_all), additionally removing the
    /// index-aligned element of `coupled` for every removed item
    ///
    /// # Panics
    ///
    /// Panics if the two buffers differ in length.
    pub fn remove_all_coupled<U, C: Compaction<T>>(
        &mut self,
        coupled: &mut RingBuffer<U>,
        compaction: &mut C,
    ) -> usize {
        assert_eq!(
            self.items.len(),
            coupled.items.len(),
            "coupled ring buffers must stay index-aligned"
        );

        let keep = self.compact_front(compaction, |read, write| coupled.items.swap(read, write));
        coupled.items.truncate(keep);
        self.drain_removed(keep, compaction)
    }

    /// Remove every item matching `predicate`
    pub fn remove_where(&mut self, predicate: impl FnMut(&T) -> bool) -> usize {
        self.remove_all(&mut RemoveWhere(predicate))
    }

    /// Reset the length to zero, keeping the allocation
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Move survivors to the front, returning how many there are
    ///
    /// `on_move(read, write)` mirrors every swap so a coupled buffer can follow.
    fn compact_front<C: Compaction<T>>(
        &mut self,
        compaction: &mut C,
        mut on_move: impl FnMut(usize, usize),
    ) -> usize {
        let mut write = 0;
        for read in 0..self.items.len() {
            if compaction.should_remove(&self.items[read]) {
                continue;
            }
            if read != write {
                self.items.swap(read, write);
                on_move(read, write);
                compaction.on_reindexed(&self.items[write], write);
            }
            write += 1;
        }
        write
    }

    fn drain_removed<C: Compaction<T>>(&mut self, keep: usize, compaction: &mut C) -> usize {
        let removed = self.items.len() - keep;
        for item in self.items.drain(keep..) {
            compaction.on_removed(item);
        }
        removed
    }
}

impl<T> Default for RingBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for RingBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for RingBuffer<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T> Extend<T> for RingBuffer<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> FromIterator<T> for RingBuffer<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a RingBuffer<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
