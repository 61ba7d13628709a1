//! Releases out-of-order completions in window order.

use std::collections::BTreeMap;

/// Buffers items keyed by sequence index and releases them strictly in order.
///
/// An item is only released once every lower index has been released.
#[derive(Debug)]
pub struct ReorderBuffer<T> {
    next: usize,
    pending: BTreeMap<usize, T>,
}

impl<T> Default for ReorderBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ReorderBuffer<T> {
    /// Creates an empty buffer expecting index 0 first.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: 0,
            pending: BTreeMap::new(),
        }
    }

    /// Stores an item. Items whose index was already released are dropped.
    ///
    /// Returns false if the item was dropped.
    pub fn insert(&mut self, index: usize, item: T) -> bool {
        if index < self.next || self.pending.contains_key(&index) {
            return false;
        }
        self.pending.insert(index, item);
        true
    }

    /// Removes and returns the next in-order item, if it has arrived.
    pub fn pop_ready(&mut self) -> Option<T> {
        let item = self.pending.remove(&self.next)?;
        self.next += 1;
        Some(item)
    }

    /// Drains every item that can currently be released.
    pub fn drain_ready(&mut self) -> impl Iterator<Item = T> + '_ {
        std::iter::from_fn(move || self.pop_ready())
    }

    /// Index the buffer is waiting for.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.next
    }

    /// Number of items held back waiting for an earlier index.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is held back.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn in_order_items_release_immediately() {
        let mut buffer = ReorderBuffer::new();
        assert!(buffer.insert(0, "a"));
        assert_eq!(buffer.pop_ready(), Some("a"));
        assert!(buffer.insert(1, "b"));
        assert_eq!(buffer.pop_ready(), Some("b"));
        assert!(buffer.is_empty());
    }

    #[test]
    fn later_items_wait_for_gap() {
        let mut buffer = ReorderBuffer::new();
        buffer.insert(2, "c");
        buffer.insert(1, "b");
        assert_eq!(buffer.pop_ready(), None);
        assert_eq!(buffer.pending_len(), 2);

        buffer.insert(0, "a");
        let released: Vec<_> = buffer.drain_ready().collect();
        assert_eq!(released, vec!["a", "b", "c"]);
        assert_eq!(buffer.next_index(), 3);
    }

    #[test]
    fn stale_and_duplicate_indices_are_dropped() {
        let mut buffer = ReorderBuffer::new();
        buffer.insert(0, 10);
        assert_eq!(buffer.pop_ready(), Some(10));
        assert!(!buffer.insert(0, 11));
        assert!(buffer.insert(3, 30));
        assert!(!buffer.insert(3, 31));
        assert_eq!(buffer.pending_len(), 1);
    }

    proptest! {
        #[test]
        fn prop_any_arrival_order_releases_sorted(
            order in Just((0..32usize).collect::<Vec<_>>()).prop_shuffle()
        ) {
            let mut buffer = ReorderBuffer::new();
            let mut released = Vec::new();
            for index in order {
                buffer.insert(index, index);
                released.extend(buffer.drain_ready());
            }
            prop_assert_eq!(released, (0..32usize).collect::<Vec<_>>());
            prop_assert!(buffer.is_empty());
        }
    }
}
