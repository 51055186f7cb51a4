//! The sorted token array every ring is stored in.
//!
//! Entries are ordered by token value, and entries with equal values by
//! owner. Mutations (`add`, `remove_if`) don't keep the order; callers batch
//! them and call [`RingStore::sort`] once before the next lookup, so a bulk
//! rebalance costs one sort instead of one per insertion.

use medley::{MedleyError, Result};

/// One point on the ring: a token value and the node or service owning it.
///
/// The derived ordering compares `value` first and `node` second, which is
/// exactly the ring order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashEntry<N> {
    pub value: u64,
    pub node: N,
}

/// A circle of hash entries.
#[derive(Debug, Clone)]
pub struct RingStore<N> {
    entries: Vec<HashEntry<N>>,
}

impl<N: Ord> RingStore<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Ensure room for `n` more entries without changing the length.
    ///
    /// When the spare capacity is too small the new capacity is at least
    /// `2 * capacity + n`, which bounds the copying done across repeated
    /// growth.
    pub fn grow(&mut self, n: usize) {
        let spare = self.entries.capacity() - self.entries.len();
        if spare < n {
            let target = 2 * self.entries.capacity() + n;
            self.entries.reserve_exact(target - self.entries.len());
        }
    }

    /// Append an entry. The ring is not re-sorted.
    pub fn add(&mut self, node: N, value: u64) {
        self.entries.push(HashEntry { value, node });
    }

    /// Delete every entry whose node matches the predicate, returning how
    /// many went. Matches are swapped to the tail and truncated away, so the
    /// ring is left unsorted.
    pub fn remove_if<P>(&mut self, mut predicate: P) -> usize
    where
        P: FnMut(&N) -> bool,
    {
        let before = self.entries.len();
        let mut pos = 0;
        let mut end = before;
        while pos < end {
            if predicate(&self.entries[pos].node) {
                end -= 1;
                self.entries.swap(pos, end);
            } else {
                pos += 1;
            }
        }

        self.entries.truncate(end);
        before - end
    }

    /// Restore ring order. Required after any batch of `add` or `remove_if`
    /// and before the next lookup.
    pub fn sort(&mut self) {
        self.entries.sort_unstable();
    }

    pub fn is_sorted(&self) -> bool {
        self.entries.windows(2).all(|w| w[0] <= w[1])
    }

    /// The node owning the first entry at or clockwise from `value`.
    ///
    /// When `value` is past the largest token the search wraps around to
    /// the first entry, which is the smallest token, owned by the lowest
    /// ordered node if several share it.
    pub fn closest(&self, value: u64) -> Result<&N> {
        let first = self.entries.first().ok_or(MedleyError::NoServices)?;
        let p = self.entries.partition_point(|e| e.value < value);
        Ok(self.entries.get(p).map_or(&first.node, |e| &e.node))
    }

    pub fn entries(&self) -> &[HashEntry<N>] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<N: Ord> Default for RingStore<N> {
    fn default() -> Self {
        Self::new()
    }
}
