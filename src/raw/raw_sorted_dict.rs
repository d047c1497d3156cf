use alloc::vec::Vec;
use core::borrow::Borrow;

use tracing::trace;

use super::leaf::{Leaf, MAX_KEYS, SearchResult};

/// The ordered storage backing `SortedDict`.
///
/// Entries live in bounded, sorted leaves. The leaves are kept in key order, so
/// a lookup is a binary search over leaves followed by a binary search inside
/// one leaf.
#[derive(Clone)]
pub(crate) struct RawSortedDict<K, V> {
    /// Non-empty leaves in ascending key order.
    leaves: Vec<Leaf<K, V>>,
    /// Total number of entries across all leaves.
    len: usize,
}

impl<K, V> RawSortedDict<K, V> {
    /// Creates new, empty storage.
    pub(crate) const fn new() -> Self {
        Self {
            leaves: Vec::new(),
            len: 0,
        }
    }

    /// Creates empty storage with room for at least `capacity` entries before
    /// the leaf table reallocates.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            leaves: Vec::with_capacity(capacity.div_ceil(MAX_KEYS)),
            len: 0,
        }
    }

    /// Returns the number of entries.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if there are no entries.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drops every entry.
    pub(crate) fn clear(&mut self) {
        self.leaves.clear();
        self.len = 0;
    }

    pub(crate) fn leaves(&self) -> &[Leaf<K, V>] {
        &self.leaves
    }

    pub(crate) fn leaves_mut(&mut self) -> &mut [Leaf<K, V>] {
        &mut self.leaves
    }

    /// Moves every entry out in ascending key order, leaving the storage empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        for leaf in self.leaves.drain(..) {
            result.extend(leaf.into_entries());
        }
        self.len = 0;
        result
    }

    /// Returns the index of the first leaf whose last key is not less than `key`.
    ///
    /// Equals `leaves.len()` when `key` is greater than every stored key.
    fn leaf_index<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.leaves.partition_point(|leaf| leaf.last_key().borrow() < key)
    }

    /// Locates `key`, returning `(leaf index, index within leaf)`.
    pub(crate) fn search<Q>(&self, key: &Q) -> Option<(usize, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let leaf_idx = self.leaf_index(key);
        let leaf = self.leaves.get(leaf_idx)?;
        match leaf.search(key) {
            SearchResult::Found(idx) => Some((leaf_idx, idx)),
            SearchResult::NotFound(_) => None,
        }
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_idx, idx) = self.search(key)?;
        Some(self.leaves[leaf_idx].value(idx))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_idx, idx) = self.search(key)?;
        Some(self.leaves[leaf_idx].value_mut(idx))
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_idx, idx) = self.search(key)?;
        let leaf = &self.leaves[leaf_idx];
        Some((leaf.key(idx), leaf.value(idx)))
    }

    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.search(key).is_some()
    }

    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.leaves.first()?;
        Some((leaf.key(0), leaf.value(0)))
    }

    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let leaf = self.leaves.last()?;
        let idx = leaf.len() - 1;
        Some((leaf.key(idx), leaf.value(idx)))
    }

    /// Inserts an entry, keeping keys sorted.
    /// Returns the old value if the key was already present; the stored key is kept.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        if self.leaves.is_empty() {
            self.leaves.push(Leaf::with_entry(key, value));
            self.len = 1;
            return None;
        }

        // Keys past the last leaf are appended to it.
        let leaf_idx = self.leaf_index(&key).min(self.leaves.len() - 1);
        let leaf = &mut self.leaves[leaf_idx];
        match leaf.search(&key) {
            SearchResult::Found(idx) => Some(core::mem::replace(leaf.value_mut(idx), value)),
            SearchResult::NotFound(idx) => {
                leaf.insert(idx, key, value);
                self.len += 1;
                if leaf.is_overfull() {
                    self.split_leaf(leaf_idx);
                }
                None
            }
        }
    }

    /// Splits an overfull leaf in two, placing the upper half right after it.
    fn split_leaf(&mut self, leaf_idx: usize) {
        let right = self.leaves[leaf_idx].split();
        trace!(leaf = leaf_idx, leaves = self.leaves.len() + 1, "split overfull leaf");
        self.leaves.insert(leaf_idx + 1, right);
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let (leaf_idx, idx) = self.search(key)?;
        Some(self.remove_at(leaf_idx, idx))
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        if self.leaves.is_empty() {
            return None;
        }
        Some(self.remove_at(0, 0))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let leaf_idx = self.leaves.len().checked_sub(1)?;
        let idx = self.leaves[leaf_idx].len() - 1;
        Some(self.remove_at(leaf_idx, idx))
    }

    /// Removes the entry at a known position and restores the leaf invariants.
    fn remove_at(&mut self, leaf_idx: usize, idx: usize) -> (K, V) {
        let leaf = &mut self.leaves[leaf_idx];
        let entry = leaf.remove(idx);
        self.len -= 1;

        if leaf.is_empty() {
            trace!(leaf = leaf_idx, "dropped empty leaf");
            self.leaves.remove(leaf_idx);
        } else if leaf.is_underfull() && self.leaves.len() > 1 {
            self.rebalance_leaf(leaf_idx);
        }
        entry
    }

    /// Rebalances a leaf after a removal caused it to underflow.
    fn rebalance_leaf(&mut self, leaf_idx: usize) {
        // Try to borrow from left neighbour
        if leaf_idx > 0 && self.leaves[leaf_idx - 1].can_lend() {
            if let Some((key, value)) = self.leaves[leaf_idx - 1].pop() {
                self.leaves[leaf_idx].push_front(key, value);
                trace!(leaf = leaf_idx, "borrowed entry from left neighbour");
            }
            return;
        }

        // Try to borrow from right neighbour
        if leaf_idx + 1 < self.leaves.len() && self.leaves[leaf_idx + 1].can_lend() {
            if let Some((key, value)) = self.leaves[leaf_idx + 1].pop_front() {
                self.leaves[leaf_idx].push(key, value);
                trace!(leaf = leaf_idx, "borrowed entry from right neighbour");
            }
            return;
        }

        // Must merge
        if leaf_idx > 0 {
            self.merge_leaves(leaf_idx - 1);
        } else {
            self.merge_leaves(leaf_idx);
        }
    }

    /// Merges the leaf at `left_idx + 1` into the leaf at `left_idx`.
    fn merge_leaves(&mut self, left_idx: usize) {
        let right = self.leaves.remove(left_idx + 1);
        self.leaves[left_idx].merge_with_right(right);
        trace!(leaf = left_idx, leaves = self.leaves.len(), "merged neighbouring leaves");
    }
}
