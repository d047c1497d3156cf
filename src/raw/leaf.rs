use core::borrow::Borrow;
use core::iter::Zip;
use core::slice;

use smallvec::SmallVec;

#[cfg(test)]
pub(crate) const ORDER: usize = 8;
#[cfg(not(test))]
pub(crate) const ORDER: usize = 64;

pub(crate) const MAX_KEYS: usize = ORDER - 1;
pub(crate) const MIN_KEYS: usize = MAX_KEYS.div_ceil(2);

pub(crate) type LeafIter<'a, K, V> = Zip<slice::Iter<'a, K>, slice::Iter<'a, V>>;
pub(crate) type LeafIterMut<'a, K, V> = Zip<slice::Iter<'a, K>, slice::IterMut<'a, V>>;

/// A bounded, sorted run of entries.
///
/// `keys[i]` and `values[i]` always belong to the same entry.
#[derive(Clone)]
pub(crate) struct Leaf<K, V> {
    // +1 leaves room for the entry that triggers a split.
    keys: SmallVec<[K; ORDER]>,
    values: SmallVec<[V; ORDER]>,
}

/// Result of searching for a key in a leaf.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted.
    NotFound(usize),
}

impl<K, V> Leaf<K, V> {
    pub(crate) fn new() -> Self {
        Self {
            keys: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    /// Creates a leaf holding a single entry.
    pub(crate) fn with_entry(key: K, value: V) -> Self {
        let mut leaf = Self::new();
        leaf.push(key, value);
        leaf
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true once the leaf holds more than `MAX_KEYS` entries and must split.
    pub(crate) fn is_overfull(&self) -> bool {
        self.keys.len() > MAX_KEYS
    }

    /// Returns true if this leaf is below minimum occupancy and needs rebalancing.
    pub(crate) fn is_underfull(&self) -> bool {
        self.keys.len() < MIN_KEYS
    }

    /// Returns true if this leaf can give an entry to a neighbour and stay at minimum.
    pub(crate) fn can_lend(&self) -> bool {
        self.keys.len() > MIN_KEYS
    }

    #[cfg(test)]
    pub(crate) fn first_key(&self) -> &K {
        self.keys.first().expect("`Leaf::first_key()` - leaf is empty!")
    }

    pub(crate) fn last_key(&self) -> &K {
        self.keys.last().expect("`Leaf::last_key()` - leaf is empty!")
    }

    #[inline]
    pub(crate) fn key(&self, index: usize) -> &K {
        &self.keys[index]
    }

    #[inline]
    pub(crate) fn value(&self, index: usize) -> &V {
        &self.values[index]
    }

    #[inline]
    pub(crate) fn value_mut(&mut self, index: usize) -> &mut V {
        &mut self.values[index]
    }

    #[cfg(test)]
    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Searches for a key in this leaf.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(idx) => SearchResult::Found(idx),
            Err(idx) => SearchResult::NotFound(idx),
        }
    }

    /// Inserts an entry at the given position.
    pub(crate) fn insert(&mut self, index: usize, key: K, value: V) {
        self.keys.insert(index, key);
        self.values.insert(index, value);
    }

    /// Removes the entry at the given position.
    pub(crate) fn remove(&mut self, index: usize) -> (K, V) {
        let key = self.keys.remove(index);
        let value = self.values.remove(index);
        (key, value)
    }

    pub(crate) fn push(&mut self, key: K, value: V) {
        self.keys.push(key);
        self.values.push(value);
    }

    pub(crate) fn push_front(&mut self, key: K, value: V) {
        self.insert(0, key, value);
    }

    pub(crate) fn pop(&mut self) -> Option<(K, V)> {
        let key = self.keys.pop()?;
        let value = self.values.pop()?;
        Some((key, value))
    }

    pub(crate) fn pop_front(&mut self) -> Option<(K, V)> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.remove(0))
        }
    }

    /// Splits this leaf at the midpoint, keeping the lower half and returning the upper half.
    pub(crate) fn split(&mut self) -> Leaf<K, V> {
        let mid = self.keys.len() / 2;
        Leaf {
            keys: self.keys.drain(mid..).collect(),
            values: self.values.drain(mid..).collect(),
        }
    }

    /// Appends every entry of the right-hand neighbour.
    pub(crate) fn merge_with_right(&mut self, mut right: Leaf<K, V>) {
        self.keys.append(&mut right.keys);
        self.values.append(&mut right.values);
    }

    pub(crate) fn iter(&self) -> LeafIter<'_, K, V> {
        self.keys.iter().zip(self.values.iter())
    }

    pub(crate) fn iter_mut(&mut self) -> LeafIterMut<'_, K, V> {
        self.keys.iter().zip(self.values.iter_mut())
    }

    /// Consumes the leaf, yielding its entries in order.
    pub(crate) fn into_entries(self) -> impl Iterator<Item = (K, V)> {
        self.keys.into_iter().zip(self.values)
    }
}
