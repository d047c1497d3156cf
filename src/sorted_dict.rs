use core::borrow::Borrow;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::Index;
use core::slice;

use crate::error::{Error, Result};
use crate::raw::{Leaf, LeafIter, LeafIterMut, RawSortedDict};

mod render;

/// An ordered dictionary: a map whose iteration order is ascending key order,
/// never insertion order.
///
/// Keys must implement [`Ord`]. Lookups, insertions and removals take
/// O(log n) comparisons; entries are stored in bounded, sorted leaves so a
/// traversal touches contiguous memory.
///
/// Two maps compare equal when they hold the same keys with equal values,
/// however they were built. [`Display`](fmt::Display) renders the map as
/// `{k1: v1, k2: v2}` in ascending key order.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the [`Ord`] trait, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the
/// `SortedDict` that observed the logic error and not result in undefined behavior.
///
/// # Examples
///
/// ```
/// use sorted_dict::{Error, SortedDict};
///
/// let mut stock = SortedDict::new();
/// stock.set("pears", 4);
/// stock.set("apples", 12);
/// stock.set("figs", 0);
///
/// // iteration follows key order, not insertion order.
/// let fruit: Vec<_> = stock.keys().copied().collect();
/// assert_eq!(fruit, ["apples", "figs", "pears"]);
///
/// // missing keys are errors unless a fallback is supplied.
/// assert_eq!(stock.get("kiwis"), Err(Error::KeyNotFound));
/// assert_eq!(*stock.get_or("kiwis", &0), 0);
///
/// // `pop` takes the greatest key, `pop_item` the smallest.
/// assert_eq!(stock.pop(), Ok(4));
/// assert_eq!(stock.pop_item(), Ok(("apples", 12)));
///
/// assert_eq!(stock.to_string(), "{figs: 0}");
/// ```
///
/// A `SortedDict` can be seeded from any source of pairs; later duplicates win:
///
/// ```
/// use sorted_dict::SortedDict;
///
/// let map = SortedDict::from([("b", 2), ("a", 1), ("b", 3)]);
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.render(), "{a: 1, b: 3}");
/// ```
///
/// # Iteration and mutation
///
/// Every view ([`iter`](Self::iter), [`keys`](Self::keys), [`values`](Self::values), ...)
/// borrows the map, so the map cannot be mutated while a view is alive:
///
/// ```compile_fail
/// use sorted_dict::SortedDict;
///
/// let mut map = SortedDict::from([(1, "a"), (2, "b")]);
/// for key in map.keys() {
///     map.set(key + 10, "c");
/// }
/// ```
///
/// Collect the keys first when a traversal needs to drive mutations. A view
/// created afterwards reflects the current contents.
pub struct SortedDict<K, V> {
    raw: RawSortedDict<K, V>,
}

/// An iterator over the entries of a `SortedDict`, in ascending key order.
///
/// This `struct` is created by the [`iter`] and [`items`] methods on [`SortedDict`].
///
/// # Examples
///
/// ```
/// use sorted_dict::SortedDict;
///
/// let map = SortedDict::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: SortedDict::iter
/// [`items`]: SortedDict::items
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    leaves: slice::Iter<'a, Leaf<K, V>>,
    front: Option<LeafIter<'a, K, V>>,
    back: Option<LeafIter<'a, K, V>>,
    remaining: usize,
}

/// A mutable iterator over the entries of a `SortedDict`.
///
/// This `struct` is created by the [`iter_mut`] method on [`SortedDict`].
///
/// [`iter_mut`]: SortedDict::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K, V> {
    leaves: slice::IterMut<'a, Leaf<K, V>>,
    front: Option<LeafIterMut<'a, K, V>>,
    back: Option<LeafIterMut<'a, K, V>>,
    remaining: usize,
}

/// An owning iterator over the entries of a `SortedDict`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`SortedDict`]
/// (provided by the [`IntoIterator`] trait).
///
/// # Examples
///
/// ```
/// use sorted_dict::SortedDict;
///
/// let map = SortedDict::from([(2, "b"), (1, "a")]);
/// let entries: Vec<_> = map.into_iter().collect();
/// assert_eq!(entries, [(1, "a"), (2, "b")]);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of a `SortedDict`.
///
/// This `struct` is created by the [`keys`] method on [`SortedDict`].
///
/// [`keys`]: SortedDict::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `SortedDict`, aligned with [`Keys`].
///
/// This `struct` is created by the [`values`] method on [`SortedDict`].
///
/// [`values`]: SortedDict::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of a `SortedDict`.
///
/// This `struct` is created by the [`values_mut`] method on [`SortedDict`].
///
/// [`values_mut`]: SortedDict::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

impl<K, V> SortedDict<K, V> {
    /// Makes a new, empty `SortedDict`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut map = SortedDict::new();
    /// assert_eq!(map.len(), 0);
    /// map.set(1, "a");
    /// ```
    #[must_use]
    pub const fn new() -> SortedDict<K, V> {
        SortedDict {
            raw: RawSortedDict::new(),
        }
    }

    /// Creates an empty map with room for at least `capacity` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map: SortedDict<i32, i32> = SortedDict::with_capacity(1_000);
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> SortedDict<K, V> {
        SortedDict {
            raw: RawSortedDict::with_capacity(capacity),
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut a = SortedDict::from([("a", 1), ("b", 2)]);
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert!(!a.contains_key("a"));
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::{Error, SortedDict};
    ///
    /// let map = SortedDict::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.get("a"), Ok(&1));
    /// assert_eq!(map.get("c"), Err(Error::KeyNotFound));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns the value corresponding to the key, or `fallback` if the key is
    /// not in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([("a", 1), ("b", 2)]);
    /// assert_eq!(*map.get_or("a", &3), 1);
    /// assert_eq!(*map.get_or("c", &3), 3);
    /// ```
    pub fn get_or<'a, Q>(&'a self, key: &Q, fallback: &'a V) -> &'a V
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get(key).unwrap_or(fallback)
    }

    /// Returns the stored key and its value, if the key is in the map.
    ///
    /// Useful for key types where non-identical keys compare equal, since
    /// [`set`](Self::set) keeps the key that was stored first.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut map = SortedDict::from([(1, "a")]);
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([("a", 1)]);
    /// assert!(map.contains_key("a"));
    /// assert!(!map.contains_key("b"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.contains_key(key)
    }

    /// Returns the entry with the smallest key.
    #[allow(clippy::must_use_candidate)]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first_key_value()
    }

    /// Returns the entry with the greatest key.
    #[allow(clippy::must_use_candidate)]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last_key_value()
    }

    /// Sets the value for `key`.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned; the stored key is not updated. Otherwise the
    /// entry is inserted at its sorted position and `None` is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut map = SortedDict::new();
    /// assert_eq!(map.set(37, "a"), None);
    /// assert_eq!(map.set(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// assert_eq!(map.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) comparisons.
    pub fn set(&mut self, key: K, value: V) -> Option<V>
    where
        K: Ord,
    {
        self.raw.insert(key, value)
    }

    /// Removes a key from the map, returning its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is not in the map; the map is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::{Error, SortedDict};
    ///
    /// let mut map = SortedDict::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.delete("b"), Ok(2));
    /// assert_eq!(map.delete("b"), Err(Error::KeyNotFound));
    /// assert_eq!(map, SortedDict::from([("a", 1)]));
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).ok_or(Error::KeyNotFound)
    }

    /// Removes a key from the map, returning its value, or returns `fallback`
    /// without touching the map if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut map = SortedDict::from([("a", 1)]);
    /// assert_eq!(map.delete_or("b", 3), 3);
    /// assert_eq!(map.delete_or("a", 3), 1);
    /// assert!(map.is_empty());
    /// ```
    pub fn delete_or<Q>(&mut self, key: &Q, fallback: V) -> V
    where
        K: Borrow<Q> + Ord,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key).unwrap_or(fallback)
    }

    /// Removes the entry with the greatest key and returns its value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::{Error, SortedDict};
    ///
    /// let mut map = SortedDict::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.pop(), Ok(2));
    /// assert_eq!(map.pop(), Ok(1));
    /// assert_eq!(map.pop(), Err(Error::EmptyContainer));
    /// ```
    pub fn pop(&mut self) -> Result<V> {
        self.raw.pop_last().map(|(_, value)| value).ok_or(Error::EmptyContainer)
    }

    /// Removes the entry with the smallest key and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyContainer`] if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::{Error, SortedDict};
    ///
    /// let mut map = SortedDict::from([("a", 1)]);
    /// assert_eq!(map.pop_item(), Ok(("a", 1)));
    /// assert_eq!(map.pop_item(), Err(Error::EmptyContainer));
    /// ```
    pub fn pop_item(&mut self) -> Result<(K, V)> {
        self.raw.pop_first().ok_or(Error::EmptyContainer)
    }

    /// Removes and returns the entry with the smallest key, if any.
    ///
    /// # Examples
    ///
    /// Draining entries in ascending order, while keeping a usable map each iteration.
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut map = SortedDict::from([(1, "a"), (2, "b")]);
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.keys().all(|k| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the entry with the greatest key, if any.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Sets every pair of `other` into this map, in `other`'s iteration order.
    ///
    /// Existing values are overwritten and new keys are inserted. To update
    /// from a borrowed map, use [`Extend`] with `&other`, which clones the
    /// entries into this map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let mut a = SortedDict::from([("a", 1)]);
    /// a.update([("b", 2), ("a", 10)]);
    /// assert_eq!(a, SortedDict::from([("a", 10), ("b", 2)]));
    ///
    /// let other = SortedDict::from([("c", 3)]);
    /// a.extend(&other);
    /// assert_eq!(a.len(), 3);
    /// assert_eq!(other.len(), 1);
    /// ```
    pub fn update<I>(&mut self, other: I)
    where
        K: Ord,
        I: IntoIterator<Item = (K, V)>,
    {
        for (key, value) in other {
            self.set(key, value);
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([(3, "c"), (2, "b"), (1, "a")]);
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            leaves: self.raw.leaves().iter(),
            front: None,
            back: None,
            remaining: self.raw.len(),
        }
    }

    /// Gets the `(key, value)` pairs of the map in ascending key order.
    ///
    /// Same as [`iter`](Self::iter).
    pub fn items(&self) -> Iter<'_, K, V> {
        self.iter()
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let remaining = self.raw.len();
        IterMut {
            leaves: self.raw.leaves_mut().iter_mut(),
            front: None,
            back: None,
            remaining,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([("b", 2), ("a", 1)]);
    /// let keys: Vec<_> = map.keys().copied().collect();
    /// assert_eq!(keys, ["a", "b"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([("b", 1), ("a", 2)]);
    /// let values: Vec<_> = map.values().copied().collect();
    /// assert_eq!(values, [2, 1]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { inner: self.iter_mut() }
    }
}

impl<K: Clone, V: Clone> Clone for SortedDict<K, V> {
    fn clone(&self) -> Self {
        SortedDict {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash> Hash for SortedDict<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

// Both sides are sorted, so equal key sets line up position by position.
impl<K: PartialEq, V: PartialEq> PartialEq for SortedDict<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for SortedDict<K, V> {}

impl<K, V> Default for SortedDict<K, V> {
    fn default() -> Self {
        SortedDict::new()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for SortedDict<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SortedDict::new();
        map.update(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for SortedDict<K, V> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        self.update(iter);
    }
}

impl<'a, K: Ord + Clone, V: Clone> Extend<(&'a K, &'a V)> for SortedDict<K, V> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        self.update(iter.into_iter().map(|(k, v)| (k.clone(), v.clone())));
    }
}

impl<'a, K, V> IntoIterator for &'a SortedDict<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut SortedDict<K, V> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V> IntoIterator for SortedDict<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, Q, V> Index<&Q> for SortedDict<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `SortedDict`.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SortedDict<K, V> {
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.front.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            match self.leaves.next() {
                Some(leaf) => self.front = Some(leaf.iter()),
                None => {
                    // Only the leaf already opened from the back is left.
                    let entry = self.back.as_mut().and_then(Iterator::next)?;
                    self.remaining -= 1;
                    return Some(entry);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                self.remaining -= 1;
                return Some(entry);
            }
            match self.leaves.next_back() {
                Some(leaf) => self.back = Some(leaf.iter()),
                None => {
                    let entry = self.front.as_mut().and_then(DoubleEndedIterator::next_back)?;
                    self.remaining -= 1;
                    return Some(entry);
                }
            }
        }
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `sorted_dict::Iter`.
    ///
    /// ```
    /// # use sorted_dict::sorted_dict;
    /// let iter: sorted_dict::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            leaves: <&[Leaf<K, V>]>::default().iter(),
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            leaves: self.leaves.clone(),
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.front.as_mut().and_then(Iterator::next) {
                self.remaining -= 1;
                return Some(entry);
            }
            match self.leaves.next() {
                Some(leaf) => self.front = Some(leaf.iter_mut()),
                None => {
                    let entry = self.back.as_mut().and_then(Iterator::next)?;
                    self.remaining -= 1;
                    return Some(entry);
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entry) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                self.remaining -= 1;
                return Some(entry);
            }
            match self.leaves.next_back() {
                Some(leaf) => self.back = Some(leaf.iter_mut()),
                None => {
                    let entry = self.front.as_mut().and_then(DoubleEndedIterator::next_back)?;
                    self.remaining -= 1;
                    return Some(entry);
                }
            }
        }
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<(K, V)> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<(K, V)> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}
