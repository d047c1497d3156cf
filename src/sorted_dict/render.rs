use alloc::string::{String, ToString};
use core::fmt;

use super::SortedDict;

impl<K: fmt::Display, V: fmt::Display> SortedDict<K, V> {
    /// Renders the map as `{k1: v1, k2: v2}` in ascending key order, using the
    /// [`Display`](fmt::Display) form of each key and value. An empty map
    /// renders as `{}`.
    ///
    /// Equivalent to `to_string()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sorted_dict::SortedDict;
    ///
    /// let map = SortedDict::from([("b", 2), ("a", 1)]);
    /// assert_eq!(map.render(), "{a: 1, b: 2}");
    /// assert_eq!(SortedDict::<i32, i32>::new().render(), "{}");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for SortedDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Quotes keys and values the way `Debug` does: `{"a": 1, "b": 2}`.
impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for SortedDict<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
