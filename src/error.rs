use thiserror::Error;

/// Errors returned by the fallible [`SortedDict`](crate::SortedDict) operations.
///
/// Both conditions are recoverable: callers can check first with
/// [`contains_key`](crate::SortedDict::contains_key) or
/// [`is_empty`](crate::SortedDict::is_empty), or use the `_or` variants that
/// take a fallback value.
///
/// # Examples
///
/// ```
/// use sorted_dict::{Error, SortedDict};
///
/// let mut map: SortedDict<&str, i32> = SortedDict::new();
/// assert_eq!(map.get("a"), Err(Error::KeyNotFound));
/// assert_eq!(map.pop(), Err(Error::EmptyContainer));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The requested key is not in the map and no fallback was supplied.
    #[error("key not found")]
    KeyNotFound,
    /// A removal without a key was attempted on an empty map.
    #[error("map is empty")]
    EmptyContainer,
}

/// Shorthand for results carrying an [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
