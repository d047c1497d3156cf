mod leaf;
mod raw_sorted_dict;

pub(crate) use leaf::{Leaf, LeafIter, LeafIterMut};
pub(crate) use raw_sorted_dict::RawSortedDict;
