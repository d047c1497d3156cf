use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use sorted_dict::{Error, SortedDict, sorted_dict as views};
use static_assertions::assert_impl_all;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

assert_impl_all!(SortedDict<String, String>: Send, Sync, Clone, Default);
assert_impl_all!(views::Iter<'static, String, String>: Send, Sync, Clone, ExactSizeIterator);
assert_impl_all!(views::IntoIter<String, String>: Send, Sync, DoubleEndedIterator);
assert_impl_all!(Error: std::error::Error, Send, Sync, Copy);

/// Keys drawn from a range smaller than `TEST_SIZE` so inserts collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn new_map_is_empty() {
    let map: SortedDict<&str, i32> = SortedDict::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map, SortedDict::default());
}

#[test]
fn seeded_map_equals_incrementally_built_map() {
    let seeded = SortedDict::from([("a", 1), ("b", 2)]);
    assert_eq!(seeded.len(), 2);

    let mut built = SortedDict::new();
    assert_ne!(built, seeded);
    built.set("a", 1);
    built.set("b", 2);
    assert_eq!(built, seeded);
}

#[test]
fn seed_duplicates_collapse_to_last_value() {
    let map: SortedDict<&str, i32> = vec![("a", 1), ("b", 2), ("a", 3)].into_iter().collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("a"), Ok(&3));
}

#[test]
fn get_with_and_without_fallback() {
    let map = SortedDict::from([("a", 1), ("b", 2)]);
    assert_eq!(map.get("a"), Ok(&1));
    assert_eq!(map["b"], 2);
    assert_eq!(map.get("c"), Err(Error::KeyNotFound));
    assert_eq!(*map.get_or("c", &3), 3);
    assert_eq!(*map.get_or("a", &3), 1);
    assert_eq!(map.get_key_value("b"), Some((&"b", &2)));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_missing_key_panics() {
    let map = SortedDict::from([("a", 1)]);
    let _value = map["c"];
}

#[test]
fn contains_key_never_fails() {
    let map = SortedDict::from([("a", 1)]);
    assert!(map.contains_key("a"));
    assert!(!map.contains_key("b"));
    assert!(!SortedDict::<&str, i32>::new().contains_key("a"));
}

#[test]
fn set_overwrites_in_place() {
    let mut map = SortedDict::from([(1, "one"), (2, "two"), (3, "three")]);
    assert_eq!(map.set(2, "deux"), Some("two"));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), ["one", "deux", "three"]);
    assert_eq!(map.len(), 3);
}

#[test]
fn delete_returns_value_and_shrinks() {
    let mut map = SortedDict::from([("a", 1), ("b", 2)]);
    assert_eq!(map.delete("b"), Ok(2));
    assert_eq!(map, SortedDict::from([("a", 1)]));
    assert!(!map.contains_key("b"));
    assert_eq!(map.get("b"), Err(Error::KeyNotFound));
    assert_eq!(map.delete("b"), Err(Error::KeyNotFound));
}

#[test]
fn delete_with_fallback_does_not_mutate() {
    let mut map = SortedDict::from([("a", 1)]);
    assert_eq!(map.delete_or("b", 3), 3);
    assert_eq!(map.len(), 1);
    assert_eq!(map.delete_or("a", 3), 1);
    assert!(map.is_empty());
}

#[test]
fn pop_greatest_then_pop_item_smallest() {
    let mut map = SortedDict::from([("a", 1), ("b", 2)]);
    assert_eq!(map.pop(), Ok(2));
    assert_eq!(map, SortedDict::from([("a", 1)]));
    assert_eq!(map.pop_item(), Ok(("a", 1)));
    assert!(map.is_empty());
    assert_eq!(map.pop(), Err(Error::EmptyContainer));
    assert_eq!(map.pop_item(), Err(Error::EmptyContainer));
}

#[test]
fn update_overwrites_and_extends() {
    let mut map = SortedDict::from([("a", 1)]);
    map.update(SortedDict::from([("b", 2)]));
    assert_eq!(map, SortedDict::from([("a", 1), ("b", 2)]));

    map.update([("a", 10), ("c", 3), ("a", 11)]);
    assert_eq!(map.render(), "{a: 11, b: 2, c: 3}");
}

#[test]
fn extend_from_borrowed_map_copies_values() {
    let source = SortedDict::from([(1, String::from("one")), (2, String::from("two"))]);
    let mut target = SortedDict::from([(2, String::from("zwei")), (3, String::from("drei"))]);
    target.extend(&source);

    target.get_mut(&1).unwrap().push('!');
    assert_eq!(target.render(), "{1: one!, 2: two, 3: drei}");
    assert_eq!(source.render(), "{1: one, 2: two}");
}

#[test]
fn clear_drops_everything() {
    let mut map = SortedDict::from([("a", 1), ("b", 2)]);
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(!map.contains_key("a"));
    assert!(!map.contains_key("b"));
    assert_eq!(map.render(), "{}");
}

#[test]
fn keys_values_items_align() {
    let map = SortedDict::from([("b", 1), ("a", 2)]);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
    assert_eq!(map.values().copied().collect::<Vec<_>>(), [2, 1]);
    assert_eq!(map.items().map(|(k, v)| (*k, *v)).collect::<Vec<_>>(), [("a", 2), ("b", 1)]);
}

#[test]
fn iteration_restarts_and_follows_key_order() {
    let map = SortedDict::from([("a", 1), ("b", 2)]);
    let mut expected = 1;
    for key in map.keys() {
        assert_eq!(map[key], expected);
        expected += 1;
    }
    assert_eq!(map.keys().count(), 2);
    assert_eq!(map.keys().count(), 2);
}

#[test]
fn views_reflect_contents_at_creation() {
    let mut map = SortedDict::from([(1, 'a'), (2, 'b')]);
    let snapshot: Vec<i32> = map.keys().copied().collect();
    map.set(0, 'z');
    map.delete(&2).unwrap();
    assert_eq!(snapshot, [1, 2]);
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [0, 1]);
}

#[test]
fn render_is_sorted_regardless_of_insertion_order() {
    let mut map = SortedDict::new();
    map.set("b", 2);
    map.set("a", 1);
    assert_eq!(map.render(), "{a: 1, b: 2}");
    assert_eq!(format!("{map:?}"), r#"{"a": 1, "b": 2}"#);
}

#[test]
fn clone_is_independent() {
    let original = SortedDict::from([(1, vec![1]), (2, vec![2])]);
    let mut copy = original.clone();
    copy.get_mut(&1).unwrap().push(10);
    copy.set(3, vec![3]);

    assert_eq!(original.len(), 2);
    assert_eq!(original[&1], [1]);
    assert_eq!(copy[&1], [1, 10]);
}

#[test]
fn unequal_maps() {
    let base = SortedDict::from([("a", 1), ("b", 2)]);
    assert_ne!(base, SortedDict::from([("a", 1), ("b", 2), ("c", 3)]));
    assert_ne!(base, SortedDict::from([("a", 1), ("b", 3)]));
    assert_ne!(base, SortedDict::from([("a", 1), ("c", 2)]));
}

#[test]
fn first_and_last_entries() {
    let mut map: SortedDict<i32, i32> = (0..100).map(|k| (k, -k)).collect();
    assert_eq!(map.first_key_value(), Some((&0, &0)));
    assert_eq!(map.last_key_value(), Some((&99, &-99)));
    assert_eq!(map.pop_first(), Some((0, 0)));
    assert_eq!(map.pop_last(), Some((99, -99)));
    assert_eq!(map.len(), 98);
}

#[test]
fn borrowed_string_keys() {
    let mut map: SortedDict<String, usize> = SortedDict::new();
    for word in ["pear", "apple", "fig"] {
        map.set(word.to_string(), word.len());
    }
    assert_eq!(map.get("fig"), Ok(&3));
    assert_eq!(map.delete("pear"), Ok(4));
    assert_eq!(map.render(), "{apple: 5, fig: 3}");
}

// ─── Model tests ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Set(i64, i64),
    Delete(i64),
    DeleteOr(i64, i64),
    Get(i64),
    ContainsKey(i64),
    Pop,
    PopItem,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        8 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Set(k, v)),
        3 => key_strategy().prop_map(MapOp::Delete),
        1 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::DeleteOr(k, v)),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => Just(MapOp::Pop),
        1 => Just(MapOp::PopItem),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both SortedDict and
    /// BTreeMap and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut map: SortedDict<i64, i64> = SortedDict::new();
        let mut model: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Set(k, v) => {
                    prop_assert_eq!(map.set(*k, *v), model.insert(*k, *v), "set({}, {})", k, v);
                    prop_assert_eq!(map.get(k), Ok(v));
                }
                MapOp::Delete(k) => {
                    let expected = model.remove(k).ok_or(Error::KeyNotFound);
                    prop_assert_eq!(map.delete(k), expected, "delete({})", k);
                    prop_assert!(!map.contains_key(k));
                }
                MapOp::DeleteOr(k, fallback) => {
                    let expected = model.remove(k).unwrap_or(*fallback);
                    prop_assert_eq!(map.delete_or(k, *fallback), expected, "delete_or({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(map.get(k).ok(), model.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(map.contains_key(k), model.contains_key(k), "contains_key({})", k);
                }
                MapOp::Pop => {
                    let expected = model.pop_last().map(|(_, v)| v).ok_or(Error::EmptyContainer);
                    prop_assert_eq!(map.pop(), expected, "pop");
                }
                MapOp::PopItem => {
                    let expected = model.pop_first().ok_or(Error::EmptyContainer);
                    prop_assert_eq!(map.pop_item(), expected, "pop_item");
                }
            }
            prop_assert_eq!(map.len(), model.len(), "len mismatch after {:?}", op);
        }

        let items: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let expected: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(items, expected);
    }

    /// Keys are strictly ascending for any sequence of `set` calls.
    #[test]
    fn keys_strictly_ascending(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: SortedDict<i64, i64> = entries.iter().copied().collect();
        let keys: Vec<i64> = map.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(keys.len(), map.len());
    }

    /// Iteration in both directions and by view matches BTreeMap.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let map: SortedDict<i64, i64> = entries.iter().copied().collect();
        let model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        let items: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let model_items: Vec<_> = model.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&items, &model_items, "iter() mismatch");

        let rev: Vec<_> = map.iter().rev().map(|(&k, &v)| (k, v)).collect();
        let model_rev: Vec<_> = model.iter().rev().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(&rev, &model_rev, "iter().rev() mismatch");

        let values: Vec<_> = map.values().copied().collect();
        let model_values: Vec<_> = model.values().copied().collect();
        prop_assert_eq!(&values, &model_values, "values() mismatch");

        let owned: Vec<_> = map.clone().into_iter().collect();
        prop_assert_eq!(&owned, &model_items, "into_iter() mismatch");
        prop_assert_eq!(map.iter().len(), model.len());
    }

    /// Equality depends on the final contents only, never on insertion order.
    #[test]
    fn equality_ignores_insertion_order(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let forward: SortedDict<i64, i64> = entries.iter().copied().collect();
        let model: BTreeMap<i64, i64> = entries.iter().copied().collect();
        let shuffled: SortedDict<i64, i64> = model.iter().rev().map(|(&k, &v)| (k, v)).collect();

        prop_assert_eq!(&forward, &shuffled);
        prop_assert_eq!(hash_of(&forward), hash_of(&shuffled));
        prop_assert_eq!(forward.render(), shuffled.render());
    }

    /// Equality matches BTreeMap for independent maps.
    #[test]
    fn eq_matches_btreemap(
        entries_a in proptest::collection::vec((-20i64..20, 0i64..3), 0..30),
        entries_b in proptest::collection::vec((-20i64..20, 0i64..3), 0..30),
    ) {
        let a: SortedDict<i64, i64> = entries_a.iter().copied().collect();
        let b: SortedDict<i64, i64> = entries_b.iter().copied().collect();
        let model_a: BTreeMap<i64, i64> = entries_a.iter().copied().collect();
        let model_b: BTreeMap<i64, i64> = entries_b.iter().copied().collect();

        prop_assert_eq!(a == b, model_a == model_b);
        prop_assert_eq!(a != b, model_a != model_b);
    }

    /// `update` behaves like repeated `set`.
    #[test]
    fn update_matches_btreemap(
        initial in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
        extra in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE / 2),
    ) {
        let mut map: SortedDict<i64, i64> = initial.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = initial.iter().copied().collect();

        map.update(extra.iter().copied());
        model.extend(extra.iter().copied());

        let items: Vec<_> = map.into_iter().collect();
        let model_items: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(items, model_items);
    }

    /// After `clear`, no previously present key remains.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut map: SortedDict<i64, i64> = entries.iter().copied().collect();
        map.clear();
        prop_assert_eq!(map.len(), 0);
        for (k, _) in &entries {
            prop_assert!(!map.contains_key(k));
        }
        prop_assert_eq!(map.iter().next(), None);
    }

    /// `iter_mut` and `values_mut` edit every value exactly once.
    #[test]
    fn iter_mut_matches(entries in proptest::collection::vec((key_strategy(), -1_000i64..1_000), TEST_SIZE)) {
        let mut map: SortedDict<i64, i64> = entries.iter().copied().collect();
        let mut model: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for (k, v) in &mut map {
            *v += k;
        }
        for (k, v) in model.iter_mut() {
            *v += k;
        }
        for v in map.values_mut().rev() {
            *v *= 2;
        }
        for v in model.values_mut() {
            *v *= 2;
        }

        let items: Vec<_> = map.iter().map(|(&k, &v)| (k, v)).collect();
        let model_items: Vec<_> = model.into_iter().collect();
        prop_assert_eq!(items, model_items);
    }
}
