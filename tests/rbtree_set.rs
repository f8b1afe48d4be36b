use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

use compare::{Compare, natural};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simplelog::{Config, LevelFilter, TestLogger};
use sumi_tree::{Error, RBTreeSet};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

fn init_logger() {
    let _ = TestLogger::init(LevelFilter::Debug, Config::default());
}

/// Values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    LowerBound(i64),
    UpperBound(i64),
    EraseAt(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        6 => value_strategy().prop_map(SetOp::Insert),
        2 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => value_strategy().prop_map(SetOp::LowerBound),
        1 => value_strategy().prop_map(SetOp::UpperBound),
        2 => value_strategy().prop_map(SetOp::EraseAt),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random operation sequence on both sets and compares every result.
    #[test]
    fn set_ops_match_btreeset(ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE)) {
        init_logger();
        let mut rb_set: RBTreeSet<i64> = RBTreeSet::new();
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => {
                    let (at, inserted) = rb_set.insert(*v);
                    prop_assert_eq!(inserted, bt_set.insert(*v), "insert({})", v);
                    prop_assert_eq!(rb_set.value_at(at), Some(v), "insert({}) cursor", v);
                }
                SetOp::Remove(v) => {
                    prop_assert_eq!(rb_set.remove(v), bt_set.remove(v), "remove({})", v);
                }
                SetOp::Take(v) => {
                    prop_assert_eq!(rb_set.take(v), bt_set.take(v), "take({})", v);
                }
                SetOp::Contains(v) => {
                    prop_assert_eq!(rb_set.contains(v), bt_set.contains(v), "contains({})", v);
                    prop_assert_eq!(rb_set.get(v), bt_set.get(v), "get({})", v);
                }
                SetOp::LowerBound(v) => {
                    let expected = bt_set.range(*v..).next();
                    prop_assert_eq!(rb_set.value_at(rb_set.lower_bound(v)), expected, "lower_bound({})", v);
                }
                SetOp::UpperBound(v) => {
                    let expected = bt_set.range((Excluded(*v), Unbounded)).next();
                    prop_assert_eq!(rb_set.value_at(rb_set.upper_bound(v)), expected, "upper_bound({})", v);
                }
                SetOp::EraseAt(v) => {
                    // Erase whatever sits at or after `v` and check the returned successor.
                    let at = rb_set.lower_bound(v);
                    let doomed = bt_set.range(*v..).next().copied();
                    let next = rb_set.erase(at);
                    match doomed {
                        Some(d) => {
                            bt_set.remove(&d);
                            prop_assert_eq!(rb_set.value_at(next), bt_set.range(d..).next(), "erase at {}", d);
                        }
                        None => prop_assert!(next.is_end()),
                    }
                }
                SetOp::First => prop_assert_eq!(rb_set.first(), bt_set.first(), "first"),
                SetOp::Last => prop_assert_eq!(rb_set.last(), bt_set.last(), "last"),
                SetOp::PopFirst => prop_assert_eq!(rb_set.pop_first(), bt_set.pop_first(), "pop_first"),
                SetOp::PopLast => prop_assert_eq!(rb_set.pop_last(), bt_set.pop_last(), "pop_last"),
            }
            prop_assert_eq!(rb_set.len(), bt_set.len(), "len mismatch after {:?}", op);
        }

        let rb_items: Vec<_> = rb_set.into_iter().collect();
        let bt_items: Vec<_> = bt_set.into_iter().collect();
        prop_assert_eq!(rb_items, bt_items);
    }

    #[test]
    fn iter_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();

        let rb_items: Vec<_> = rb_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(&rb_items, &bt_items, "iter() mismatch");
        prop_assert_eq!(rb_set.iter().len(), bt_set.len());

        let rb_rev: Vec<_> = rb_set.iter().rev().copied().collect();
        let bt_rev: Vec<_> = bt_set.iter().rev().copied().collect();
        prop_assert_eq!(rb_rev, bt_rev, "iter().rev() mismatch");

        let rb_owned: Vec<_> = rb_set.into_iter().rev().collect();
        let bt_owned: Vec<_> = bt_set.into_iter().rev().collect();
        prop_assert_eq!(rb_owned, bt_owned, "into_iter().rev() mismatch");
    }

    #[test]
    fn range_matches_btreeset(
        values in proptest::collection::vec(value_strategy(), TEST_SIZE),
        lo in value_strategy(),
        hi in value_strategy(),
    ) {
        let rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let bt_set: BTreeSet<i64> = values.iter().copied().collect();
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };

        let rb: Vec<_> = rb_set.range(lo..hi).copied().collect();
        let bt: Vec<_> = bt_set.range(lo..hi).copied().collect();
        prop_assert_eq!(rb, bt, "range({}..{})", lo, hi);

        let rb: Vec<_> = rb_set.range(..=hi).rev().copied().collect();
        let bt: Vec<_> = bt_set.range(..=hi).rev().copied().collect();
        prop_assert_eq!(rb, bt, "range(..={}).rev()", hi);

        let (first, last) = (rb_set.lower_bound(&lo), rb_set.lower_bound(&hi));
        let rb: Vec<_> = rb_set.range_between(first, last).copied().collect();
        let bt: Vec<_> = bt_set.range(lo..hi).copied().collect();
        prop_assert_eq!(rb, bt, "range_between({}, {})", lo, hi);
    }

    #[test]
    fn retain_matches_btreeset(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut rb_set: RBTreeSet<i64> = values.iter().copied().collect();
        let mut bt_set: BTreeSet<i64> = values.iter().copied().collect();

        rb_set.retain(|v| v % 2 == 0);
        bt_set.retain(|v| v % 2 == 0);

        let rb_items: Vec<_> = rb_set.iter().copied().collect();
        let bt_items: Vec<_> = bt_set.iter().copied().collect();
        prop_assert_eq!(rb_items, bt_items);
    }
}

// ─── Example-based tests ─────────────────────────────────────────────────────

#[test]
fn insert_twice_keeps_one() {
    let mut set = RBTreeSet::new();
    let (at, inserted) = set.insert(10);
    assert!(inserted);
    assert_eq!(set.insert(10), (at, false));
    assert_eq!(set.len(), 1);
}

#[test]
fn erase_key_counts() {
    let mut set: RBTreeSet<i32> = (1..=7).collect();
    assert_eq!(set.erase_key(&4), 1);
    assert_eq!(set.erase_key(&4), 0);
    let values: Vec<_> = set.iter().copied().collect();
    assert_eq!(values, [1, 2, 3, 5, 6, 7]);
}

#[test]
fn bounds_and_equal_range() {
    let set = RBTreeSet::from([1, 3, 5, 7, 9]);
    assert_eq!(set.value_at(set.lower_bound(&6)), Some(&7));
    assert_eq!(set.value_at(set.upper_bound(&7)), Some(&9));
    assert_eq!(set.lower_bound(&10), set.end());

    let (first, last) = set.equal_range(&3);
    assert_eq!(set.value_at(first), Some(&3));
    assert_eq!(set.value_at(last), Some(&5));
    assert_eq!(set.find(&4), set.end());
}

#[test]
fn cursor_walk_and_wrap() {
    let set = RBTreeSet::from(['c', 'a', 'b']);
    let mut at = set.begin();
    let mut seen = String::new();
    while !at.is_end() {
        seen.push(*set.value_at(at).unwrap());
        at = set.next(at);
    }
    assert_eq!(seen, "abc");
    assert_eq!(set.next(set.end()), set.begin());
    assert_eq!(set.value_at(set.prev(set.end())), Some(&'c'));
}

#[test]
fn erase_range_whole_set_then_reuse() {
    init_logger();
    let mut set: RBTreeSet<u32> = (0..1_000).collect();
    let end = set.end();
    assert_eq!(set.erase_range(set.begin(), end), end);
    assert!(set.is_empty());
    assert_eq!(set.first(), None);

    set.extend([3, 1, 2]);
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
}

#[test]
fn hint_at_end_appends() {
    let mut set = RBTreeSet::new();
    for v in 0..200 {
        let end = set.end();
        let at = set.insert_hint(end, v);
        assert_eq!(set.value_at(at), Some(&v));
    }
    assert_eq!(set, (0..200).collect());
}

#[test]
fn descending_set() {
    let mut set = RBTreeSet::with_cmp(natural::<&str>().rev());
    set.extend(["pear", "apple", "fig"]);
    assert_eq!(set.first(), Some(&"pear"));
    assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["pear", "fig", "apple"]);
    assert!(set.contains(&"fig"));
}

#[test]
fn case_insensitive_closure() {
    let mut set = RBTreeSet::with_cmp(|a: &String, b: &String| a.to_lowercase().cmp(&b.to_lowercase()));
    assert!(set.insert("Hello".to_owned()).1);
    assert!(!set.insert("HELLO".to_owned()).1);
    assert_eq!(set.get(&"hello".to_owned()), Some(&"Hello".to_owned()));
}

#[test]
fn max_len_and_try_insert() {
    let mut set = RBTreeSet::with_max_len(1);
    assert!(set.try_insert(1).is_ok());
    assert_eq!(set.try_insert(2), Err(Error::MaxLenExceeded { max_len: 1 }));
    assert_eq!(set.max_len(), Some(1));
    assert!(set.contains(&1));
    assert!(!set.contains(&2));
}

#[test]
#[should_panic(expected = "maximum length")]
fn insert_past_max_len_panics() {
    let mut set = RBTreeSet::with_max_len(0);
    set.insert(1);
}

#[test]
fn debug_and_ordering() {
    let a = RBTreeSet::from([2, 1]);
    let b = RBTreeSet::from([1, 3]);
    assert_eq!(format!("{a:?}"), "{1, 2}");
    assert!(a < b);
    assert_ne!(a, b);
    assert_eq!(a.clone(), a);
}
