use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::{Bound, Index, RangeBounds};

use compare::{Compare, Natural, natural};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::raw::{Handle, NIL, RawRBTree};

mod capacity;

/// An ordered map based on a [red-black tree].
///
/// Keys are kept unique and in the order given by the map's comparator, which defaults to the
/// key type's [`Ord`] implementation ([`Natural`]). Any [`Compare`] implementation can be
/// supplied with [`RBTreeMap::with_cmp`] instead, e.g. `natural().rev()` for descending order.
///
/// Every entry lives in its own slot of an internal arena, so besides the usual key-based API
/// the map hands out [`Cursor`]s: stable positions that survive any insertion and any removal
/// of *other* entries. Lookups, insertion and removal take O(log n) comparisons; moving a
/// cursor takes amortized O(1) link steps.
///
/// Unlike `BTreeMap`, inserting a key that is already present leaves the stored entry alone
/// and reports the existing position.
///
/// It is a logic error for a key to be modified in such a way that its ordering relative to
/// any other key changes while it is in the map. The resulting behavior is unspecified but
/// confined to this map: it may panic or return wrong results, never undefined behavior.
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeMap;
///
/// let mut ratings = RBTreeMap::new();
/// ratings.insert("Dune", 5);
/// ratings.insert("Neuromancer", 4);
/// ratings.insert("Hyperion", 5);
///
/// // A second insert of the same key keeps the first value.
/// let (_, inserted) = ratings.insert("Dune", 1);
/// assert!(!inserted);
/// assert_eq!(ratings[&"Dune"], 5);
///
/// // Walk with a cursor.
/// let mut at = ratings.lower_bound(&"E");
/// assert_eq!(ratings.key_at(at), Some(&"Hyperion"));
/// at = ratings.next(at);
/// assert_eq!(ratings.key_value_at(at), Some((&"Neuromancer", &4)));
/// assert!(ratings.next(at).is_end());
///
/// for (title, stars) in &ratings {
///     println!("{title}: {stars}");
/// }
/// ```
///
/// A map with a custom order:
///
/// ```
/// use compare::{Compare, natural};
/// use sumi_tree::RBTreeMap;
///
/// let mut map = RBTreeMap::with_cmp(natural::<i32>().rev());
/// map.insert(1, "a");
/// map.insert(3, "c");
/// map.insert(2, "b");
/// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [3, 2, 1]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RBTreeMap<K, V, C = Natural<K>> {
    raw: RawRBTree<K, V>,
    cmp: C,
}

/// An iterator over the entries of a `RBTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: RBTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    range: Range<'a, K, V>,
    remaining: usize,
}

/// An iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`RBTreeMap`].
///
/// [`keys`]: RBTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`RBTreeMap`].
///
/// [`values`]: RBTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the entries between two positions of a `RBTreeMap`.
///
/// This `struct` is created by the [`range`] and [`range_between`] methods on [`RBTreeMap`].
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeMap;
///
/// let map = RBTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
/// let mut range = map.range(2..=3);
/// assert_eq!(range.next(), Some((&2, &"b")));
/// assert_eq!(range.next_back(), Some((&3, &"c")));
/// assert_eq!(range.next(), None);
/// ```
///
/// [`range`]: RBTreeMap::range
/// [`range_between`]: RBTreeMap::range_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, K, V> {
    tree: &'a RawRBTree<K, V>,
    // Next entry to yield from the front.
    front: Handle,
    // One past the next entry to yield from the back.
    back: Handle,
}

/// An owning iterator over the entries of a `RBTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeMap`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An owning iterator over the keys of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`RBTreeMap`].
///
/// [`into_keys`]: RBTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of a `RBTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`RBTreeMap`].
///
/// [`into_values`]: RBTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Makes a new, empty `RBTreeMap` ordered by `K`'s [`Ord`] implementation.
    ///
    /// Allocates the tree's sentinel node.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        RBTreeMap::with_cmp(natural())
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Makes a new, empty `RBTreeMap` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use compare::{Compare, natural};
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_cmp(natural::<i32>().rev());
    /// map.insert(1, ());
    /// map.insert(2, ());
    /// assert_eq!(map.first_key_value(), Some((&2, &())));
    /// ```
    #[must_use]
    pub fn with_cmp(cmp: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::new(),
            cmp,
        }
    }

    /// Returns a reference to the map's comparator.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// assert!(a.is_empty());
    /// a.insert(1, "a");
    /// assert!(!a.is_empty());
    /// ```
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Clears the map, removing all elements.
    ///
    /// Every outstanding cursor except [`end`](Self::end) becomes invalid.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    // ─── Cursors ─────────────────────────────────────────────────────────────

    /// Returns the position of the smallest key, or [`end`](Self::end) if the map is empty.
    ///
    /// # Complexity
    ///
    /// O(1), the leftmost node is cached.
    #[must_use]
    pub const fn begin(&self) -> Cursor {
        Cursor::new(self.raw.begin())
    }

    /// Returns the end position, one past the largest key.
    #[must_use]
    pub const fn end(&self) -> Cursor {
        Cursor::new(self.raw.end())
    }

    /// Returns the position after `at` in key order.
    ///
    /// Moving past the last entry yields [`end`](Self::end), and moving past the end wraps
    /// around to [`begin`](Self::begin).
    ///
    /// # Panics
    ///
    /// May panic if `at` names an entry that was removed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b')]);
    /// let second = map.next(map.begin());
    /// assert_eq!(map.key_at(second), Some(&2));
    /// assert_eq!(map.next(second), map.end());
    /// assert_eq!(map.next(map.end()), map.begin());
    /// ```
    #[must_use]
    pub fn next(&self, at: Cursor) -> Cursor {
        Cursor::new(self.raw.next_node(at.handle()))
    }

    /// Returns the position before `at` in key order.
    ///
    /// Moving back from the end yields the last entry, and moving back from the first entry
    /// yields [`end`](Self::end).
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b')]);
    /// let last = map.prev(map.end());
    /// assert_eq!(map.key_at(last), Some(&2));
    /// assert!(map.prev(map.begin()).is_end());
    /// ```
    #[must_use]
    pub fn prev(&self, at: Cursor) -> Cursor {
        Cursor::new(self.raw.prev_node(at.handle()))
    }

    /// Returns the key at `at`, or `None` for the end position.
    #[must_use]
    pub fn key_at(&self, at: Cursor) -> Option<&K> {
        self.raw.entry(at.handle()).map(|(k, _)| k)
    }

    /// Returns the value at `at`, or `None` for the end position.
    #[must_use]
    pub fn value_at(&self, at: Cursor) -> Option<&V> {
        self.raw.entry(at.handle()).map(|(_, v)| v)
    }

    /// Returns a mutable reference to the value at `at`, or `None` for the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, 10)]);
    /// let at = map.begin();
    /// if let Some(v) = map.value_at_mut(at) {
    ///     *v += 1;
    /// }
    /// assert_eq!(map[&1], 11);
    /// ```
    pub fn value_at_mut(&mut self, at: Cursor) -> Option<&mut V> {
        self.raw.entry_mut(at.handle()).map(|(_, v)| v)
    }

    /// Returns the entry at `at`, or `None` for the end position.
    #[must_use]
    pub fn key_value_at(&self, at: Cursor) -> Option<(&K, &V)> {
        self.raw.entry(at.handle())
    }

    // ─── Removal by position ─────────────────────────────────────────────────

    /// Removes the entry at `at` and returns the position that followed it.
    ///
    /// Erasing the end position does nothing and returns the end position. Cursors to other
    /// entries stay valid.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c')]);
    /// let three = map.find(&3);
    /// let after = map.erase(map.find(&2));
    /// assert_eq!(after, three);
    /// assert_eq!(map.len(), 2);
    /// assert!(map.erase(map.end()).is_end());
    /// ```
    pub fn erase(&mut self, at: Cursor) -> Cursor {
        Cursor::new(self.raw.erase(at.handle()))
    }

    /// Removes every entry in `[first, last)` and returns `last`.
    ///
    /// If `last` is not reachable from `first` by repeated [`next`](Self::next) calls, erasing
    /// stops at the end position, the same way [`range_between`](Self::range_between) does.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, ()> = (1..=6).map(|k| (k, ())).collect();
    /// let last = map.erase_range(map.find(&2), map.find(&5));
    /// assert_eq!(map.key_at(last), Some(&5));
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 5, 6]);
    /// ```
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        Cursor::new(self.raw.erase_range(first.handle(), last.handle()))
    }

    /// Removes and returns the first element in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_last() {
    ///     assert!(map.iter().all(|(k, _v)| *k < key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map: RBTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut at = self.raw.begin();
        while let Some((k, v)) = self.raw.entry_mut(at) {
            at = if f(k, v) { self.raw.next_node(at) } else { self.raw.erase(at) };
        }
    }

    // ─── Ends ────────────────────────────────────────────────────────────────

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.entry(self.raw.begin())
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.entry(self.raw.last())
    }

    // ─── Iteration ───────────────────────────────────────────────────────────

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// assert_eq!(map.iter().rev().map(|(k, _)| *k).collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            range: Range {
                tree: &self.raw,
                front: self.raw.begin(),
                back: NIL,
            },
            remaining: self.raw.len(),
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut a = RBTreeMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets an iterator over the entries in `[first, last)`.
    ///
    /// `last` must be reachable from `first` by repeated [`next`](Self::next) calls, or be the
    /// end position. Iteration never wraps past the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (2, 'b'), (3, 'c'), (4, 'd')]);
    /// let (first, last) = (map.find(&2), map.find(&4));
    /// let keys: Vec<_> = map.range_between(first, last).map(|(k, _)| *k).collect();
    /// assert_eq!(keys, [2, 3]);
    /// ```
    pub fn range_between(&self, first: Cursor, last: Cursor) -> Range<'_, K, V> {
        Range {
            tree: &self.raw,
            front: first.handle(),
            back: last.handle(),
        }
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let keys: Vec<i32> = map.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn into_keys(self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: self.into_iter(),
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "hello"), (2, "goodbye")]);
    /// let values: Vec<&str> = map.into_values().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn into_values(self) -> IntoValues<K, V> {
        IntoValues {
            inner: self.into_iter(),
        }
    }
}

impl<K, V, C: Compare<K>> RBTreeMap<K, V, C> {
    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Inserts a key-value pair into the map unless an equal key is already present.
    ///
    /// Returns the position of the key together with `true` if the pair was inserted, or the
    /// position of the existing equal key together with `false`. In the latter case the map is
    /// not modified and `key` and `value` are dropped.
    ///
    /// # Panics
    ///
    /// Panics if the map is at its [`max_len`](Self::max_len) or runs out of handles. Use
    /// [`try_insert`](Self::try_insert) to handle those cases.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// let (at, inserted) = map.insert(37, "a");
    /// assert!(inserted);
    /// assert_eq!(map.value_at(at), Some(&"a"));
    ///
    /// let (again, inserted) = map.insert(37, "b");
    /// assert!(!inserted);
    /// assert_eq!(again, at);
    /// assert_eq!(map[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        match self.try_insert(key, value) {
            Ok(result) => result,
            Err(err) => panic!("`RBTreeMap::insert()` - {err}"),
        }
    }

    /// Like [`insert`](Self::insert), but reports a full map as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MaxLenExceeded`](crate::Error::MaxLenExceeded) when the map already
    /// holds [`max_len`](Self::max_len) entries, and
    /// [`Error::ArenaExhausted`](crate::Error::ArenaExhausted) when no more handles can be
    /// allocated. The map is unchanged in both cases. Inserting a key that is already
    /// present never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::{Error, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::with_max_len(1);
    /// assert!(map.try_insert(1, "a").is_ok());
    /// assert_eq!(map.try_insert(2, "b"), Err(Error::MaxLenExceeded { max_len: 1 }));
    /// assert_eq!(map.try_insert(1, "c").map(|(_, inserted)| inserted), Ok(false));
    /// ```
    pub fn try_insert(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        let (h, inserted) = self.raw.insert(&self.cmp, key, value)?;
        Ok((Cursor::new(h), inserted))
    }

    /// Inserts a key-value pair, using `hint` as a guess for the position it should precede.
    ///
    /// If the key belongs immediately before `hint`, the entry is linked there without
    /// searching from the root. A wrong hint costs a regular insert; the result is the same
    /// either way. Returns the position of the inserted or already present key.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// // Appending in order: the end is always the right hint.
    /// for i in 0..100 {
    ///     let end = map.end();
    ///     map.insert_hint(end, i, i * i);
    /// }
    /// assert_eq!(map.len(), 100);
    /// assert_eq!(map[&9], 81);
    /// ```
    pub fn insert_hint(&mut self, hint: Cursor, key: K, value: V) -> Cursor {
        match self.try_insert_hint(hint, key, value) {
            Ok(at) => at,
            Err(err) => panic!("`RBTreeMap::insert_hint()` - {err}"),
        }
    }

    /// Like [`insert_hint`](Self::insert_hint), but reports a full map as an error.
    ///
    /// # Errors
    ///
    /// Fails exactly when [`try_insert`](Self::try_insert) would.
    pub fn try_insert_hint(&mut self, hint: Cursor, key: K, value: V) -> Result<Cursor> {
        let (h, _) = self.raw.insert_hint(&self.cmp, hint.handle(), key, value)?;
        Ok(Cursor::new(h))
    }

    // ─── Order queries ───────────────────────────────────────────────────────

    /// Returns the position of `key`, or [`end`](Self::end) if it is absent.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.value_at(map.find(&2)), Some(&"b"));
    /// assert!(map.find(&3).is_end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Cursor
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        Cursor::new(self.raw.find(&self.cmp, key))
    }

    /// Returns the position of the first key that is not less than `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.key_at(map.lower_bound(&6)), Some(&7));
    /// assert_eq!(map.key_at(map.lower_bound(&7)), Some(&7));
    /// assert!(map.lower_bound(&10).is_end());
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> Cursor
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        Cursor::new(self.raw.lower_bound(&self.cmp, key))
    }

    /// Returns the position of the first key that is greater than `key`, or
    /// [`end`](Self::end) if there is none.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, ()> = [1, 3, 5, 7, 9].into_iter().map(|k| (k, ())).collect();
    /// assert_eq!(map.key_at(map.upper_bound(&7)), Some(&9));
    /// assert!(map.upper_bound(&9).is_end());
    /// ```
    pub fn upper_bound<Q>(&self, key: &Q) -> Cursor
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        Cursor::new(self.raw.upper_bound(&self.cmp, key))
    }

    /// Returns `(lower_bound(key), upper_bound(key))`.
    ///
    /// Keys are unique, so the pair spans one entry when `key` is present and is empty
    /// otherwise. Only one descent is made.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(1, 'a'), (3, 'c')]);
    /// let (first, last) = map.equal_range(&1);
    /// assert_eq!(map.range_between(first, last).count(), 1);
    /// let (first, last) = map.equal_range(&2);
    /// assert_eq!(first, last);
    /// assert_eq!(map.key_at(first), Some(&3));
    /// ```
    pub fn equal_range<Q>(&self, key: &Q) -> (Cursor, Cursor)
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let (first, last) = self.raw.equal_range(&self.cmp, key);
        (Cursor::new(first), Cursor::new(last))
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the map.
    ///
    /// Bounds are resolved with [`lower_bound`](Self::lower_bound) and
    /// [`upper_bound`](Self::upper_bound). A range whose start lies after its end is empty;
    /// it does not panic.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(3, "a");
    /// map.insert(5, "b");
    /// map.insert(8, "c");
    /// for (&key, &value) in map.range(4..=8) {
    ///     println!("{key}: {value}");
    /// }
    /// assert_eq!(Some((&5, &"b")), map.range(4..).next());
    /// #[allow(clippy::reversed_empty_ranges)]
    /// let inverted = map.range(8..3);
    /// assert_eq!(inverted.count(), 0);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Range<'_, K, V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        let front = match range.start_bound() {
            Bound::Included(key) => self.raw.lower_bound(&self.cmp, key),
            Bound::Excluded(key) => self.raw.upper_bound(&self.cmp, key),
            Bound::Unbounded => self.raw.begin(),
        };
        let back = match range.end_bound() {
            Bound::Included(key) => self.raw.upper_bound(&self.cmp, key),
            Bound::Excluded(key) => self.raw.lower_bound(&self.cmp, key),
            Bound::Unbounded => NIL,
        };

        // Inverted bounds: `back` sorts before `front`.
        let empty = front == NIL
            || (back != NIL
                && <C as Compare<K>>::compare(&self.cmp, self.raw.key(back), self.raw.key(front)) == Ordering::Less);
        let front = if empty { back } else { front };

        Range {
            tree: &self.raw,
            front,
            back,
        }
    }

    // ─── Key-based access ────────────────────────────────────────────────────

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.get_key_value(key).map(|(_, v)| v)
    }

    /// Returns the key-value pair corresponding to the supplied key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get_key_value(&1), Some((&1, &"a")));
    /// assert_eq!(map.get_key_value(&2), None);
    /// ```
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.raw.entry(self.raw.find(&self.cmp, key))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let h = self.raw.find(&self.cmp, key);
        self.raw.entry_mut(h).map(|(_, v)| v)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert!(map.contains_key(&1));
    /// assert!(!map.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.raw.find(&self.cmp, key) != NIL
    }

    /// Removes the entry for `key`, returning how many entries were removed (0 or 1).
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::from([(1, "a")]);
    /// assert_eq!(map.erase_key(&1), 1);
    /// assert_eq!(map.erase_key(&1), 0);
    /// ```
    pub fn erase_key<Q>(&mut self, key: &Q) -> usize
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.raw.erase_key(&self.cmp, key)
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove_entry(&1), Some((1, "a")));
    /// assert_eq!(map.remove_entry(&1), None);
    /// ```
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.raw.remove_key(&self.cmp, key)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RBTreeMap<K, V, C> {
    fn clone(&self) -> Self {
        RBTreeMap {
            raw: self.raw.clone(),
            cmp: self.cmp.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for RBTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for RBTreeMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq, C> Eq for RBTreeMap<K, V, C> {}

impl<K: PartialOrd, V: PartialOrd, C> PartialOrd for RBTreeMap<K, V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<K: Ord, V: Ord, C> Ord for RBTreeMap<K, V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for RBTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for RBTreeMap<K, V, C> {
    fn default() -> Self {
        RBTreeMap::with_cmp(C::default())
    }
}

impl<K, V, C: Compare<K> + Default> FromIterator<(K, V)> for RBTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = RBTreeMap::default();
        map.extend(iter);
        map
    }
}

/// Pairs whose key is already present are dropped; the first value for a key wins.
impl<K, V, C: Compare<K>> Extend<(K, V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Compare<K>> Extend<(&'a K, &'a V)> for RBTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.insert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a RBTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<K, V, C> IntoIterator for RBTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map = RBTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, V, C, Q> Index<&Q> for RBTreeMap<K, V, C>
where
    C: Compare<K> + Compare<Q, K>,
    Q: ?Sized,
{
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for RBTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into a `RBTreeMap<K, V>`.
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map1 = RBTreeMap::from([(1, 2), (3, 4)]);
    /// let map2: RBTreeMap<_, _> = [(1, 2), (3, 4)].into();
    /// assert_eq!(map1, map2);
    /// ```
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

// ─── Range ───────────────────────────────────────────────────────────────────

impl<'a, K, V> Iterator for Range<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        // Reaching the end before `back` only happens with a misordered pair; stop there.
        let entry = self.tree.entry(self.front)?;
        self.front = self.tree.next_node(self.front);
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.front == self.back { (0, Some(0)) } else { (0, Some(self.tree.len())) }
    }
}

impl<K, V> DoubleEndedIterator for Range<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }

        let h = self.tree.prev_node(self.back);
        let entry = self.tree.entry(h)?;
        self.back = h;
        Some(entry)
    }
}

impl<K, V> FusedIterator for Range<'_, K, V> {}

impl<K, V> Clone for Range<'_, K, V> {
    fn clone(&self) -> Self {
        Range {
            tree: self.tree,
            front: self.front,
            back: self.back,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Range<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Iter ────────────────────────────────────────────────────────────────────

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.range.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn count(self) -> usize {
        self.remaining
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.range.next_back()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            range: self.range.clone(),
            remaining: self.remaining,
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Keys & Values ───────────────────────────────────────────────────────────

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
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

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
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

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// ─── Owning iterators ────────────────────────────────────────────────────────

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

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<K> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<V> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}
