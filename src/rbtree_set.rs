use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::ops::RangeBounds;

use compare::{Compare, Natural};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::rbtree_map::{IntoKeys, Keys, Range as MapRange, RBTreeMap};

mod capacity;

/// An ordered set based on a red-black tree.
///
/// See [`RBTreeMap`]'s documentation for a discussion of cursors, comparators and the cost
/// of each operation; a set is a map whose values are `()`.
///
/// It is a logic error for an item to be modified in such a way that its ordering relative
/// to any other item changes while it is in the set.
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeSet;
///
/// let mut books = RBTreeSet::new();
///
/// // Add some books.
/// books.insert("A Dance With Dragons");
/// books.insert("To Kill a Mockingbird");
/// books.insert("The Odyssey");
/// books.insert("The Great Gatsby");
///
/// // Check for a specific one.
/// if !books.contains(&"The Winds of Winter") {
///     println!("We have {} books, but The Winds of Winter ain't one.",
///              books.len());
/// }
///
/// // Remove a book.
/// books.remove(&"The Odyssey");
///
/// // Iterate over everything.
/// for book in &books {
///     println!("{book}");
/// }
/// ```
pub struct RBTreeSet<T, C = Natural<T>> {
    map: RBTreeMap<T, (), C>,
}

/// An iterator over the items of a `RBTreeSet`.
///
/// This `struct` is created by the [`iter`] method on [`RBTreeSet`].
///
/// [`iter`]: RBTreeSet::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    inner: Keys<'a, T, ()>,
}

/// An owning iterator over the items of a `RBTreeSet` in ascending order.
///
/// This `struct` is created by the [`into_iter`] method on [`RBTreeSet`]
/// (provided by the [`IntoIterator`] trait).
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<T> {
    inner: IntoKeys<T, ()>,
}

/// An iterator over a sub-range of items in a `RBTreeSet`.
///
/// This `struct` is created by the [`range`] and [`range_between`] methods on [`RBTreeSet`].
///
/// [`range`]: RBTreeSet::range
/// [`range_between`]: RBTreeSet::range_between
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Range<'a, T: 'a> {
    inner: MapRange<'a, T, ()>,
}

impl<T: Ord> RBTreeSet<T> {
    /// Makes a new, empty `RBTreeSet` ordered by `T`'s [`Ord`] implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = RBTreeSet::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        RBTreeSet { map: RBTreeMap::new() }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Makes a new, empty `RBTreeSet` ordered by `cmp`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// // Order strings by length, then alphabetically.
    /// let by_len = |a: &String, b: &String| a.len().cmp(&b.len()).then_with(|| a.cmp(b));
    /// let mut set = RBTreeSet::with_cmp(by_len);
    /// set.insert(String::from("ccc"));
    /// set.insert(String::from("a"));
    /// set.insert(String::from("bb"));
    /// assert_eq!(set.iter().map(String::as_str).collect::<Vec<_>>(), ["a", "bb", "ccc"]);
    /// ```
    #[must_use]
    pub fn with_cmp(cmp: C) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_cmp(cmp),
        }
    }

    /// Returns a reference to the set's comparator.
    #[must_use]
    pub const fn comparator(&self) -> &C {
        self.map.comparator()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// assert_eq!(v.len(), 0);
    /// v.insert(1);
    /// assert_eq!(v.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set contains no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut v = RBTreeSet::new();
    /// v.insert(1);
    /// v.clear();
    /// assert!(v.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns the position of the smallest element, or [`end`](Self::end) if the set is
    /// empty.
    #[must_use]
    pub const fn begin(&self) -> Cursor {
        self.map.begin()
    }

    /// Returns the end position, one past the largest element.
    #[must_use]
    pub const fn end(&self) -> Cursor {
        self.map.end()
    }

    /// Returns the position after `at`; see [`RBTreeMap::next`].
    #[must_use]
    pub fn next(&self, at: Cursor) -> Cursor {
        self.map.next(at)
    }

    /// Returns the position before `at`; see [`RBTreeMap::prev`].
    #[must_use]
    pub fn prev(&self, at: Cursor) -> Cursor {
        self.map.prev(at)
    }

    /// Returns the element at `at`, or `None` for the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// assert_eq!(set.value_at(set.begin()), Some(&1));
    /// assert_eq!(set.value_at(set.end()), None);
    /// ```
    #[must_use]
    pub fn value_at(&self, at: Cursor) -> Option<&T> {
        self.map.key_at(at)
    }

    /// Removes the element at `at` and returns the position that followed it.
    ///
    /// Erasing the end position does nothing and returns the end position.
    pub fn erase(&mut self, at: Cursor) -> Cursor {
        self.map.erase(at)
    }

    /// Removes every element in `[first, last)` and returns `last`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set: RBTreeSet<i32> = (1..=10).collect();
    /// let first = set.lower_bound(&4);
    /// set.erase_range(first, set.end());
    /// assert_eq!(set.into_iter().collect::<Vec<_>>(), [1, 2, 3]);
    /// ```
    pub fn erase_range(&mut self, first: Cursor, last: Cursor) -> Cursor {
        self.map.erase_range(first, last)
    }

    /// Returns a reference to the first element in the set, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.first(), None);
    /// set.insert(1);
    /// assert_eq!(set.first(), Some(&1));
    /// set.insert(2);
    /// assert_eq!(set.first(), Some(&1));
    /// ```
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, ())| k)
    }

    /// Returns a reference to the last element in the set, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    /// assert_eq!(set.last(), None);
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.last(), Some(&2));
    /// ```
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, ())| k)
    }

    /// Removes the first element from the set and returns it, if any.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, ())| k)
    }

    /// Removes the last element from the set and returns it, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(1);
    /// while let Some(n) = set.pop_last() {
    ///     assert_eq!(n, 1);
    /// }
    /// assert!(set.is_empty());
    /// ```
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, ())| k)
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3, 4, 5, 6]);
    /// // Keep only the even numbers.
    /// set.retain(|&k| k % 2 == 0);
    /// assert!(set.iter().eq([2, 4, 6].iter()));
    /// ```
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|k, ()| f(k));
    }

    /// Gets an iterator that visits the elements in the `RBTreeSet` in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 1, 2]);
    /// let mut set_iter = set.iter();
    /// assert_eq!(set_iter.next(), Some(&1));
    /// assert_eq!(set_iter.next_back(), Some(&3));
    /// assert_eq!(set_iter.next(), Some(&2));
    /// assert_eq!(set_iter.next(), None);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { inner: self.map.keys() }
    }

    /// Gets an iterator over the elements in `[first, last)`.
    pub fn range_between(&self, first: Cursor, last: Cursor) -> Range<'_, T> {
        Range {
            inner: self.map.range_between(first, last),
        }
    }
}

impl<T, C: Compare<T>> RBTreeSet<T, C> {
    /// Adds a value to the set unless an equal value is already present.
    ///
    /// Returns the position of the value and whether it was newly inserted. A rejected value
    /// is dropped and the set is left unchanged.
    ///
    /// # Panics
    ///
    /// Panics if the set is at its [`max_len`](Self::max_len) or runs out of handles.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// assert!(set.insert(2).1);
    /// assert!(!set.insert(2).1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> (Cursor, bool) {
        match self.map.try_insert(value, ()) {
            Ok(result) => result,
            Err(err) => panic!("`RBTreeSet::insert()` - {err}"),
        }
    }

    /// Like [`insert`](Self::insert), but reports a full set as an error.
    ///
    /// # Errors
    ///
    /// See [`RBTreeMap::try_insert`].
    pub fn try_insert(&mut self, value: T) -> Result<(Cursor, bool)> {
        self.map.try_insert(value, ())
    }

    /// Adds a value, using `hint` as a guess for the position it should precede.
    ///
    /// # Panics
    ///
    /// Panics under the same conditions as [`insert`](Self::insert).
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([10, 30]);
    /// let thirty = set.find(&30);
    /// let twenty = set.insert_hint(thirty, 20);
    /// assert_eq!(set.next(twenty), thirty);
    /// ```
    pub fn insert_hint(&mut self, hint: Cursor, value: T) -> Cursor {
        match self.map.try_insert_hint(hint, value, ()) {
            Ok(at) => at,
            Err(err) => panic!("`RBTreeSet::insert_hint()` - {err}"),
        }
    }

    /// Like [`insert_hint`](Self::insert_hint), but reports a full set as an error.
    ///
    /// # Errors
    ///
    /// See [`RBTreeMap::try_insert`].
    pub fn try_insert_hint(&mut self, hint: Cursor, value: T) -> Result<Cursor> {
        self.map.try_insert_hint(hint, value, ())
    }

    /// Returns the position of `value`, or [`end`](Self::end) if it is absent.
    pub fn find<Q>(&self, value: &Q) -> Cursor
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.find(value)
    }

    /// Returns the position of the first element not less than `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 3, 5, 7, 9]);
    /// assert_eq!(set.value_at(set.lower_bound(&6)), Some(&7));
    /// assert_eq!(set.value_at(set.upper_bound(&7)), Some(&9));
    /// assert_eq!(set.lower_bound(&10), set.end());
    /// ```
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.lower_bound(value)
    }

    /// Returns the position of the first element greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.upper_bound(value)
    }

    /// Returns `(lower_bound(value), upper_bound(value))`, which spans at most one element.
    pub fn equal_range<Q>(&self, value: &Q) -> (Cursor, Cursor)
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.equal_range(value)
    }

    /// Constructs a double-ended iterator over a sub-range of elements in the set.
    ///
    /// A range whose start lies after its end is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([3, 5, 8]);
    /// assert_eq!(set.range(4..).next(), Some(&5));
    /// assert_eq!(set.range(4..=8).collect::<Vec<_>>(), [&5, &8]);
    /// ```
    pub fn range<Q, R>(&self, range: R) -> Range<'_, T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
        R: RangeBounds<Q>,
    {
        Range {
            inner: self.map.range(range),
        }
    }

    /// Returns `true` if the set contains an element equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.contains(&1), true);
    /// assert_eq!(set.contains(&4), false);
    /// ```
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.contains_key(value)
    }

    /// Returns a reference to the element in the set, if any, that is equal to the value.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.get_key_value(value).map(|(k, ())| k)
    }

    /// Removes the element equal to `value`, returning how many were removed (0 or 1).
    pub fn erase_key<Q>(&mut self, value: &Q) -> usize
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.erase_key(value)
    }

    /// If the set contains an element equal to the value, removes it from the
    /// set and drops it. Returns whether such an element was present.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::new();
    ///
    /// set.insert(2);
    /// assert_eq!(set.remove(&2), true);
    /// assert_eq!(set.remove(&2), false);
    /// ```
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.remove(value).is_some()
    }

    /// Removes and returns the element in the set, if any, that is equal to the value.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let mut set = RBTreeSet::from([1, 2, 3]);
    /// assert_eq!(set.take(&2), Some(2));
    /// assert_eq!(set.take(&2), None);
    /// ```
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        C: Compare<Q, T>,
        Q: ?Sized,
    {
        self.map.remove_entry(value).map(|(k, ())| k)
    }
}

impl<T: Hash, C> Hash for RBTreeSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.map.hash(state);
    }
}

impl<T: PartialEq, C> PartialEq for RBTreeSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map.eq(&other.map)
    }
}

impl<T: Eq, C> Eq for RBTreeSet<T, C> {}

impl<T: PartialOrd, C> PartialOrd for RBTreeSet<T, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.map.partial_cmp(&other.map)
    }
}

impl<T: Ord, C> Ord for RBTreeSet<T, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.map.cmp(&other.map)
    }
}

impl<T: Clone, C: Clone> Clone for RBTreeSet<T, C> {
    fn clone(&self) -> Self {
        RBTreeSet { map: self.map.clone() }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RBTreeSet<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T, C: Default> Default for RBTreeSet<T, C> {
    fn default() -> Self {
        RBTreeSet {
            map: RBTreeMap::default(),
        }
    }
}

impl<T, C: Compare<T> + Default> FromIterator<T> for RBTreeSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = RBTreeSet::default();
        set.extend(iter);
        set
    }
}

impl<T, C: Compare<T>> Extend<T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<'a, T: Copy + 'a, C: Compare<T>> Extend<&'a T> for RBTreeSet<T, C> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        for &value in iter {
            self.insert(value);
        }
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for RBTreeSet<T> {
    /// Converts a `[T; N]` into a `RBTreeSet<T>`.
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set1 = RBTreeSet::from([1, 2, 3, 4]);
    /// let set2: RBTreeSet<_> = [1, 2, 3, 4].into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [T; N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<T, C> IntoIterator for RBTreeSet<T, C> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Gets an iterator for moving out the `RBTreeSet`'s contents in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set = RBTreeSet::from([1, 2, 3, 4]);
    ///
    /// let v: Vec<_> = set.into_iter().collect();
    /// assert_eq!(v, [1, 2, 3, 4]);
    /// ```
    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.map.into_keys(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a RBTreeSet<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.inner).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for IntoIter<T> {}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<'a, T> Iterator for Range<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(k, ())| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Range<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, ())| k)
    }
}

impl<T> FusedIterator for Range<'_, T> {}

impl<T> Clone for Range<'_, T> {
    fn clone(&self) -> Self {
        Range {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Range<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use compare::natural;

    #[test]
    fn reversed_set_iterates_descending() {
        let mut set = RBTreeSet::with_cmp(natural::<i32>().rev());
        set.extend([4, 1, 3, 2]);
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [4, 3, 2, 1]);
        assert_eq!(set.first(), Some(&4));
        assert_eq!(set.value_at(set.lower_bound(&5)), Some(&4));
        assert_eq!(set.range(3..=1).copied().collect::<Vec<_>>(), [3, 2, 1]);
    }

    #[test]
    fn erase_returns_successor() {
        let mut set: RBTreeSet<i32> = (1..=7).collect();
        let next = set.erase(set.find(&4));
        assert_eq!(set.value_at(next), Some(&5));
        assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn debug_formats_like_a_set() {
        let set = RBTreeSet::from([2, 1]);
        assert_eq!(alloc::format!("{set:?}"), "{1, 2}");
    }
}
