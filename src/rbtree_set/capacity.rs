use super::RBTreeSet;
use crate::rbtree_map::RBTreeMap;

impl<T: Ord> RBTreeSet<T> {
    /// Creates an empty set with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeSet` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::with_capacity(32);
    /// assert!(set.is_empty());
    /// assert!(set.capacity() >= 32);
    /// ```
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity(capacity),
        }
    }

    /// Creates an empty set that refuses to grow beyond `max_len` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::{Error, RBTreeSet};
    ///
    /// let mut set = RBTreeSet::with_max_len(1);
    /// assert!(set.try_insert('a').is_ok());
    /// assert_eq!(set.try_insert('b'), Err(Error::MaxLenExceeded { max_len: 1 }));
    /// ```
    #[must_use]
    pub fn with_max_len(max_len: usize) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_max_len(max_len),
        }
    }
}

impl<T, C> RBTreeSet<T, C> {
    /// Creates an empty set ordered by `cmp` with capacity for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_cmp(capacity: usize, cmp: C) -> Self {
        RBTreeSet {
            map: RBTreeMap::with_capacity_and_cmp(capacity, cmp),
        }
    }

    /// Returns how many elements the set can hold before its node storage reallocates.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.map.capacity()
    }

    /// Returns the length limit, if any.
    #[must_use]
    pub const fn max_len(&self) -> Option<usize> {
        self.map.max_len()
    }

    /// Sets or lifts the length limit; see [`RBTreeMap::set_max_len`].
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.map.set_max_len(max_len);
    }
}
