use compare::natural;

use super::RBTreeMap;
use crate::raw::RawRBTree;

impl<K: Ord, V> RBTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let map: RBTreeMap<i32, i32> = RBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RBTreeMap::with_capacity_and_cmp(capacity, natural())
    }

    /// Creates an empty map that refuses to grow beyond `max_len` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeMap;
    ///
    /// let mut map = RBTreeMap::with_max_len(2);
    /// map.insert(1, 'a');
    /// map.insert(2, 'b');
    /// assert!(map.try_insert(3, 'c').is_err());
    /// assert_eq!(map.max_len(), Some(2));
    /// ```
    #[must_use]
    pub fn with_max_len(max_len: usize) -> Self {
        let mut map = RBTreeMap::new();
        map.set_max_len(Some(max_len));
        map
    }
}

impl<K, V, C> RBTreeMap<K, V, C> {
    /// Creates an empty map ordered by `cmp` with capacity for at least `capacity` elements.
    #[must_use]
    pub fn with_capacity_and_cmp(capacity: usize, cmp: C) -> Self {
        RBTreeMap {
            raw: RawRBTree::with_capacity(capacity),
            cmp,
        }
    }

    /// Returns how many elements the map can hold before its node storage reallocates.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Returns the length limit set with [`set_max_len`](Self::set_max_len), if any.
    #[must_use]
    pub const fn max_len(&self) -> Option<usize> {
        self.raw.max_len()
    }

    /// Sets or lifts the length limit.
    ///
    /// Inserting a new key while the map holds `max_len` or more entries fails with
    /// [`Error::MaxLenExceeded`](crate::Error::MaxLenExceeded). Lowering the limit below the
    /// current length removes nothing.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::{Error, RBTreeMap};
    ///
    /// let mut map = RBTreeMap::from([(1, ()), (2, ())]);
    /// map.set_max_len(Some(1));
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.try_insert(3, ()), Err(Error::MaxLenExceeded { max_len: 1 }));
    ///
    /// map.set_max_len(None);
    /// assert!(map.try_insert(3, ()).is_ok());
    /// ```
    pub fn set_max_len(&mut self, max_len: Option<usize>) {
        self.raw.set_max_len(max_len);
    }
}
