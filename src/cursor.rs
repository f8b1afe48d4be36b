use core::fmt;

use crate::raw::Handle;

/// A position in an [`RBTreeMap`](crate::RBTreeMap) or [`RBTreeSet`](crate::RBTreeSet).
///
/// A cursor is a small copyable token naming one stored entry, or the end position one past
/// the last entry. It does not borrow the tree: reading through it goes back to the collection
/// (`key_at`, `value_at`, ...), and moving it uses the collection's `next` and `prev`.
///
/// Inserting never invalidates a cursor. Erasing invalidates only the cursors naming the erased
/// entry; using one afterwards is a logic error that either panics or names whichever entry
/// later reuses the slot.
///
/// # Examples
///
/// ```
/// use sumi_tree::RBTreeSet;
///
/// let mut set = RBTreeSet::from([1, 3, 5]);
/// let (three, _) = set.insert(3);
/// set.insert(4);
/// set.erase_key(&5);
///
/// assert_eq!(set.value_at(three), Some(&3));
/// assert_eq!(set.value_at(set.next(three)), Some(&4));
/// assert!(set.next(set.next(three)).is_end());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(Handle);

impl Cursor {
    #[inline]
    pub(crate) const fn new(handle: Handle) -> Self {
        Cursor(handle)
    }

    #[inline]
    pub(crate) const fn handle(self) -> Handle {
        self.0
    }

    /// Returns `true` if this is the end position of its collection.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_tree::RBTreeSet;
    ///
    /// let set: RBTreeSet<i32> = RBTreeSet::new();
    /// assert!(set.begin().is_end());
    /// assert_eq!(set.begin(), set.end());
    /// ```
    #[must_use]
    #[inline]
    pub const fn is_end(self) -> bool {
        self.0.is_sentinel()
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.0).finish()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use static_assertions::{assert_eq_size, assert_impl_all};

    assert_eq_size!(Cursor, Option<Cursor>);
    assert_impl_all!(Cursor: Copy, Eq, core::hash::Hash, Send, Sync);

    #[test]
    fn end_cursor() {
        assert!(Cursor::new(Handle::SENTINEL).is_end());
        assert!(!Cursor::new(Handle::from_index(4)).is_end());
        assert_eq!(alloc::format!("{:?}", Cursor::new(Handle::SENTINEL)), "Cursor(Handle(END))");
    }
}
