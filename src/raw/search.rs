use core::cmp::Ordering::{Equal, Greater, Less};

use compare::Compare;

use super::handle::Handle;
use super::raw_rbtree::{NIL, RawRBTree};

impl<K, V> RawRBTree<K, V> {
    /// Returns the first node whose key is not less than `key`, or `NIL`.
    pub(crate) fn lower_bound<C, Q>(&self, cmp: &C, key: &Q) -> Handle
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut best = NIL;
        let mut x = self.root();
        while x != NIL {
            if cmp.compare(key, self.key(x)) == Greater {
                x = self.right(x);
            } else {
                best = x;
                x = self.left(x);
            }
        }
        best
    }

    /// Returns the first node whose key is greater than `key`, or `NIL`.
    pub(crate) fn upper_bound<C, Q>(&self, cmp: &C, key: &Q) -> Handle
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut best = NIL;
        let mut x = self.root();
        while x != NIL {
            if cmp.compare(key, self.key(x)) == Less {
                best = x;
                x = self.left(x);
            } else {
                x = self.right(x);
            }
        }
        best
    }

    /// Returns the node whose key equals `key`, or `NIL`.
    pub(crate) fn find<C, Q>(&self, cmp: &C, key: &Q) -> Handle
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let mut x = self.root();
        while x != NIL {
            match cmp.compare(key, self.key(x)) {
                Less => x = self.left(x),
                Greater => x = self.right(x),
                Equal => return x,
            }
        }
        NIL
    }

    /// Returns `(lower_bound, upper_bound)`, spanning at most one node.
    pub(crate) fn equal_range<C, Q>(&self, cmp: &C, key: &Q) -> (Handle, Handle)
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let first = self.lower_bound(cmp, key);
        if first != NIL && cmp.compare(key, self.key(first)) == Equal {
            (first, self.next_node(first))
        } else {
            (first, first)
        }
    }
}
