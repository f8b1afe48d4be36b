use core::cmp::Ordering::{Equal, Greater, Less};

use compare::Compare;
use log::{debug, trace};

use super::handle::Handle;
use super::node::{Color, Dir, Node};
use super::raw_rbtree::{NIL, RawRBTree};
use crate::error::{Error, Result};

/// Where a hinted insertion can go without searching from the root.
enum HintSlot {
    /// Link a new leaf under `parent` in slot `dir`.
    Vacant { parent: Handle, dir: Dir },
    /// An equal key already lives here.
    Occupied(Handle),
    /// The hint is not adjacent to the key's position.
    Miss,
}

impl<K, V> RawRBTree<K, V> {
    /// Inserts `key` unless an equal key is present.
    ///
    /// Returns the handle of the new node and `true`, or the handle of the existing equal key
    /// and `false` (in which case `key` and `value` are dropped and the tree is unchanged).
    pub(crate) fn insert<C>(&mut self, cmp: &C, key: K, value: V) -> Result<(Handle, bool)>
    where
        C: Compare<K>,
    {
        let mut parent = NIL;
        let mut dir = Dir::Left;
        let mut x = self.root();
        while x != NIL {
            parent = x;
            dir = if cmp.compare(&key, self.key(x)) == Less { Dir::Left } else { Dir::Right };
            x = self.child(x, dir);
        }

        // Keys are unique, so only one node can compare equal: `parent` itself when the search
        // ended going right, or its predecessor when it ended going left.
        let candidate = match dir {
            Dir::Left if parent == self.begin => None,
            Dir::Left => Some(self.prev_node(parent)),
            Dir::Right => Some(parent),
        };
        if let Some(j) = candidate
            && cmp.compare(self.key(j), &key) != Less
        {
            return Ok((j, false));
        }

        let z = self.link_leaf(parent, dir, key, value)?;
        Ok((z, true))
    }

    /// Inserts `key` using `hint` as the position it would precede.
    ///
    /// When `key` sorts strictly between `prev_node(hint)` and `hint`, the new leaf is linked
    /// next to them directly; otherwise this falls back to [`insert`](Self::insert). Either way
    /// the outcome is the same as a plain insert.
    pub(crate) fn insert_hint<C>(&mut self, cmp: &C, hint: Handle, key: K, value: V) -> Result<(Handle, bool)>
    where
        C: Compare<K>,
    {
        match self.hint_slot(cmp, hint, &key) {
            HintSlot::Vacant { parent, dir } => {
                let z = self.link_leaf(parent, dir, key, value)?;
                Ok((z, true))
            }
            HintSlot::Occupied(h) => Ok((h, false)),
            HintSlot::Miss => self.insert(cmp, key, value),
        }
    }

    fn hint_slot<C>(&self, cmp: &C, hint: Handle, key: &K) -> HintSlot
    where
        C: Compare<K>,
    {
        if hint == NIL {
            let root = self.root();
            if root == NIL {
                return HintSlot::Vacant { parent: NIL, dir: Dir::Left };
            }

            // The maximum never has a right child.
            let last = self.extremum(root, Dir::Right);
            return match cmp.compare(self.key(last), key) {
                Less => HintSlot::Vacant { parent: last, dir: Dir::Right },
                Equal => HintSlot::Occupied(last),
                Greater => HintSlot::Miss,
            };
        }

        match cmp.compare(key, self.key(hint)) {
            Equal => return HintSlot::Occupied(hint),
            Greater => return HintSlot::Miss,
            Less => {}
        }

        if hint == self.begin {
            // The minimum never has a left child.
            return HintSlot::Vacant { parent: hint, dir: Dir::Left };
        }

        let prev = self.prev_node(hint);
        match cmp.compare(self.key(prev), key) {
            // Either `prev` has no right child, or `hint` is the leftmost node of that right
            // subtree and so has no left child.
            Less if self.right(prev) == NIL => HintSlot::Vacant { parent: prev, dir: Dir::Right },
            Less => HintSlot::Vacant { parent: hint, dir: Dir::Left },
            Equal => HintSlot::Occupied(prev),
            Greater => HintSlot::Miss,
        }
    }

    /// Allocates a red leaf, hangs it in `parent`'s empty `dir` slot, and rebalances.
    ///
    /// Allocation happens before any link changes, so an error leaves the tree untouched.
    fn link_leaf(&mut self, parent: Handle, dir: Dir, key: K, value: V) -> Result<Handle> {
        if let Some(max_len) = self.max_len
            && self.len >= max_len
        {
            debug!("insert refused: tree is at its maximum length of {max_len}");
            return Err(Error::MaxLenExceeded { max_len });
        }

        let z = self.nodes.try_alloc(Node::leaf(parent, key, value)).inspect_err(|err| {
            debug!("insert refused: {err}");
        })?;

        if parent == NIL {
            self.set_root(z);
        } else {
            debug_assert_eq!(self.child(parent, dir), NIL, "slot is not vacant");
            self.set_child(parent, dir, z);
        }

        // Only a left child of the current minimum (or the first node) becomes the new minimum.
        if dir == Dir::Left && parent == self.begin {
            self.begin = z;
        }

        self.len += 1;
        self.insert_fixup(z);
        Ok(z)
    }

    /// Restores the red-black invariants after `z` was linked as a red leaf.
    fn insert_fixup(&mut self, mut z: Handle) {
        while self.color(self.parent(z)) == Color::Red {
            // A red parent is never the root, so the grandparent is a real node.
            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            let side = self.dir_of(parent);
            let uncle = self.child(grandparent, side.opposite());

            if self.color(uncle) == Color::Red {
                // Push the violation up two levels.
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grandparent, Color::Red);
                z = grandparent;
                continue;
            }

            if z == self.child(parent, side.opposite()) {
                // Inner grandchild: make it the outer one.
                z = parent;
                self.rotate(z, side);
            }

            let parent = self.parent(z);
            let grandparent = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grandparent, Color::Red);
            self.rotate(grandparent, side.opposite());
            trace!("insert fixup finished by rotation at {grandparent:?}");
        }

        let root = self.root();
        self.set_color(root, Color::Black);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use compare::{Natural, natural};
    use proptest::prelude::*;

    fn build(keys: impl IntoIterator<Item = i32>) -> (RawRBTree<i32, ()>, Natural<i32>) {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        for key in keys {
            tree.insert(&cmp, key, ()).unwrap();
            tree.validate_invariants(&cmp);
        }
        (tree, cmp)
    }

    #[test]
    fn insert_mixed_keys_yields_sorted_balanced_tree() {
        let (tree, _) = build([5, 3, 8, 1, 4, 7, 9]);
        assert_eq!(tree.keys_in_order(), [&1, &3, &4, &5, &7, &8, &9]);
        assert!(!tree.is_red(tree.root()));
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn duplicate_insert_returns_existing_handle() {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        let (first, inserted) = tree.insert(&cmp, 10, "a").unwrap();
        assert!(inserted);
        let (second, inserted) = tree.insert(&cmp, 10, "b").unwrap();
        assert!(!inserted);
        assert_eq!(first, second);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.entry(first), Some((&10, &"a")));
    }

    #[test]
    fn duplicate_detected_through_predecessor() {
        // 5 ends up as the in-order predecessor of the node the search stops at.
        let (mut tree, cmp) = build([4, 2, 6, 1, 3, 5, 7]);
        for key in 1..=7 {
            let (h, inserted) = tree.insert(&cmp, key, ()).unwrap();
            assert!(!inserted);
            assert_eq!(*tree.key(h), key);
        }
        assert_eq!(tree.len(), 7);
    }

    #[test]
    fn ascending_insert_stays_logarithmic() {
        let (tree, _) = build(1..=1000);
        // height <= 2 * log2(n + 1)  <=>  2^height <= (n + 1)^2
        let height = tree.height();
        assert!(height < 64 && (1u64 << height) <= 1001 * 1001, "height {height} is not logarithmic");
        assert_eq!(tree.len(), 1000);
    }

    #[test]
    fn begin_tracks_new_minimum() {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        let (h, _) = tree.insert(&cmp, 50, ()).unwrap();
        assert_eq!(tree.begin(), h);
        tree.insert(&cmp, 60, ()).unwrap();
        assert_eq!(tree.begin(), h);
        let (h, _) = tree.insert(&cmp, 40, ()).unwrap();
        assert_eq!(tree.begin(), h);
        tree.insert(&cmp, 45, ()).unwrap();
        assert_eq!(tree.begin(), h);
    }

    #[test]
    fn max_len_refuses_without_mutation() {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        tree.set_max_len(Some(2));
        tree.insert(&cmp, 1, ()).unwrap();
        tree.insert(&cmp, 2, ()).unwrap();
        assert_eq!(tree.insert(&cmp, 3, ()), Err(Error::MaxLenExceeded { max_len: 2 }));
        // Duplicates still resolve since nothing is allocated.
        assert!(matches!(tree.insert(&cmp, 2, ()), Ok((_, false))));
        assert_eq!(tree.len(), 2);
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn arena_exhaustion_leaves_tree_valid() {
        let cmp = natural();
        let mut tree: RawRBTree<u32, ()> = RawRBTree::new();
        // Slot zero is the sentinel.
        for key in 0..u32::try_from(Handle::MAX).unwrap() {
            tree.insert(&cmp, key, ()).unwrap();
        }
        let err = tree.insert(&cmp, u32::MAX, ()).unwrap_err();
        assert!(matches!(err, Error::ArenaExhausted { .. }));
        assert_eq!(tree.len(), Handle::MAX);
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn hint_at_correct_position_links_directly() {
        let (mut tree, cmp) = build([10, 20, 30, 40]);
        let forty = tree.last();
        let (h, inserted) = tree.insert_hint(&cmp, forty, 35, ()).unwrap();
        assert!(inserted);
        assert_eq!(tree.next_node(h), forty);

        let end = tree.end();
        let (h, inserted) = tree.insert_hint(&cmp, end, 50, ()).unwrap();
        assert!(inserted);
        assert_eq!(tree.last(), h);

        let begin = tree.begin();
        let (h, inserted) = tree.insert_hint(&cmp, begin, 5, ()).unwrap();
        assert!(inserted);
        assert_eq!(tree.begin(), h);

        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&5, &10, &20, &30, &35, &40, &50]);
    }

    #[test]
    fn hint_on_equal_key_reports_existing() {
        let (mut tree, cmp) = build([10, 20, 30]);
        let twenty = tree.next_node(tree.begin());
        assert_eq!(tree.insert_hint(&cmp, twenty, 20, ()), Ok((twenty, false)));
        let thirty = tree.next_node(twenty);
        // The predecessor of the hint holds the key.
        assert_eq!(tree.insert_hint(&cmp, thirty, 20, ()), Ok((twenty, false)));
        assert_eq!(tree.insert_hint(&cmp, tree.end(), 30, ()), Ok((thirty, false)));
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn wrong_hint_falls_back_to_search() {
        let (mut tree, cmp) = build([10, 20, 30]);
        let begin = tree.begin();
        let (h, inserted) = tree.insert_hint(&cmp, begin, 25, ()).unwrap();
        assert!(inserted);
        assert_eq!(*tree.key(h), 25);
        let (h, inserted) = tree.insert_hint(&cmp, tree.end(), 15, ()).unwrap();
        assert!(inserted);
        assert_eq!(*tree.key(h), 15);
        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&10, &15, &20, &25, &30]);
    }

    #[test]
    fn handles_survive_later_insertions() {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        let handles: Vec<_> = (0..200).map(|k| (k, tree.insert(&cmp, k, k * 2).unwrap().0)).collect();
        for (k, h) in handles {
            assert_eq!(tree.entry(h), Some((&k, &(k * 2))));
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn insert_keeps_invariants(keys in prop::collection::vec(-500i32..500, 0..400)) {
            let cmp = natural();
            let mut tree = RawRBTree::new();
            let mut model = alloc::collections::BTreeSet::new();
            for key in keys {
                let (h, inserted) = tree.insert(&cmp, key, ()).unwrap();
                prop_assert_eq!(inserted, model.insert(key));
                prop_assert_eq!(*tree.key(h), key);
                tree.validate_invariants(&cmp);
            }
            let expected: Vec<_> = model.iter().collect();
            prop_assert_eq!(tree.keys_in_order(), expected);
        }

        #[test]
        fn hinted_insert_matches_plain_insert(
            keys in prop::collection::vec(-200i32..200, 0..200),
            hints in prop::collection::vec(any::<prop::sample::Index>(), 200),
        ) {
            let cmp = natural();
            let mut plain = RawRBTree::new();
            let mut hinted = RawRBTree::new();
            for (key, hint) in keys.into_iter().zip(hints) {
                let (_, plain_inserted) = plain.insert(&cmp, key, ()).unwrap();

                // Pick the hint among existing positions, end included.
                let mut at = hinted.begin();
                for _ in 0..hint.index(hinted.len() + 1) {
                    at = hinted.next_node(at);
                }
                let (h, hinted_inserted) = hinted.insert_hint(&cmp, at, key, ()).unwrap();

                prop_assert_eq!(plain_inserted, hinted_inserted);
                prop_assert_eq!(*hinted.key(h), key);
                hinted.validate_invariants(&cmp);
            }
            prop_assert_eq!(plain.keys_in_order(), hinted.keys_in_order());
        }
    }
}
