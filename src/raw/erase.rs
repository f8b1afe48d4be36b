use compare::Compare;
use log::{debug, trace};

use super::handle::Handle;
use super::node::{Color, Dir};
use super::raw_rbtree::{NIL, RawRBTree};

impl<K, V> RawRBTree<K, V> {
    /// Erases the node at `pos` and returns its in-order successor.
    ///
    /// Erasing the end position does nothing and returns the end position. Every handle other
    /// than `pos` stays valid.
    pub(crate) fn erase(&mut self, pos: Handle) -> Handle {
        if pos == NIL {
            return NIL;
        }
        let next = self.next_node(pos);
        self.remove_node(pos);
        next
    }

    /// Erases the node holding a key equal to `key`, returning how many were erased (0 or 1).
    pub(crate) fn erase_key<C, Q>(&mut self, cmp: &C, key: &Q) -> usize
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        self.remove_key(cmp, key).map_or(0, |_| 1)
    }

    /// Removes and returns the entry whose key equals `key`.
    pub(crate) fn remove_key<C, Q>(&mut self, cmp: &C, key: &Q) -> Option<(K, V)>
    where
        C: Compare<Q, K>,
        Q: ?Sized,
    {
        let z = self.find(cmp, key);
        if z == NIL { None } else { Some(self.remove_node(z)) }
    }

    /// Erases every node in `[first, last)` and returns `last`.
    ///
    /// Each successor is read before its predecessor is freed. When `last` is not reachable
    /// from `first`, erasing stops at the end position, as `range_between` does.
    pub(crate) fn erase_range(&mut self, mut first: Handle, last: Handle) -> Handle {
        if first == self.begin && last == NIL {
            self.clear();
            return NIL;
        }

        let mut erased = 0usize;
        while first != last && first != NIL {
            first = self.erase(first);
            erased += 1;
        }
        debug!("range erase removed {erased} entries");
        last
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.begin;
        if first == NIL { None } else { Some(self.remove_node(first)) }
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last();
        if last == NIL { None } else { Some(self.remove_node(last)) }
    }

    /// Unlinks `z`, rebalances, and frees its slot.
    pub(crate) fn remove_node(&mut self, z: Handle) -> (K, V) {
        debug_assert!(z != NIL, "cannot remove the sentinel");

        // The minimum has no left child, so it is always spliced by the first branch below.
        if z == self.begin {
            self.begin = self.next_node(z);
        }

        // `x` fills the vacated slot (possibly nil) and `x_parent` is where that slot hangs.
        let mut removed_color = self.color(z);
        let x;
        let x_parent;

        if self.left(z) == NIL {
            x = self.right(z);
            x_parent = self.parent(z);
            self.transplant(z, x);
        } else if self.right(z) == NIL {
            x = self.left(z);
            x_parent = self.parent(z);
            self.transplant(z, x);
        } else {
            // Two children: the successor `y` takes `z`'s place and color.
            let y = self.extremum(self.right(z), Dir::Left);
            removed_color = self.color(y);
            x = self.right(y);

            if self.parent(y) == z {
                x_parent = y;
            } else {
                x_parent = self.parent(y);
                self.transplant(y, x);
                let right = self.right(z);
                self.set_child(y, Dir::Right, right);
                self.set_parent(right, y);
            }

            self.transplant(z, y);
            let left = self.left(z);
            self.set_child(y, Dir::Left, left);
            self.set_parent(left, y);
            let color = self.color(z);
            self.set_color(y, color);
        }

        if removed_color == Color::Black {
            self.erase_fixup(x, x_parent);
        }

        self.len -= 1;
        self.free(z)
    }

    /// Restores the black height after a black node left the path through `x_parent`.
    ///
    /// `x` carries the extra black; it may be nil, so its parent is passed separately.
    fn erase_fixup(&mut self, mut x: Handle, mut x_parent: Handle) {
        while x != self.root() && self.color(x) == Color::Black {
            // A nil `x` with a nil sibling cannot carry a deficit, so this test is unambiguous.
            let side = if self.left(x_parent) == x { Dir::Left } else { Dir::Right };
            let mut w = self.child(x_parent, side.opposite());

            if self.color(w) == Color::Red {
                self.set_color(w, Color::Black);
                self.set_color(x_parent, Color::Red);
                self.rotate(x_parent, side);
                w = self.child(x_parent, side.opposite());
            }

            let near = self.child(w, side);
            let far = self.child(w, side.opposite());
            if self.color(near) == Color::Black && self.color(far) == Color::Black {
                self.set_color(w, Color::Red);
                x = x_parent;
                x_parent = self.parent(x);
                continue;
            }

            if self.color(far) == Color::Black {
                self.set_color(near, Color::Black);
                self.set_color(w, Color::Red);
                self.rotate(w, side.opposite());
                w = self.child(x_parent, side.opposite());
            }

            let color = self.color(x_parent);
            self.set_color(w, color);
            self.set_color(x_parent, Color::Black);
            let far = self.child(w, side.opposite());
            self.set_color(far, Color::Black);
            self.rotate(x_parent, side);
            trace!("erase fixup finished by rotation at {x_parent:?}");
            x = self.root();
        }

        if x != NIL {
            self.set_color(x, Color::Black);
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use alloc::collections::BTreeMap;
    use alloc::vec::Vec;
    use compare::{Natural, natural};
    use proptest::prelude::*;

    fn build(keys: impl IntoIterator<Item = i32>) -> (RawRBTree<i32, i32>, Natural<i32>) {
        let cmp = natural();
        let mut tree = RawRBTree::new();
        for key in keys {
            tree.insert(&cmp, key, key * 10).unwrap();
        }
        tree.validate_invariants(&cmp);
        (tree, cmp)
    }

    #[test]
    fn erase_two_child_node() {
        let (mut tree, cmp) = build(1..=7);
        let four = tree.find(&cmp, &4);
        assert_ne!(tree.left(four), NIL);
        assert_ne!(tree.right(four), NIL);

        let next = tree.erase(four);
        assert_eq!(*tree.key(next), 5);
        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&1, &2, &3, &5, &6, &7]);
    }

    #[test]
    fn erase_leftmost_advances_begin() {
        let (mut tree, cmp) = build([5, 3, 8, 1, 4, 7, 9]);
        let second = tree.next_node(tree.begin());
        assert_eq!(tree.erase_key(&cmp, &1), 1);
        assert_eq!(tree.begin(), second);
        assert_eq!(*tree.key(tree.begin()), 3);
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn erase_absent_key_changes_nothing() {
        let (mut tree, cmp) = build([5, 3, 8]);
        let before: Vec<_> = [5, 3, 8].iter().map(|k| tree.find(&cmp, k)).collect();
        let root = tree.root();
        assert_eq!(tree.erase_key(&cmp, &4), 0);
        assert_eq!(tree.root(), root);
        assert_eq!(tree.len(), 3);
        let after: Vec<_> = [5, 3, 8].iter().map(|k| tree.find(&cmp, k)).collect();
        assert_eq!(before, after);
        assert_eq!(tree.erase(NIL), NIL);
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn erase_down_to_empty() {
        let (mut tree, cmp) = build([2, 1, 3]);
        for key in [2, 3, 1] {
            assert_eq!(tree.remove_key(&cmp, &key), Some((key, key * 10)));
            tree.validate_invariants(&cmp);
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root(), NIL);
        assert_eq!(tree.begin(), NIL);

        // The tree is usable again afterwards.
        tree.insert(&cmp, 9, 90).unwrap();
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn erase_keeps_other_handles_valid() {
        let (mut tree, cmp) = build(0..64);
        let handles: Vec<_> = (0..64).map(|k| tree.find(&cmp, &k)).collect();
        for k in (0..64).step_by(2) {
            tree.erase(handles[k as usize]);
            tree.validate_invariants(&cmp);
        }
        for k in (1..64).step_by(2) {
            assert_eq!(tree.entry(handles[k as usize]), Some((&k, &(k * 10))));
        }
    }

    #[test]
    fn erase_range_returns_last() {
        let (mut tree, cmp) = build(1..=10);
        let first = tree.find(&cmp, &3);
        let last = tree.find(&cmp, &8);
        assert_eq!(tree.erase_range(first, last), last);
        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&1, &2, &8, &9, &10]);

        assert_eq!(tree.erase_range(last, last), last);
        assert_eq!(tree.len(), 5);

        let end = tree.end();
        assert_eq!(tree.erase_range(last, end), end);
        assert_eq!(tree.keys_in_order(), [&1, &2]);

        let begin = tree.begin();
        assert_eq!(tree.erase_range(begin, end), end);
        assert!(tree.is_empty());
        tree.validate_invariants(&cmp);
    }

    #[test]
    fn erase_range_with_misordered_pair_stops_at_end() {
        let (mut tree, cmp) = build(1..=5);
        let first = tree.find(&cmp, &4);
        let last = tree.find(&cmp, &2);
        assert_eq!(tree.erase_range(first, last), last);
        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&1, &2, &3]);

        // Starting from the end position erases nothing.
        let end = tree.end();
        assert_eq!(tree.erase_range(end, last), last);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn pop_both_ends() {
        let (mut tree, cmp) = build(1..=5);
        assert_eq!(tree.pop_first(), Some((1, 10)));
        assert_eq!(tree.pop_last(), Some((5, 50)));
        tree.validate_invariants(&cmp);
        assert_eq!(tree.keys_in_order(), [&2, &3, &4]);
        tree.clear();
        assert_eq!(tree.pop_first(), None);
        assert_eq!(tree.pop_last(), None);
    }

    #[test]
    fn freed_slots_are_reused() {
        let (mut tree, cmp) = build(0..32);
        let capacity = tree.capacity();
        for round in 0..10 {
            for k in 0..32 {
                tree.erase_key(&cmp, &k);
            }
            for k in 0..32 {
                tree.insert(&cmp, k + round, k).unwrap();
            }
        }
        assert_eq!(tree.capacity(), capacity);
        tree.validate_invariants(&cmp);
    }

    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
        PopFirst,
        PopLast,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            6 => (0i32..300).prop_map(Op::Insert),
            4 => (0i32..300).prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => Just(Op::PopLast),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..600)) {
            let cmp = natural();
            let mut tree: RawRBTree<i32, i32> = RawRBTree::new();
            let mut model: BTreeMap<i32, i32> = BTreeMap::new();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        let (_, inserted) = tree.insert(&cmp, key, -key).unwrap();
                        prop_assert_eq!(inserted, !model.contains_key(&key));
                        model.entry(key).or_insert(-key);
                    }
                    Op::Remove(key) => {
                        prop_assert_eq!(tree.remove_key(&cmp, &key), model.remove_entry(&key));
                    }
                    Op::PopFirst => prop_assert_eq!(tree.pop_first(), model.pop_first()),
                    Op::PopLast => prop_assert_eq!(tree.pop_last(), model.pop_last()),
                }

                tree.validate_invariants(&cmp);
                prop_assert_eq!(tree.len(), model.len());
            }

            let expected: Vec<_> = model.keys().collect();
            prop_assert_eq!(tree.keys_in_order(), expected.clone());
            let mut reversed = expected;
            reversed.reverse();
            prop_assert_eq!(tree.keys_in_reverse(), reversed);
        }

        #[test]
        fn erase_by_handle_matches_model(keys in prop::collection::btree_set(0i32..1000, 1..300), picks in prop::collection::vec(any::<prop::sample::Index>(), 1..300)) {
            let cmp = natural();
            let mut tree: RawRBTree<i32, i32> = RawRBTree::new();
            for &key in &keys {
                tree.insert(&cmp, key, key).unwrap();
            }
            let mut model: Vec<i32> = keys.into_iter().collect();

            for pick in picks {
                if model.is_empty() {
                    break;
                }
                let index = pick.index(model.len());
                let h = tree.find(&cmp, &model[index]);
                let next = tree.erase(h);
                model.remove(index);
                match model.get(index) {
                    Some(key) => prop_assert_eq!(tree.key(next), key),
                    None => prop_assert_eq!(next, NIL),
                }
                tree.validate_invariants(&cmp);
            }
        }
    }
}
