use alloc::vec::Vec;

use log::{debug, trace};
use smallvec::{SmallVec, smallvec};

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Dir, Node};

/// The sentinel slot. Stands in for every absent child, is the parent of the root, and is the
/// one-past-the-end position.
pub(crate) const NIL: Handle = Handle::SENTINEL;

/// Work stack for walks bounded by tree height (at most `2 * log2(n + 1)`).
type Stack<T> = SmallVec<[T; 32]>;

/// The red-black tree engine backing `RBTreeMap` and `RBTreeSet`.
///
/// The comparator is owned by the wrapper and passed into each operation that needs it, so
/// iterators can borrow the engine without naming the comparator type.
pub(crate) struct RawRBTree<K, V> {
    /// All nodes, with the sentinel in slot zero.
    pub(super) nodes: Arena<Node<K, V>>,
    /// Leftmost node, or `NIL` when empty.
    pub(super) begin: Handle,
    /// Number of real nodes.
    pub(super) len: usize,
    /// Optional upper bound on `len` enforced by insertion.
    pub(super) max_len: Option<usize>,
}

impl<K, V> RawRBTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates a new, empty tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Arena::with_capacity(capacity.saturating_add(1));
        let sentinel = nodes.alloc(Node::sentinel());
        debug_assert_eq!(sentinel, NIL);
        Self {
            nodes,
            begin: NIL,
            len: 0,
            max_len: None,
        }
    }

    /// Returns the number of entries in the tree.
    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree contains no entries.
    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns how many entries fit before the arena reallocates.
    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity().saturating_sub(1)
    }

    pub(crate) const fn max_len(&self) -> Option<usize> {
        self.max_len
    }

    pub(crate) fn set_max_len(&mut self, max_len: Option<usize>) {
        self.max_len = max_len;
    }

    /// Removes every entry, leaving only the sentinel.
    pub(crate) fn clear(&mut self) {
        debug!("clearing tree of {} entries", self.len);
        self.nodes.clear();
        let sentinel = self.nodes.alloc(Node::sentinel());
        debug_assert_eq!(sentinel, NIL);
        self.begin = NIL;
        self.len = 0;
    }

    /// Moves every entry out in ascending order and leaves the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        debug!("draining {} entries", self.len);
        let mut result = Vec::with_capacity(self.len);
        let mut x = self.begin;
        while x != NIL {
            // Only the entry is taken; the links stay intact for `next_node`.
            let next = self.next_node(x);
            if let Some(entry) = self.nodes.get_mut(x).take_entry() {
                result.push(entry);
            }
            x = next;
        }
        self.clear();
        result
    }

    // ─── Sentinel & root ─────────────────────────────────────────────────────

    /// Returns the root, read through the sentinel's left link.
    #[inline]
    pub(crate) fn root(&self) -> Handle {
        self.left(NIL)
    }

    /// Installs `root` in both of the sentinel's child slots and points it back at the sentinel.
    pub(super) fn set_root(&mut self, root: Handle) {
        self.nodes.get_mut(NIL).set_children(root);
        if root != NIL {
            self.nodes.get_mut(root).set_parent(NIL);
        }
    }

    #[inline]
    pub(crate) const fn begin(&self) -> Handle {
        self.begin
    }

    #[inline]
    pub(crate) const fn end(&self) -> Handle {
        NIL
    }

    // ─── Node access ─────────────────────────────────────────────────────────

    #[inline]
    pub(super) fn parent(&self, h: Handle) -> Handle {
        self.nodes.get(h).parent()
    }

    #[inline]
    pub(super) fn child(&self, h: Handle, dir: Dir) -> Handle {
        self.nodes.get(h).child(dir)
    }

    #[inline]
    pub(super) fn left(&self, h: Handle) -> Handle {
        self.child(h, Dir::Left)
    }

    #[inline]
    pub(super) fn right(&self, h: Handle) -> Handle {
        self.child(h, Dir::Right)
    }

    #[inline]
    pub(super) fn color(&self, h: Handle) -> Color {
        self.nodes.get(h).color()
    }

    #[inline]
    pub(super) fn set_parent(&mut self, h: Handle, parent: Handle) {
        self.nodes.get_mut(h).set_parent(parent);
    }

    #[inline]
    pub(super) fn set_child(&mut self, h: Handle, dir: Dir, child: Handle) {
        self.nodes.get_mut(h).set_child(dir, child);
    }

    #[inline]
    pub(super) fn set_color(&mut self, h: Handle, color: Color) {
        debug_assert!(h != NIL || color == Color::Black, "the sentinel must stay black");
        self.nodes.get_mut(h).set_color(color);
    }

    /// Which child slot of its parent `h` occupies. The root reports `Left`, matching the
    /// sentinel's mirrored links.
    #[inline]
    pub(super) fn dir_of(&self, h: Handle) -> Dir {
        if self.left(self.parent(h)) == h { Dir::Left } else { Dir::Right }
    }

    #[inline]
    pub(crate) fn key(&self, h: Handle) -> &K {
        self.nodes.get(h).key()
    }

    /// Returns the entry at `h`, or `None` for the end position.
    #[inline]
    pub(crate) fn entry(&self, h: Handle) -> Option<(&K, &V)> {
        self.nodes.get(h).entry()
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, h: Handle) -> Option<(&K, &mut V)> {
        self.nodes.get_mut(h).entry_mut()
    }

    /// Frees the slot of an already unlinked node.
    pub(super) fn free(&mut self, h: Handle) -> (K, V) {
        self.nodes
            .take(h)
            .into_entry()
            .expect("`RawRBTree::free()` - cannot free the sentinel!")
    }

    // ─── Traversal ───────────────────────────────────────────────────────────

    /// Follows `dir` links from `h` until the last real node.
    pub(super) fn extremum(&self, mut h: Handle, dir: Dir) -> Handle {
        loop {
            let child = self.child(h, dir);
            if child == NIL {
                return h;
            }
            h = child;
        }
    }

    /// One in-order step from `x` towards `dir`.
    ///
    /// Stepping off the last node (or before the first) lands on the sentinel, and stepping
    /// from the sentinel lands on the first (or last) node, because the sentinel's children
    /// both point at the root.
    fn step(&self, mut x: Handle, dir: Dir) -> Handle {
        let child = self.child(x, dir);
        if child != NIL {
            return self.extremum(child, dir.opposite());
        }
        if x == NIL {
            // Only reachable on an empty tree.
            return NIL;
        }

        let mut parent = self.parent(x);
        while self.child(parent, dir) == x {
            x = parent;
            parent = self.parent(x);
        }
        parent
    }

    /// In-order successor; the sentinel after the maximum.
    #[inline]
    pub(crate) fn next_node(&self, x: Handle) -> Handle {
        self.step(x, Dir::Right)
    }

    /// In-order predecessor; the maximum when called on the sentinel.
    #[inline]
    pub(crate) fn prev_node(&self, x: Handle) -> Handle {
        self.step(x, Dir::Left)
    }

    /// Returns the last node, or `NIL` when empty.
    #[inline]
    pub(crate) fn last(&self) -> Handle {
        self.prev_node(NIL)
    }

    // ─── Structural primitives ───────────────────────────────────────────────

    /// Puts `v` in the child slot `u` occupies under `u`'s parent. The root slot is the
    /// sentinel's mirrored pair, so no other case exists.
    pub(super) fn transplant(&mut self, u: Handle, v: Handle) {
        let parent = self.parent(u);
        if parent == NIL {
            self.set_root(v);
            return;
        }

        let dir = self.dir_of(u);
        self.set_child(parent, dir, v);
        if v != NIL {
            self.set_parent(v, parent);
        }
    }

    /// Rotates `x` down towards `dir`: its `dir.opposite()` child `y` takes its place, `x`
    /// becomes `y`'s `dir` child, and `y`'s former `dir` subtree moves under `x`.
    ///
    /// `rotate(x, Dir::Left)` is the classic left rotation. In-order sequence is unchanged.
    pub(super) fn rotate(&mut self, x: Handle, dir: Dir) {
        let y = self.child(x, dir.opposite());
        debug_assert!(y != NIL, "cannot rotate without a child to promote");
        trace!("rotate {dir:?} at {x:?}, promoting {y:?}");

        let inner = self.child(y, dir);
        self.set_child(x, dir.opposite(), inner);
        if inner != NIL {
            self.set_parent(inner, x);
        }

        self.transplant(x, y);
        self.set_child(y, dir, x);
        self.set_parent(x, y);
    }

    /// Number of nodes on the longest root-to-leaf path.
    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        let root = self.root();
        if root == NIL {
            return 0;
        }

        let mut max = 0;
        let mut stack: Stack<(Handle, usize)> = smallvec![(root, 1)];
        while let Some((h, depth)) = stack.pop() {
            max = max.max(depth);
            for dir in [Dir::Left, Dir::Right] {
                let child = self.child(h, dir);
                if child != NIL {
                    stack.push((child, depth + 1));
                }
            }
        }
        max
    }
}

impl<K: Clone, V: Clone> Clone for RawRBTree<K, V> {
    /// Copies the tree node for node, colors included, using an explicit work stack so tall
    /// trees cannot overflow the call stack.
    fn clone(&self) -> Self {
        debug!("cloning tree of {} entries", self.len);
        let mut tree = Self::with_capacity(self.len);
        tree.max_len = self.max_len;

        let root = self.root();
        if root == NIL {
            return tree;
        }

        let new_root = tree.nodes.alloc(self.nodes.get(root).clone_detached(NIL));
        tree.set_root(new_root);

        let mut stack: Stack<(Handle, Handle)> = smallvec![(root, new_root)];
        while let Some((old, new)) = stack.pop() {
            for dir in [Dir::Left, Dir::Right] {
                let child = self.child(old, dir);
                if child != NIL {
                    let copy = tree.nodes.alloc(self.nodes.get(child).clone_detached(new));
                    tree.set_child(new, dir, copy);
                    stack.push((child, copy));
                }
            }
        }

        tree.begin = tree.extremum(new_root, Dir::Left);
        tree.len = self.len;
        tree
    }
}
