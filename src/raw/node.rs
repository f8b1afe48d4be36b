use super::handle::Handle;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// A child slot. Indexes `Node::children`, which lets every left/right mirror case of the
/// balancing code be written once.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Dir {
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

// Absent children point at the sentinel, never at nothing.
pub(crate) struct Node<K, V> {
    parent: Handle,
    children: [Handle; 2],
    color: Color,
    // `None` only for the sentinel.
    entry: Option<(K, V)>,
}

impl<K, V> Node<K, V> {
    /// The sentinel: black, its own parent, both children pointing at the (empty) root.
    pub(crate) const fn sentinel() -> Self {
        Self {
            parent: Handle::SENTINEL,
            children: [Handle::SENTINEL; 2],
            color: Color::Black,
            entry: None,
        }
    }

    /// A fresh red leaf hanging under `parent`.
    pub(crate) const fn leaf(parent: Handle, key: K, value: V) -> Self {
        Self {
            parent,
            children: [Handle::SENTINEL; 2],
            color: Color::Red,
            entry: Some((key, value)),
        }
    }

    /// Copies color and entry but none of the links.
    pub(crate) fn clone_detached(&self, parent: Handle) -> Self
    where
        K: Clone,
        V: Clone,
    {
        Self {
            parent,
            children: [Handle::SENTINEL; 2],
            color: self.color,
            entry: self.entry.clone(),
        }
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Handle {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Handle) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn child(&self, dir: Dir) -> Handle {
        self.children[dir as usize]
    }

    #[inline]
    pub(crate) fn set_child(&mut self, dir: Dir, child: Handle) {
        self.children[dir as usize] = child;
    }

    /// Points both child slots at `root`. Only meaningful on the sentinel.
    #[inline]
    pub(crate) fn set_children(&mut self, root: Handle) {
        self.children = [root; 2];
    }

    #[inline]
    pub(crate) const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub(crate) fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    #[inline]
    pub(crate) fn key(&self) -> &K {
        &self.entry.as_ref().expect("`Node::key()` - the sentinel has no key!").0
    }

    #[inline]
    pub(crate) fn entry(&self) -> Option<(&K, &V)> {
        self.entry.as_ref().map(|(k, v)| (k, v))
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        self.entry.as_mut().map(|(k, v)| (&*k, v))
    }

    pub(crate) fn take_entry(&mut self) -> Option<(K, V)> {
        self.entry.take()
    }

    pub(crate) fn into_entry(self) -> Option<(K, V)> {
        self.entry
    }
}
