use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::{Error, Result};

/// Slot storage handing out stable [`Handle`]s.
///
/// This is the tree's node allocator: `try_alloc` places an element and `take` frees its slot
/// for reuse. An element never moves once allocated, which is what keeps every other handle
/// valid across insertions and removals.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    #[cfg(test)]
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[cfg(test)]
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    #[cfg(test)]
    pub(crate) const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Places `element` in a free slot, reusing vacated slots first.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle> {
        if let Some(h) = self.free.pop() {
            self.slots[h.to_index()] = Some(element);
            return Ok(h);
        }

        if self.slots.len() > Handle::MAX {
            return Err(Error::ArenaExhausted {
                capacity: Handle::MAX + 1,
            });
        }

        self.slots.push(Some(element));
        Ok(Handle::from_index(self.slots.len() - 1))
    }

    /// Like [`try_alloc`](Self::try_alloc), but panics when the arena is exhausted.
    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        match self.try_alloc(element) {
            Ok(h) => h,
            Err(err) => panic!("`Arena::alloc()` - {err}"),
        }
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }
}
