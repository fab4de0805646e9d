//! A slab of values addressed by generation-checked handles.
//!
//! Rungs of a skip list are linked in four directions, so the list keeps them
//! in an arena rather than behind owning pointers. Slots freed by a removal
//! are recycled through a free list; every reuse bumps the slot's generation,
//! so a handle kept past its node's destruction is detected instead of
//! silently aliasing whatever node lives there now.

use std::{fmt, marker::PhantomData, mem, ops};

/// A handle to a value stored in an [`Arena`].
///
/// Handles are `Copy` regardless of `T`; they are only meaningful for the
/// arena which produced them.
pub(crate) struct Handle<T> {
    /// Slot position in the arena.
    index: u32,
    /// Generation the slot had when this handle was issued.
    generation: u32,
    /// Ties the handle to `T` without owning one.
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Slot position as a `Vec` index.
    #[inline]
    fn index(self) -> usize {
        // u32 always fits in usize on the platforms we support.
        usize::try_from(self.index).unwrap_or(usize::MAX)
    }
}

impl<T> Clone for Handle<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// One cell of the arena.
enum Slot<T> {
    /// Holds a live value.
    Occupied {
        /// Current generation of the slot.
        generation: u32,
        /// The stored value.
        value: T,
    },
    /// Free for reuse.
    Vacant {
        /// Generation the next occupant will get.
        generation: u32,
        /// Next vacant slot on the free list.
        next_free: Option<u32>,
    },
}

/// Storage for values of one type, handing out [`Handle`]s.
pub(crate) struct Arena<T> {
    /// Every slot ever allocated, live or vacant.
    slots: Vec<Slot<T>>,
    /// Head of the free list.
    free: Option<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Arena<T> {
    /// An empty arena.
    #[inline]
    pub(crate) const fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    /// Number of live values.
    #[cfg(test)]
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Store `value`, reusing a vacant slot if there is one.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots would be needed.
    #[expect(
        clippy::indexing_slicing,
        reason = "The free list only holds indices of existing slots"
    )]
    #[expect(clippy::panic, reason = "Running out of handles is unrecoverable")]
    pub(crate) fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;
        if let Some(index) = self.free {
            let slot = &mut self.slots[usize::try_from(index).unwrap_or(usize::MAX)];
            let (generation, next_free) = match *slot {
                Slot::Vacant {
                    generation,
                    next_free,
                } => (generation, next_free),
                Slot::Occupied { .. } => unreachable!("free list points at an occupied slot"),
            };
            self.free = next_free;
            *slot = Slot::Occupied { generation, value };
            return Handle {
                index,
                generation,
                _marker: PhantomData,
            };
        }
        let Ok(index) = u32::try_from(self.slots.len()) else {
            panic!("arena capacity exceeded");
        };
        self.slots.push(Slot::Occupied {
            generation: 0,
            value,
        });
        Handle {
            index,
            generation: 0,
            _marker: PhantomData,
        }
    }

    /// Take the value out of the arena, invalidating `handle`.
    pub(crate) fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        match *slot {
            Slot::Occupied { generation, .. } if generation == handle.generation => {}
            _ => return None,
        }
        let vacant = Slot::Vacant {
            generation: handle.generation.wrapping_add(1),
            next_free: self.free,
        };
        self.free = Some(handle.index);
        self.len -= 1;
        match mem::replace(slot, vacant) {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// The value behind `handle`, unless the handle is stale.
    #[inline]
    pub(crate) fn get(&self, handle: Handle<T>) -> Option<&T> {
        match self.slots.get(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Mutable form of [`get`][Arena::get].
    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        match self.slots.get_mut(handle.index())? {
            Slot::Occupied { generation, value } if *generation == handle.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Drop every value; outstanding handles become stale.
    ///
    /// The slots are kept (and their generations bumped) so that a handle
    /// issued before the clear never matches a value inserted after it.
    pub(crate) fn clear(&mut self) {
        let mut free = None;
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            let generation = match *slot {
                Slot::Occupied { generation, .. } => generation.wrapping_add(1),
                Slot::Vacant { generation, .. } => generation,
            };
            *slot = Slot::Vacant {
                generation,
                next_free: free,
            };
            free = u32::try_from(index).ok();
        }
        self.free = free;
        self.len = 0;
    }
}

impl<T> Default for Arena<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ops::Index<Handle<T>> for Arena<T> {
    type Output = T;

    #[inline]
    #[expect(clippy::panic, reason = "A stale handle is a broken link invariant")]
    fn index(&self, handle: Handle<T>) -> &T {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale arena handle {handle:?}"),
        }
    }
}

impl<T> ops::IndexMut<Handle<T>> for Arena<T> {
    #[inline]
    #[expect(clippy::panic, reason = "A stale handle is a broken link invariant")]
    fn index_mut(&mut self, handle: Handle<T>) -> &mut T {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale arena handle {handle:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::Arena;

    #[test]
    fn insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], "a");
        assert_eq!(arena.get(b), Some(&"b"));

        assert_eq!(arena.remove(a), Some("a"));
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena.remove(a), None);
    }

    #[test]
    fn reuse_bumps_generation() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        arena.remove(a);
        let b = arena.insert(2);
        assert_ne!(a, b);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.slots.len(), 1);
    }

    #[test]
    fn free_list_is_lifo() {
        let mut arena = Arena::new();
        let handles: Vec<_> = (0..4).map(|i| arena.insert(i)).collect();
        arena.remove(handles[1]);
        arena.remove(handles[3]);
        let c = arena.insert(10);
        let d = arena.insert(11);
        let e = arena.insert(12);
        assert_eq!(arena.slots.len(), 5);
        assert_eq!((c.index, d.index, e.index), (3, 1, 4));
    }

    #[test]
    fn get_mut_and_clear() {
        let mut arena = Arena::new();
        let a = arena.insert(String::from("x"));
        if let Some(s) = arena.get_mut(a) {
            s.push('y');
        }
        arena[a].push('z');
        assert_eq!(arena[a], "xyz");
        arena.clear();
        assert_eq!(arena.len(), 0);
        assert_eq!(arena.get(a), None);
    }

    #[test]
    fn clear_invalidates_old_handles() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.remove(b);
        arena.clear();
        assert_eq!(arena.len(), 0);

        // Both slots are recycled, but under new generations.
        let c = arena.insert('c');
        let d = arena.insert('d');
        assert_eq!(arena.slots.len(), 2);
        assert_eq!((c.index, d.index), (0, 1));
        assert_eq!(arena.get(a), None);
        assert_ne!(a, c);
        assert_eq!(arena[c], 'c');
        assert_eq!(arena[d], 'd');
    }

    #[test]
    #[should_panic(expected = "stale arena handle")]
    fn stale_index_panics() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        arena.remove(a);
        let _ = &arena[a];
    }
}
