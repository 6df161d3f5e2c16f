use alloc::vec::Vec;

use super::handle::Handle;
use crate::error::AllocError;

/// Slot storage for tree nodes, addressed by [`Handle`].
///
/// Freed slots go on a free list and are reused before the slot vector grows.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    /// Maximum number of live elements an arena can hold.
    pub(crate) const MAX_LEN: usize = Handle::MAX + 1;

    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
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

    /// Makes room for `additional` more elements without touching existing slots.
    pub(crate) fn try_reserve(&mut self, additional: usize) -> Result<(), AllocError> {
        let fresh = additional.saturating_sub(self.free.len());
        if fresh == 0 {
            return Ok(());
        }
        if self.slots.len().saturating_add(fresh) > Self::MAX_LEN {
            return Err(AllocError::CapacityOverflow { max: Self::MAX_LEN });
        }
        self.slots.try_reserve(fresh)?;
        Ok(())
    }

    /// Allocates a slot for `element`, or reports why storage could not be obtained.
    ///
    /// On failure the arena is unchanged and `element` is handed back.
    pub(crate) fn try_alloc(&mut self, element: T) -> Result<Handle, (T, AllocError)> {
        if let Some(h) = self.free.pop() {
            // Reuse a free slot/handle.
            self.slots[h.to_index()] = Some(element);
            return Ok(h);
        }

        let Some(handle) = Handle::try_from_index(self.slots.len()) else {
            return Err((element, AllocError::CapacityOverflow { max: Self::MAX_LEN }));
        };
        // Growing must not abort the process; reserve first so `push` cannot reallocate.
        if let Err(e) = self.slots.try_reserve(1) {
            return Err((element, e.into()));
        }
        self.slots.push(Some(element));
        Ok(handle)
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
