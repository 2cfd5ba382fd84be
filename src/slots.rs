//! Growable slot store.
//!
//! A contiguous block of owned slots that grows by a fixed increment. `size`
//! is the logical capacity and is tracked separately from the backing `Vec`
//! so growth is observable and deterministic.

/// Owning, fixed-increment growable storage for array entries.
#[derive(Debug)]
pub(crate) struct SlotStore<T> {
    slots: Vec<T>,
    size: usize,
    step: usize,
}

impl<T> SlotStore<T> {
    pub(crate) fn new(initial: usize, step: usize) -> Self {
        let step = step.max(1);
        let mut store = Self {
            slots: Vec::new(),
            size: 0,
            step,
        };
        // Always start with room for at least one grow step.
        while store.size < initial.max(1) {
            store.grow();
        }
        store
    }

    /// Extend capacity by one step. Existing entries keep their positions.
    #[cold]
    pub(crate) fn grow(&mut self) {
        let old = self.size;
        self.size += self.step;
        self.slots.reserve_exact(self.size - self.slots.len());
        log::trace!("slot store grew from {} to {} slots", old, self.size);
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub(crate) fn as_slice(&self) -> &[T] {
        &self.slots
    }

    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.slots
    }

    /// Insert at `pos`, shifting `[pos, len)` one slot to the right.
    pub(crate) fn insert(&mut self, pos: usize, item: T) {
        debug_assert!(pos <= self.slots.len());
        if self.slots.len() == self.size {
            self.grow();
        }
        self.slots.insert(pos, item);
    }

    /// Remove at `pos`, shifting `[pos + 1, len)` one slot to the left.
    pub(crate) fn remove(&mut self, pos: usize) -> T {
        self.slots.remove(pos)
    }

    /// Swap in a new item at `pos`, returning the previous one.
    pub(crate) fn replace(&mut self, pos: usize, item: T) -> T {
        std::mem::replace(&mut self.slots[pos], item)
    }

    /// Move every item out in index order. Capacity is retained.
    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, T> {
        self.slots.drain(..)
    }

    /// Drop every item. Capacity is retained.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Make room for `additional` items past the current length.
    pub(crate) fn reserve(&mut self, additional: usize) {
        while self.size - self.slots.len() < additional {
            self.grow();
        }
    }
}
