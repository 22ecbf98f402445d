use std::mem;
use std::slice;

use tracing::trace;

use crate::{OwningBuffer, Result, TransferIntent};

/// An indexed collection of [`OwningBuffer`] slots that receives buffers from callers.
///
/// The insertion methods represent the different policies a generic "put this into storage"
/// operation can follow:
///
/// | Method | Caller's buffer afterwards | Cost |
/// |---|---|---|
/// | [`insert_copied()`](Self::insert_copied) | unchanged | always one copy |
/// | [`insert_forwarded()`](Self::insert_forwarded) | as declared by [`TransferIntent`] | one copy or one move |
/// | [`insert_forced_move()`](Self::insert_forced_move) | always empty | always one move |
/// | [`insert()`](Self::insert) | consumed by the call | no copy |
///
/// Only [`insert_forwarded()`](Self::insert_forwarded) both avoids wasted copies and respects
/// what the caller still needs.
///
/// Slots are addressed by index, which makes it possible to name the same slot as both the
/// target and the source of an assignment. [`copy_assign()`](Self::copy_assign) and
/// [`move_assign()`](Self::move_assign) treat that case as a no-op.
///
/// # Examples
///
/// ```
/// use owning_buffer::{BufferStore, OwningBuffer, TransferIntent};
///
/// let mut store = BufferStore::new();
///
/// let mut persistent = OwningBuffer::with_len(8);
/// let index = store
///     .insert_forwarded(&mut persistent, TransferIntent::Copy)
///     .unwrap();
///
/// assert_eq!(persistent.len(), 8);
/// assert_eq!(store.get(index).unwrap().len(), 8);
///
/// // Assigning a slot to itself leaves it untouched.
/// store.copy_assign(index, index).unwrap();
/// store.move_assign(index, index);
/// assert_eq!(store.get(index).unwrap().len(), 8);
/// ```
#[derive(Debug, Default)]
pub struct BufferStore {
    slots: Vec<OwningBuffer>,
}

impl BufferStore {
    /// Creates an empty store.
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store with room for `capacity` slots before the slot list grows.
    #[must_use]
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots, including slots holding empty buffers.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the store has no slots.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The buffer in slot `index`, if such a slot exists.
    #[must_use]
    #[inline]
    pub fn get(&self, index: usize) -> Option<&OwningBuffer> {
        self.slots.get(index)
    }

    /// The buffer in slot `index`, if such a slot exists.
    #[must_use]
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut OwningBuffer> {
        self.slots.get_mut(index)
    }

    /// Iterates over the slots in index order.
    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, OwningBuffer> {
        self.slots.iter()
    }

    /// Total number of bytes owned by all slots.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.slots.iter().map(OwningBuffer::len).sum()
    }

    /// Adds a buffer the caller no longer holds, returning the index of its slot.
    ///
    /// The buffer is consumed by the call, so there is nothing left for the caller to observe
    /// and no copy or instrumented move takes place.
    pub fn insert(&mut self, value: OwningBuffer) -> usize {
        let index = self.slots.len();
        self.slots.push(value);
        index
    }

    /// Constructs a buffer of `len` bytes directly in a new slot, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if the region
    /// cannot be allocated. No slot is added in that case.
    pub fn emplace(&mut self, len: usize) -> Result<usize> {
        let value = OwningBuffer::try_with_len(len)?;
        Ok(self.insert(value))
    }

    /// Stores a duplicate of `value`, returning the index of its slot.
    ///
    /// This policy always copies. A caller that was willing to give its buffer away still pays
    /// for a full copy; use [`insert_forwarded()`](Self::insert_forwarded) to avoid that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if the duplicate
    /// cannot be allocated.
    pub fn insert_copied(&mut self, value: &OwningBuffer) -> Result<usize> {
        let copy = value.try_clone()?;

        trace!(len = copy.len(), "stored by copy");

        Ok(self.insert(copy))
    }

    /// Stores `value` by copying or moving it, exactly as declared by `intent`.
    ///
    /// With [`TransferIntent::Move`] the slot adopts the region of `value` and `value` is left
    /// empty. With [`TransferIntent::Copy`] the slot receives a duplicate and `value` is
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if `intent` is
    /// [`TransferIntent::Copy`] and the duplicate cannot be allocated.
    pub fn insert_forwarded(
        &mut self,
        value: &mut OwningBuffer,
        intent: TransferIntent,
    ) -> Result<usize> {
        let stored = OwningBuffer::transfer(value, intent)?;

        trace!(len = stored.len(), ?intent, "stored by forwarding");

        Ok(self.insert(stored))
    }

    /// Stores `value` by moving it, whatever the caller intended.
    ///
    /// **This leaves the caller's buffer empty even if the caller still needs it.** A caller
    /// that hands over a buffer it considers persistent will find it emptied after the call.
    /// Prefer [`insert_forwarded()`](Self::insert_forwarded), which lets the caller decide.
    ///
    /// # Examples
    ///
    /// ```
    /// use owning_buffer::{BufferStore, OwningBuffer};
    ///
    /// let mut store = BufferStore::new();
    /// let mut still_needed = OwningBuffer::with_len(32);
    ///
    /// store.insert_forced_move(&mut still_needed);
    ///
    /// // The caller's buffer has been emptied behind its back.
    /// assert!(still_needed.is_empty());
    /// ```
    pub fn insert_forced_move(&mut self, value: &mut OwningBuffer) -> usize {
        let stored = OwningBuffer::take(value);

        trace!(len = stored.len(), "stored by forced move");

        self.insert(stored)
    }

    /// Removes slot `index` and returns its buffer. Later slots shift down by one.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> OwningBuffer {
        self.assert_in_bounds(index);
        self.slots.remove(index)
    }

    /// Replaces the buffer in slot `destination` with a duplicate of slot `source`.
    ///
    /// If both indexes name the same slot, nothing happens.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocationFailure`][crate::Error::AllocationFailure] if the duplicate
    /// cannot be allocated. The destination slot is unchanged in that case.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn copy_assign(&mut self, destination: usize, source: usize) -> Result<()> {
        if destination == source {
            self.assert_in_bounds(destination);
            trace!(index = destination, "copy self-assignment skipped");
            return Ok(());
        }

        let [target, source] = self.disjoint_pair(destination, source);
        target.try_copy_from(source)
    }

    /// Moves the buffer in slot `source` into slot `destination`, leaving slot `source`
    /// holding an empty buffer.
    ///
    /// If both indexes name the same slot, nothing happens and the slot keeps its buffer.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn move_assign(&mut self, destination: usize, source: usize) {
        if destination == source {
            self.assert_in_bounds(destination);
            trace!(index = destination, "move self-assignment skipped");
            return;
        }

        let [target, source] = self.disjoint_pair(destination, source);
        target.take_from(source);
    }

    /// Changes the number of slots to `new_len`.
    ///
    /// New slots hold empty buffers. Slots beyond `new_len` are dropped, releasing
    /// their regions.
    pub fn resize(&mut self, new_len: usize) {
        self.slots.resize_with(new_len, OwningBuffer::new);
    }

    /// Moves every slot into a new store, leaving this store empty.
    ///
    /// No buffer is copied or individually moved; the new store adopts the slot list.
    #[must_use]
    pub fn take_all(&mut self) -> Self {
        trace!(slots = self.slots.len(), "store contents moved");

        Self {
            slots: mem::take(&mut self.slots),
        }
    }

    fn assert_in_bounds(&self, index: usize) {
        assert!(
            index < self.slots.len(),
            "slot index {index} out of bounds for store with {} slots",
            self.slots.len()
        );
    }

    fn disjoint_pair(&mut self, first: usize, second: usize) -> [&mut OwningBuffer; 2] {
        self.assert_in_bounds(first);
        self.assert_in_bounds(second);

        self.slots
            .get_disjoint_mut([first, second])
            .expect("indexes are distinct and in bounds")
    }
}

impl<'a> IntoIterator for &'a BufferStore {
    type Item = &'a OwningBuffer;
    type IntoIter = slice::Iter<'a, OwningBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for BufferStore {
    type Item = OwningBuffer;
    type IntoIter = std::vec::IntoIter<OwningBuffer>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl FromIterator<OwningBuffer> for BufferStore {
    fn from_iter<I: IntoIterator<Item = OwningBuffer>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}
