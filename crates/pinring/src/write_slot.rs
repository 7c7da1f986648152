use crate::Ring;
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};

/// Exclusive write access to a slot claimed by the producer.
///
/// The slot keeps whatever value it held before, so it can be updated in
/// place. Readers cannot see it until [`publish`](Self::publish) is called.
///
/// Dropping a `WriteSlot` without publishing abandons the slot: it is never
/// read again and never handed out again, permanently shrinking the ring by
/// one. Always publish what you claim.
///
/// # Example
///
/// ```
/// use pinring_rs::Ring;
///
/// let ring = Ring::<Vec<u8>>::new(2).unwrap();
///
/// let mut slot = ring.acquire_for_write().unwrap();
/// slot.clear();
/// slot.extend_from_slice(b"frame");
/// let seq = slot.publish();
///
/// assert_eq!(ring.current().unwrap().seq(), seq);
/// ```
#[must_use = "a claimed slot that is never published is lost"]
pub struct WriteSlot<'a, T> {
    ring: &'a Ring<T>,
    index: usize,
}

impl<'a, T> WriteSlot<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>, index: usize) -> Self {
        Self { ring, index }
    }

    pub(crate) fn ring(&self) -> &'a Ring<T> {
        self.ring
    }

    /// Index of the underlying slot.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Makes the written value visible to readers and wakes blocked readers.
    ///
    /// Returns the value's sequence number.
    pub fn publish(self) -> u64 {
        let this = ManuallyDrop::new(self);
        this.ring.commit(this.index)
    }
}

impl<T> Deref for WriteSlot<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the slot was claimed unpinned and marked invalid under the
        // ring lock; no holder can be created for it until `publish`.
        unsafe { &*self.ring.cell(self.index) }
    }
}

impl<T> DerefMut for WriteSlot<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `deref`; this is the only handle to the slot.
        unsafe { &mut *self.ring.cell(self.index) }
    }
}

impl<T> Drop for WriteSlot<'_, T> {
    fn drop(&mut self) {
        self.ring.strand(self.index);
    }
}

impl<T> std::fmt::Debug for WriteSlot<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteSlot")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
