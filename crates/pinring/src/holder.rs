use crate::Ring;
use std::fmt;
use std::ops::Deref;
use std::time::Instant;

/// A pinned, read-only view of one published slot.
///
/// While a `Holder` is alive the producer will not reuse its slot, so the
/// value behind it never changes. Dropping the holder (or calling
/// [`release`](Self::release)) removes the pin exactly once.
///
/// Cloning takes a new pin on the same slot rather than sharing this one, so
/// every holder can be dropped independently.
///
/// Holders borrow their [`Ring`], which therefore cannot be dropped while any
/// holder exists.
pub struct Holder<'a, T> {
    ring: &'a Ring<T>,
    index: usize,
    seq: u64,
    published_at: Option<Instant>,
}

impl<'a, T> Holder<'a, T> {
    /// Wraps a pin that the caller has already taken under the ring lock.
    pub(crate) fn new(
        ring: &'a Ring<T>,
        index: usize,
        seq: u64,
        published_at: Option<Instant>,
    ) -> Self {
        Self {
            ring,
            index,
            seq,
            published_at,
        }
    }

    /// Position of the held value in publish order.
    ///
    /// Values the ring was built with occupy `0..capacity`.
    #[inline]
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// When the held value was published, or `None` for an initial value.
    #[inline]
    pub fn published_at(&self) -> Option<Instant> {
        self.published_at
    }

    /// Index of the underlying slot (stable for the ring's lifetime).
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the held value.
    #[inline]
    pub fn get(&self) -> &T {
        self
    }

    /// Releases the pin now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl<T> Deref for Holder<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: this holder owns a pin on a slot that was valid when pinned.
        // The producer never claims a pinned slot, so nothing writes the cell
        // until the pin is released in `drop`.
        unsafe { &*self.ring.cell(self.index) }
    }
}

impl<T> Clone for Holder<'_, T> {
    fn clone(&self) -> Self {
        self.ring.repin(self.index);
        Self {
            ring: self.ring,
            index: self.index,
            seq: self.seq,
            published_at: self.published_at,
        }
    }
}

impl<T> Drop for Holder<'_, T> {
    fn drop(&mut self) {
        self.ring.unpin(self.index);
    }
}

impl<T: fmt::Debug> fmt::Debug for Holder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Holder")
            .field("index", &self.index)
            .field("seq", &self.seq)
            .field("value", &**self)
            .finish()
    }
}
