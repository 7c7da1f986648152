use crate::invariants::{debug_assert_pinned, debug_assert_readable};
use std::time::Instant;

/// Bookkeeping for one storage cell.
///
/// The payload itself lives in the ring's cell array at the same index; this
/// struct only carries the state guarded by the ring lock.
#[derive(Debug, Clone)]
pub(crate) struct Slot {
    index: usize,
    pub(crate) next: usize,
    pub(crate) prev: usize,
    /// Part of the circle. Parked slots are reachable only via the skip set.
    pub(crate) linked: bool,
    valid: bool,
    pins: usize,
    seq: u64,
    published_at: Option<Instant>,
}

impl Slot {
    /// A freshly constructed slot: published (holding its initial payload),
    /// unpinned and not yet linked. Initial payloads take sequence numbers
    /// `0..capacity` in ring order.
    pub(crate) fn new(index: usize) -> Self {
        Self {
            index,
            next: index,
            prev: index,
            linked: false,
            valid: true,
            pins: 0,
            seq: index as u64,
            published_at: None,
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub(crate) fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub(crate) fn is_pinned(&self) -> bool {
        self.pins != 0
    }

    #[inline]
    pub(crate) fn pins(&self) -> usize {
        self.pins
    }

    /// Published and not pinned: the producer may take it.
    #[inline]
    pub(crate) fn is_reusable(&self) -> bool {
        self.valid && self.pins == 0
    }

    #[inline]
    pub(crate) fn seq(&self) -> u64 {
        self.seq
    }

    #[inline]
    pub(crate) fn published_at(&self) -> Option<Instant> {
        self.published_at
    }

    pub(crate) fn begin_write(&mut self) {
        debug_assert!(self.pins == 0, "slot {} taken for writing while pinned", self.index);
        self.valid = false;
    }

    pub(crate) fn finish_write(&mut self, seq: u64, at: Instant) {
        self.valid = true;
        self.seq = seq;
        self.published_at = Some(at);
    }

    pub(crate) fn hold(&mut self) {
        debug_assert_readable!(self.index, self.valid);
        self.pins += 1;
    }

    pub(crate) fn release(&mut self) {
        debug_assert_pinned!(self.index, self.pins);
        self.pins = self.pins.saturating_sub(1);
    }
}
