use std::collections::VecDeque;

/// Slots rejected by an earlier reuse scan, in the order they were rejected.
///
/// The producer looks here before scanning the ring again, so a slot that was
/// pinned by a slow reader is reclaimed as soon as it is released instead of
/// waiting for the scan to wrap around to it. Bounded by the ring capacity:
/// each slot appears at most once.
#[derive(Debug, Clone)]
pub(crate) struct SkipSet {
    order: VecDeque<usize>,
    member: Vec<bool>,
}

impl SkipSet {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity),
            member: vec![false; capacity],
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[inline]
    pub(crate) fn contains(&self, index: usize) -> bool {
        self.member[index]
    }

    /// Records a rejected slot. Returns `false` if it was already recorded.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        if self.member[index] {
            return false;
        }
        self.member[index] = true;
        self.order.push_back(index);
        true
    }

    /// Removes and returns the oldest entry accepted by `available`.
    pub(crate) fn take_first<F>(&mut self, mut available: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        let pos = self.order.iter().position(|&index| available(index))?;
        let index = self.order.remove(pos)?;
        self.member[index] = false;
        Some(index)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }
}
