use crate::invariants::debug_assert_cut;
use crate::skip_set::SkipSet;
use crate::slot::Slot;
use crate::RingError;
use std::fmt;

// =============================================================================
// LAYOUT
// =============================================================================
//
// Slots live in an arena (`Vec<Slot>`) and point at each other by index. The
// linked slots form one circle that is logically cut between `current` and
// `final`:
//
//     final -> ... -> current -> (final)
//
// Walking `next` from `final` visits the readable window oldest to newest.
// The producer reclaims from the `final` end and relinks the claimed slot
// right after `current`, so the window slides forward one slot per write.
//
// A reuse scan that has to step over pinned slots cuts them out of the circle
// together with the claimed slot ("parking"). Parked slots keep their pins and
// payload, so outstanding holders stay readable, and they are found again
// through the skip set once released. With nothing parked every slot is
// linked.
//
// Every method here runs under the ring lock.
// =============================================================================

/// Result of looking for a slot the producer can overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Claim {
    pub(crate) index: usize,
    /// Taken from the skip set rather than found by scanning.
    pub(crate) from_skip: bool,
    /// Rejected slots cut out of the circle by this claim.
    pub(crate) parked: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Topology {
    slots: Vec<Slot>,
    current: usize,
    final_slot: usize,
    linked: usize,
    skipped: SkipSet,
}

impl Topology {
    /// Wires `count` fresh slots into a circle in index order. The last slot
    /// becomes `current` and the first becomes `final`.
    pub(crate) fn connect(count: usize) -> Result<Self, RingError> {
        if count == 0 {
            return Err(RingError::InvalidConfiguration { capacity: count });
        }

        let mut slots: Vec<Slot> = (0..count).map(Slot::new).collect();
        for index in 0..count {
            let next = (index + 1) % count;
            slots[index].next = next;
            slots[next].prev = index;
            slots[index].linked = true;
        }

        let topology = Self {
            slots,
            current: count - 1,
            final_slot: 0,
            linked: count,
            skipped: SkipSet::new(count),
        };
        debug_assert_cut!(topology);
        Ok(topology)
    }

    // ---------------------------------------------------------------------
    // ACCESSORS
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn current(&self) -> usize {
        self.current
    }

    #[inline]
    pub(crate) fn final_slot(&self) -> usize {
        self.final_slot
    }

    #[inline]
    pub(crate) fn next_of(&self, index: usize) -> usize {
        self.slots[index].next
    }

    #[inline]
    pub(crate) fn prev_of(&self, index: usize) -> usize {
        self.slots[index].prev
    }

    #[inline]
    pub(crate) fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    #[inline]
    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut Slot {
        &mut self.slots[index]
    }

    #[inline]
    pub(crate) fn skipped_len(&self) -> usize {
        self.skipped.len()
    }

    pub(crate) fn pinned_slots(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_pinned()).count()
    }

    pub(crate) fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    // ---------------------------------------------------------------------
    // MUTATION
    // ---------------------------------------------------------------------

    /// Finds a slot the producer may overwrite and detaches it from the
    /// circle. Returns `None` when every candidate is pinned.
    ///
    /// Slots remembered in the skip set are preferred, oldest rejection
    /// first. Otherwise the circle is scanned from `final` towards
    /// `current`.
    pub(crate) fn claim_for_write(&mut self) -> Option<Claim> {
        let slots = &self.slots;
        let remembered = if self.skipped.is_empty() {
            None
        } else {
            self.skipped.take_first(|index| slots[index].is_reusable())
        };
        if let Some(index) = remembered {
            // `final` only moves if the reclaimed slot is `final` itself
            if self.slots[index].linked {
                self.detach(index);
            }
            return Some(Claim {
                index,
                from_skip: true,
                parked: 0,
            });
        }

        let index = self.scan_for_reusable()?;

        // Everything between the old `final` and the chosen slot was rejected
        // by the scan. Cutting it away moves `final` to the chosen slot's
        // successor.
        let mut parked = 0;
        while self.final_slot != index {
            let rejected = self.final_slot;
            self.detach(rejected);
            parked += 1;
        }
        self.detach(index);
        debug_assert!(!self.skipped.contains(index), "scan claimed remembered slot {index}");

        Some(Claim {
            index,
            from_skip: false,
            parked,
        })
    }

    /// Walks `next` from `current` looking for a published, unpinned slot.
    /// Every slot stepped over goes into the skip set. Coming back around to
    /// `current` means the ring is exhausted.
    pub(crate) fn scan_for_reusable(&mut self) -> Option<usize> {
        let mut cursor = self.current;
        loop {
            cursor = self.slots[cursor].next;
            if cursor == self.current {
                return None;
            }
            if self.slots[cursor].is_reusable() {
                return Some(cursor);
            }
            self.skipped.insert(cursor);
        }
    }

    /// Links a detached slot right after `current` and makes it `current`.
    pub(crate) fn advance_current(&mut self, index: usize) {
        debug_assert!(!self.slots[index].linked, "slot {index} is already linked");

        let old_current = self.current;
        let final_slot = self.final_slot;

        self.slots[old_current].next = index;
        self.slots[index].prev = old_current;
        self.slots[index].next = final_slot;
        self.slots[final_slot].prev = index;
        self.slots[index].linked = true;

        self.current = index;
        self.linked += 1;

        debug_assert_cut!(self);
    }

    /// Removes a linked slot from the circle, closing the gap around it.
    fn detach(&mut self, index: usize) {
        debug_assert!(self.slots[index].linked, "slot {index} is not linked");
        debug_assert!(index != self.current, "current slot {index} cannot be detached");

        let prev = self.slots[index].prev;
        let next = self.slots[index].next;
        self.slots[prev].next = next;
        self.slots[next].prev = prev;

        if index == self.final_slot {
            self.final_slot = next;
        }

        let slot = &mut self.slots[index];
        slot.linked = false;
        slot.next = index;
        slot.prev = index;
        self.linked -= 1;

        debug_assert_cut!(self);
    }

    // ---------------------------------------------------------------------
    // READABLE WINDOW
    // ---------------------------------------------------------------------

    /// Window slots from `final` to `current`.
    pub(crate) fn oldest_first(&self) -> Walk<'_> {
        Walk {
            topology: self,
            cursor: Some(self.final_slot),
            stop: self.current,
            forward: true,
        }
    }

    /// Window slots from `current` back to `final`.
    pub(crate) fn newest_first(&self) -> Walk<'_> {
        Walk {
            topology: self,
            cursor: Some(self.current),
            stop: self.final_slot,
            forward: false,
        }
    }

    /// Published window slots, newest first.
    pub(crate) fn readable_newest_first(&self) -> impl Iterator<Item = usize> + '_ {
        self.newest_first().filter(|&index| self.slots[index].is_valid())
    }

    /// Published window slots, oldest first.
    pub(crate) fn readable_oldest_first(&self) -> impl Iterator<Item = usize> + '_ {
        self.oldest_first().filter(|&index| self.slots[index].is_valid())
    }

    pub(crate) fn readable_len(&self) -> usize {
        self.readable_newest_first().count()
    }

    /// Oldest readable slot published after `seq`.
    pub(crate) fn first_after(&self, seq: u64) -> Option<usize> {
        self.readable_oldest_first()
            .find(|&index| self.slots[index].seq() > seq)
    }

    /// Newest readable slot published before `seq`.
    pub(crate) fn last_before(&self, seq: u64) -> Option<usize> {
        self.readable_newest_first()
            .find(|&index| self.slots[index].seq() < seq)
    }

    pub(crate) fn snapshot(&self) -> TopologySnapshot {
        let window = self
            .oldest_first()
            .map(|index| SlotView {
                index,
                seq: self.slots[index].seq(),
                pins: self.slots[index].pins(),
                valid: self.slots[index].is_valid(),
            })
            .collect();
        let parked = self
            .slots
            .iter()
            .filter(|slot| !slot.linked)
            .map(Slot::index)
            .collect();

        TopologySnapshot {
            window,
            parked,
            skipped: self.skipped.iter().collect(),
        }
    }
}

/// Iterator over window slot indices in one direction.
pub(crate) struct Walk<'a> {
    topology: &'a Topology,
    cursor: Option<usize>,
    stop: usize,
    forward: bool,
}

impl Iterator for Walk<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let index = self.cursor?;
        self.cursor = if index == self.stop {
            None
        } else if self.forward {
            Some(self.topology.next_of(index))
        } else {
            Some(self.topology.prev_of(index))
        };
        Some(index)
    }
}

// ---------------------------------------------------------------------
// SNAPSHOT
// ---------------------------------------------------------------------

/// State of one window slot at snapshot time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    pub index: usize,
    pub seq: u64,
    pub pins: usize,
    /// `false` while the producer is writing the slot.
    pub valid: bool,
}

/// Point-in-time picture of the ring layout, for debugging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologySnapshot {
    /// Linked slots from `final` (first) to `current` (last).
    pub window: Vec<SlotView>,
    /// Slots cut out of the circle while pinned.
    pub parked: Vec<usize>,
    /// Skip set contents in rejection order.
    pub skipped: Vec<usize>,
}

impl TopologySnapshot {
    /// Slot indices from `final` to `current`.
    pub fn indices(&self) -> Vec<usize> {
        self.window.iter().map(|view| view.index).collect()
    }

    pub fn final_index(&self) -> Option<usize> {
        self.window.first().map(|view| view.index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.window.last().map(|view| view.index)
    }
}

impl fmt::Display for TopologySnapshot {
    /// Renders `[final] -> a -> b -> {current}`; slots being written carry a `*`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.window.len().saturating_sub(1);
        for (pos, view) in self.window.iter().enumerate() {
            if pos > 0 {
                write!(f, " -> ")?;
            }
            let marker = if view.valid { "" } else { "*" };
            match (pos == 0, pos == last) {
                (true, true) => write!(f, "{{[{}{marker}]}}", view.index)?,
                (true, false) => write!(f, "[{}{marker}]", view.index)?,
                (false, true) => write!(f, "{{{}{marker}}}", view.index)?,
                (false, false) => write!(f, "{}{marker}", view.index)?,
            }
        }
        write!(f, " ({} linked", self.window.len())?;
        if !self.parked.is_empty() {
            write!(f, ", parked {:?}", self.parked)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_next(topology: &Topology, start: usize, steps: usize) -> usize {
        (0..steps).fold(start, |index, _| topology.next_of(index))
    }

    fn walk_prev(topology: &Topology, start: usize, steps: usize) -> usize {
        (0..steps).fold(start, |index, _| topology.prev_of(index))
    }

    /// Claim + relink, as the producer does.
    fn cycle(topology: &mut Topology) -> Option<Claim> {
        let claim = topology.claim_for_write()?;
        topology.advance_current(claim.index);
        Some(claim)
    }

    #[test]
    fn test_connect_rejects_zero() {
        assert_eq!(
            Topology::connect(0).unwrap_err(),
            RingError::InvalidConfiguration { capacity: 0 }
        );
    }

    #[test]
    fn test_connect_layout() {
        let topology = Topology::connect(4).unwrap();
        assert_eq!(topology.current(), 3);
        assert_eq!(topology.final_slot(), 0);
        assert_eq!(topology.next_of(3), 0);
        assert_eq!(topology.prev_of(0), 3);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(topology.newest_first().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_ring_closure_for_all_sizes() {
        for n in 1..=9 {
            let mut topology = Topology::connect(n).unwrap();
            for round in 0..3 * n {
                for start in 0..n {
                    assert_eq!(walk_next(&topology, start, n), start, "n={n} round={round}");
                    assert_eq!(walk_prev(&topology, start, n), start, "n={n} round={round}");
                }
                let _ = cycle(&mut topology);
            }
        }
    }

    #[test]
    fn test_single_slot_is_always_full() {
        let mut topology = Topology::connect(1).unwrap();
        assert_eq!(topology.claim_for_write(), None);
        assert_eq!(topology.skipped_len(), 0);
    }

    #[test]
    fn test_claim_takes_final_and_slides_window() {
        let mut topology = Topology::connect(4).unwrap();
        let claim = cycle(&mut topology).unwrap();

        assert_eq!(claim, Claim { index: 0, from_skip: false, parked: 0 });
        assert_eq!(topology.final_slot(), 1);
        assert_eq!(topology.current(), 0);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_scan_parks_pinned_slots() {
        let mut topology = Topology::connect(5).unwrap();
        topology.slot_mut(0).hold();
        topology.slot_mut(1).hold();

        let claim = cycle(&mut topology).unwrap();
        assert_eq!(claim, Claim { index: 2, from_skip: false, parked: 2 });
        assert_eq!(topology.final_slot(), 3);
        assert_eq!(topology.linked, 3);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![3, 4, 2]);
        assert_eq!(topology.skipped.iter().collect::<Vec<_>>(), vec![0, 1]);

        // With slots parked the circle closes after `linked` steps, not 5
        for start in [3, 4, 2] {
            assert_eq!(walk_next(&topology, start, topology.linked), start);
            assert_eq!(walk_prev(&topology, start, topology.linked), start);
        }

        // Released skipped slots come back before the scan touches 3 or 4
        topology.slot_mut(1).release();
        let claim = cycle(&mut topology).unwrap();
        assert_eq!(claim, Claim { index: 1, from_skip: true, parked: 0 });
        assert_eq!(topology.final_slot(), 3);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![3, 4, 2, 1]);

        topology.slot_mut(0).release();
        let claim = cycle(&mut topology).unwrap();
        assert!(claim.from_skip);
        assert_eq!(claim.index, 0);
        assert_eq!(topology.linked, 5);
        for start in 0..5 {
            assert_eq!(walk_next(&topology, start, 5), start);
        }
    }

    #[test]
    fn test_exhausted_scan_remembers_rejections() {
        let mut topology = Topology::connect(3).unwrap();
        topology.slot_mut(0).hold();
        topology.slot_mut(1).hold();

        assert_eq!(topology.claim_for_write(), None);
        assert_eq!(topology.skipped.iter().collect::<Vec<_>>(), vec![0, 1]);
        // A failed scan leaves the circle untouched
        assert_eq!(topology.linked, 3);

        // Slot 0 is still `final`; reclaiming it from the skip set moves `final`
        topology.slot_mut(0).release();
        let claim = cycle(&mut topology).unwrap();
        assert_eq!(claim, Claim { index: 0, from_skip: true, parked: 0 });
        assert_eq!(topology.final_slot(), 1);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![1, 2, 0]);
    }

    #[test]
    fn test_skip_reclaim_from_middle_keeps_final() {
        let mut topology = Topology::connect(4).unwrap();
        topology.slot_mut(0).hold();
        topology.slot_mut(1).hold();
        topology.slot_mut(2).hold();
        // Scan rejects 0, 1, 2 and fails at current
        assert_eq!(topology.claim_for_write(), None);

        topology.slot_mut(1).release();
        let claim = cycle(&mut topology).unwrap();
        assert_eq!(claim.index, 1);
        assert!(claim.from_skip);
        assert_eq!(topology.final_slot(), 0);
        assert_eq!(topology.oldest_first().collect::<Vec<_>>(), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_readable_skips_slot_being_written() {
        let mut topology = Topology::connect(3).unwrap();
        let claim = cycle(&mut topology).unwrap();
        topology.slot_mut(claim.index).begin_write();

        assert_eq!(topology.readable_newest_first().collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(topology.readable_len(), 2);
    }

    #[test]
    fn test_snapshot_display() {
        let mut topology = Topology::connect(3).unwrap();
        assert_eq!(topology.snapshot().to_string(), "[0] -> 1 -> {2} (3 linked)");

        let claim = cycle(&mut topology).unwrap();
        topology.slot_mut(claim.index).begin_write();
        assert_eq!(topology.snapshot().to_string(), "[1] -> 2 -> {0*} (3 linked)");
    }
}
