use crate::invariants::{debug_assert_monotonic_seq, debug_assert_no_outstanding_pins};
use crate::sync::{Condvar, Mutex, MutexGuard};
use crate::topology::{Topology, TopologySnapshot};
use crate::{Config, Holder, MetricsSnapshot, RingBuilder, RingError, WriteSlot};
use crossbeam_utils::Backoff;
use std::cell::UnsafeCell;
use std::sync::PoisonError;
use std::time::Instant;

// =============================================================================
// SYNCHRONIZATION STRATEGY
// =============================================================================
//
// One mutex guards the whole topology: links, `current`/`final`, validity
// flags, pin counts, the skip set and the publish counter. One condvar
// (`published`) is broadcast on every publish and is the only thing any
// blocking call waits on.
//
// Payloads are *not* behind the mutex. Each slot's value sits in an
// `UnsafeCell` and is accessed without the lock under this protocol:
//
// - A `WriteSlot` exists only for a slot that was claimed with `pins == 0`
//   and marked invalid under the lock. No reader can pin an invalid slot, so
//   the producer has exclusive access until `publish` marks it valid again.
// - A `Holder` exists only for a slot pinned under the lock while valid. The
//   producer never claims a pinned slot, so the value cannot change while any
//   holder is alive.
//
// Lock acquire/release provides the happens-before edges between the
// producer's writes and readers' subsequent reads.
//
// The critical sections never leave the topology half-updated on panic (only
// debug assertions can panic inside them), so a poisoned lock is recovered
// rather than propagated.
// =============================================================================

/// State guarded by the ring lock.
struct State {
    topology: Topology,
    /// Sequence number of the latest published slot.
    last_seq: u64,
    /// Number of `publish` calls so far.
    publishes: u64,
    metrics: MetricsSnapshot,
}

/// Phases of a blocking read.
///
/// Every wake-up goes back through the predicate, so spurious or unrelated
/// wake-ups are harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitState {
    Idle,
    WaitingForPublish,
    Woken,
}

/// Fixed-capacity ring with one producer and any number of pinning readers.
///
/// The producer claims a slot with [`acquire_for_write`](Self::acquire_for_write),
/// mutates it in place and [`publish`](Self::publish)es it. Readers obtain
/// [`Holder`]s, which pin their slot so the producer skips it until the holder
/// is dropped.
///
/// Readers only ever see published slots. Slots start out published, holding
/// the values the ring was built with (the `Default` value for
/// [`Ring::new`]), with sequence numbers `0..capacity` in ring order; real
/// publishes continue from `capacity`.
///
/// Exactly one thread is expected to produce. This is a usage contract, not a
/// safety requirement: concurrent writers each get distinct slots, but the
/// window order then follows claim order rather than publish order.
///
/// # Example
///
/// ```
/// use pinring_rs::Ring;
///
/// let ring = Ring::<u64>::new(4).unwrap();
///
/// let mut slot = ring.acquire_for_write().unwrap();
/// *slot = 42;
/// slot.publish();
///
/// let latest = ring.current().unwrap();
/// assert_eq!(*latest, 42);
/// ```
pub struct Ring<T> {
    state: Mutex<State>,
    /// Broadcast after every publish.
    published: Condvar,
    cells: Box<[UnsafeCell<T>]>,
    config: Config,
}

// Safety: payload access follows the pin/validity protocol above. Readers on
// several threads share `&T` (needs `T: Sync`); the producer may run on any
// thread and hands values across (needs `T: Send`).
unsafe impl<T: Send> Send for Ring<T> {}
unsafe impl<T: Send + Sync> Sync for Ring<T> {}

impl<T: Default> Ring<T> {
    /// Creates a ring of `capacity` default-constructed slots.
    pub fn new(capacity: usize) -> Result<Self, RingError> {
        Self::with_config(Config::default().with_capacity(capacity))
    }

    /// Creates a ring of default-constructed slots from a configuration.
    pub fn with_config(config: Config) -> Result<Self, RingError> {
        config.validate()?;
        let values = (0..config.capacity).map(|_| T::default()).collect();
        Self::from_parts(values, config)
    }
}

impl<T> Ring<T> {
    /// Creates a ring that takes ownership of pre-built values, one per slot.
    ///
    /// `values[0]` becomes the oldest slot and the last value the current one.
    pub fn from_values(values: Vec<T>) -> Result<Self, RingError> {
        RingBuilder::new().extend_values(values).connect()
    }

    pub(crate) fn from_parts(values: Vec<T>, config: Config) -> Result<Self, RingError> {
        let topology = Topology::connect(values.len())?;
        let capacity = values.len();
        let cells = values.into_iter().map(UnsafeCell::new).collect();

        tracing::debug!(capacity, "ring connected");

        Ok(Self {
            state: Mutex::new(State {
                topology,
                last_seq: capacity as u64 - 1,
                publishes: 0,
                metrics: MetricsSnapshot::new(),
            }),
            published: Condvar::new(),
            cells,
            config: Config {
                capacity,
                ..config
            },
        })
    }

    // ---------------------------------------------------------------------
    // STATUS
    // ---------------------------------------------------------------------

    /// Returns the number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Returns how many values have been published.
    pub fn published(&self) -> u64 {
        self.lock().publishes
    }

    /// Returns how many slots currently hold at least one pin.
    pub fn pinned_slots(&self) -> usize {
        self.lock().topology.pinned_slots()
    }

    /// Returns the number of slots remembered from earlier reuse scans.
    pub fn skipped_len(&self) -> usize {
        self.lock().topology.skipped_len()
    }

    /// Returns the number of published slots in the readable window.
    pub fn readable_len(&self) -> usize {
        self.lock().topology.readable_len()
    }

    /// Get a snapshot of metrics if enabled.
    pub fn metrics(&self) -> MetricsSnapshot {
        if self.config.enable_metrics {
            self.lock().metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    /// Returns the current layout of the ring, for debugging.
    pub fn snapshot(&self) -> TopologySnapshot {
        self.lock().topology.snapshot()
    }

    // ---------------------------------------------------------------------
    // PRODUCER API
    // ---------------------------------------------------------------------

    /// Claims a slot for writing.
    ///
    /// Slots rejected by an earlier scan are tried first, then the ring is
    /// scanned from the oldest slot. The claimed slot becomes `current` but
    /// stays invisible to readers until published.
    ///
    /// `current` itself is never a candidate, pinned or not, so the ring
    /// stays full until some slot other than `current` is released.
    ///
    /// Returns [`RingError::BufferFull`] when every candidate is pinned; the
    /// caller decides whether to retry, back off or drop the value.
    pub fn acquire_for_write(&self) -> Result<WriteSlot<'_, T>, RingError> {
        let mut state = self.lock();
        let enable_metrics = self.config.enable_metrics;

        let Some(claim) = state.topology.claim_for_write() else {
            if enable_metrics {
                state.metrics.buffer_full += 1;
            }
            tracing::debug!(
                capacity = self.capacity(),
                pinned = state.topology.pinned_slots(),
                "no reusable slot"
            );
            return Err(RingError::BufferFull {
                capacity: self.capacity(),
            });
        };

        state.topology.slot_mut(claim.index).begin_write();
        state.topology.advance_current(claim.index);

        if enable_metrics {
            state.metrics.slots_acquired += 1;
            state.metrics.slots_parked += claim.parked as u64;
            if claim.from_skip {
                state.metrics.skip_set_hits += 1;
            }
        }

        tracing::trace!(
            slot = claim.index,
            from_skip = claim.from_skip,
            parked = claim.parked,
            "slot claimed for writing"
        );

        Ok(WriteSlot::new(self, claim.index))
    }

    /// Claims a slot, spinning and then yielding while the ring is full.
    ///
    /// Gives up with [`RingError::BufferFull`] once the backoff is exhausted.
    pub fn acquire_for_write_with_backoff(&self) -> Result<WriteSlot<'_, T>, RingError> {
        let backoff = Backoff::new();
        loop {
            match self.acquire_for_write() {
                Ok(slot) => return Ok(slot),
                Err(err) if backoff.is_completed() => return Err(err),
                Err(_) => backoff.snooze(),
            }
        }
    }

    /// Publishes a written slot and wakes every blocked reader.
    ///
    /// Returns the slot's sequence number.
    ///
    /// # Panics
    ///
    /// Panics if `slot` was claimed from a different ring.
    pub fn publish(&self, slot: WriteSlot<'_, T>) -> u64 {
        assert!(
            std::ptr::eq(slot.ring(), self),
            "write slot published to a ring it was not claimed from"
        );
        slot.publish()
    }

    /// Overwrites the next reusable slot with `value` and publishes it.
    pub fn write(&self, value: T) -> Result<u64, RingError> {
        let mut slot = self.acquire_for_write()?;
        *slot = value;
        Ok(slot.publish())
    }

    /// Mutates the next reusable slot in place and publishes it.
    ///
    /// The closure sees whatever value the slot held before, which lets
    /// callers reuse allocations.
    pub fn write_with<F>(&self, update: F) -> Result<u64, RingError>
    where
        F: FnOnce(&mut T),
    {
        let mut slot = self.acquire_for_write()?;
        update(&mut slot);
        Ok(slot.publish())
    }

    /// Internal: mark a written slot readable. Called by `WriteSlot`.
    pub(crate) fn commit(&self, index: usize) -> u64 {
        let mut state = self.lock();

        let seq = state.last_seq + 1;
        debug_assert_monotonic_seq!(state.last_seq, seq);
        state.last_seq = seq;
        state.publishes += 1;
        state.topology.slot_mut(index).finish_write(seq, Instant::now());

        if self.config.enable_metrics {
            state.metrics.slots_published += 1;
        }

        self.published.notify_all();
        seq
    }

    /// Internal: a `WriteSlot` went away without being published.
    pub(crate) fn strand(&self, index: usize) {
        tracing::warn!(
            slot = index,
            "write slot dropped without publish; slot is no longer usable"
        );
    }

    // ---------------------------------------------------------------------
    // CONSUMER API
    // ---------------------------------------------------------------------

    /// Pins the most recently published slot.
    ///
    /// Returns `None` only if no published slot is left in the window, which
    /// can happen only after writes were abandoned.
    pub fn current(&self) -> Option<Holder<'_, T>> {
        self.select(|topology| topology.readable_newest_first().next())
    }

    /// Pins the `n`-th most recent published slot (`nth(0)` is `current`).
    ///
    /// Returns `None` if that would step past the oldest slot.
    pub fn nth(&self, n: usize) -> Option<Holder<'_, T>> {
        self.select(|topology| topology.readable_newest_first().nth(n))
    }

    /// Like [`nth`](Self::nth) but reports how many slots were available.
    pub fn try_nth(&self, n: usize) -> Result<Holder<'_, T>, RingError> {
        let mut state = self.lock();
        let found = state.topology.readable_newest_first().nth(n);
        match found {
            Some(index) => Ok(self.pin(&mut state, index)),
            None => Err(RingError::OutOfRange {
                requested: n,
                available: state.topology.readable_len(),
            }),
        }
    }

    /// Pins up to `n` published slots, newest first.
    ///
    /// Asking for more than are readable returns everything available.
    pub fn current_window(&self, n: usize) -> Vec<Holder<'_, T>> {
        self.select_many(|topology| topology.readable_newest_first().take(n).collect())
    }

    /// Pins the oldest published slot in the window.
    pub fn oldest(&self) -> Option<Holder<'_, T>> {
        self.select(|topology| topology.readable_oldest_first().next())
    }

    /// Pins up to `n` published slots, oldest first.
    pub fn oldest_window(&self, n: usize) -> Vec<Holder<'_, T>> {
        self.select_many(|topology| topology.readable_oldest_first().take(n).collect())
    }

    /// Pins the oldest readable slot published after `holder`'s slot.
    pub fn next_after(&self, holder: &Holder<'_, T>) -> Option<Holder<'_, T>> {
        let seq = holder.seq();
        self.select(|topology| topology.first_after(seq))
    }

    /// Pins the newest readable slot published before `holder`'s slot.
    pub fn prev_before(&self, holder: &Holder<'_, T>) -> Option<Holder<'_, T>> {
        let seq = holder.seq();
        self.select(|topology| topology.last_before(seq))
    }

    /// Blocks until a value is published after this call starts, then pins
    /// the oldest such slot still readable.
    pub fn next_wait(&self) -> Holder<'_, T> {
        self.wait_until(None, |topology, baseline| topology.first_after(baseline))
    }

    /// Blocks until a slot published after `holder`'s is readable, then pins
    /// the oldest one. Returns immediately if one already is.
    pub fn next_wait_after(&self, holder: &Holder<'_, T>) -> Holder<'_, T> {
        self.wait_until(Some(holder.seq()), |topology, baseline| {
            topology.first_after(baseline)
        })
    }

    /// Collects `n` successive new slots, blocking for each in turn.
    ///
    /// `n` is capped at the ring capacity so a reader cannot pin the producer
    /// out of every slot while waiting for more.
    pub fn next_wait_window(&self, n: usize) -> Vec<Holder<'_, T>> {
        let n = n.min(self.capacity());
        let mut holders: Vec<Holder<'_, T>> = Vec::with_capacity(n);
        for _ in 0..n {
            let holder = match holders.last() {
                Some(last) => self.next_wait_after(last),
                None => self.next_wait(),
            };
            holders.push(holder);
        }
        holders
    }

    /// Blocks until anything is published after this call starts, then pins
    /// the newest readable slot.
    pub fn wait_for_new(&self) -> Holder<'_, T> {
        self.wait_until(None, |topology, baseline| {
            topology
                .readable_newest_first()
                .next()
                .filter(|&index| topology.slot(index).seq() > baseline)
        })
    }

    // ---------------------------------------------------------------------
    // PIN MANAGEMENT (Holder plumbing)
    // ---------------------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn select<F>(&self, pick: F) -> Option<Holder<'_, T>>
    where
        F: FnOnce(&Topology) -> Option<usize>,
    {
        let mut state = self.lock();
        let index = pick(&state.topology)?;
        Some(self.pin(&mut state, index))
    }

    fn select_many<F>(&self, pick: F) -> Vec<Holder<'_, T>>
    where
        F: FnOnce(&Topology) -> Vec<usize>,
    {
        let mut state = self.lock();
        let indices = pick(&state.topology);
        indices
            .into_iter()
            .map(|index| self.pin(&mut state, index))
            .collect()
    }

    /// Waits on the publish condvar until `ready` yields a slot.
    ///
    /// `baseline` defaults to the latest sequence number at the moment the
    /// lock is first taken, so the check and the wait cannot miss a publish.
    fn wait_until<F>(&self, baseline: Option<u64>, mut ready: F) -> Holder<'_, T>
    where
        F: FnMut(&Topology, u64) -> Option<usize>,
    {
        let mut state = self.lock();
        let baseline = baseline.unwrap_or(state.last_seq);
        let mut wait = WaitState::Idle;

        loop {
            wait = match wait {
                WaitState::Idle | WaitState::Woken => {
                    if let Some(index) = ready(&state.topology, baseline) {
                        return self.pin(&mut state, index);
                    }
                    if wait == WaitState::Woken {
                        tracing::trace!(baseline, "woken without a matching slot");
                    }
                    WaitState::WaitingForPublish
                }
                WaitState::WaitingForPublish => {
                    state = self
                        .published
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                    WaitState::Woken
                }
            };
        }
    }

    fn pin(&self, state: &mut State, index: usize) -> Holder<'_, T> {
        let slot = state.topology.slot_mut(index);
        slot.hold();
        let (seq, published_at) = (slot.seq(), slot.published_at());
        if self.config.enable_metrics {
            state.metrics.pins_taken += 1;
        }
        Holder::new(self, index, seq, published_at)
    }

    /// Internal: take one more pin on a slot already pinned by a holder.
    pub(crate) fn repin(&self, index: usize) {
        let mut state = self.lock();
        state.topology.slot_mut(index).hold();
        if self.config.enable_metrics {
            state.metrics.pins_taken += 1;
        }
    }

    /// Internal: drop one pin. Only reachable from `Holder::drop`.
    pub(crate) fn unpin(&self, index: usize) {
        let mut state = self.lock();
        state.topology.slot_mut(index).release();
        if self.config.enable_metrics {
            state.metrics.pins_released += 1;
        }
    }

    /// Internal: raw payload pointer for `Holder` and `WriteSlot`.
    #[inline]
    pub(crate) fn cell(&self, index: usize) -> *mut T {
        self.cells[index].get()
    }
}

impl<T> Drop for Ring<T> {
    fn drop(&mut self) {
        // Holders borrow the ring, so only a leaked holder can trip this
        let state = self.lock();
        for slot in state.topology.slots() {
            debug_assert_no_outstanding_pins!(slot.index(), slot.pins());
        }
    }
}

impl<T> std::fmt::Debug for Ring<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity())
            .field("layout", &self.snapshot().to_string())
            .finish_non_exhaustive()
    }
}

#[cfg(all(test, not(feature = "loom")))]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn values<T: Copy>(holders: &[Holder<'_, T>]) -> Vec<T> {
        holders.iter().map(|holder| **holder).collect()
    }

    fn filled(capacity: usize, count: u64) -> Ring<u64> {
        let ring = Ring::<u64>::new(capacity).unwrap();
        for value in 0..count {
            ring.write(value).unwrap();
        }
        ring
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        assert_eq!(
            Ring::<u64>::new(0).unwrap_err(),
            RingError::InvalidConfiguration { capacity: 0 }
        );
        assert!(Ring::<u64>::from_values(Vec::new()).is_err());
    }

    #[test]
    fn test_fresh_ring_reads_initial_values() {
        let ring = Ring::from_values(vec![10, 11, 12]).unwrap();
        assert_eq!(*ring.current().unwrap(), 12);
        assert_eq!(*ring.oldest().unwrap(), 10);
        assert_eq!(values(&ring.current_window(5)), vec![12, 11, 10]);
        assert_eq!(ring.published(), 0);
    }

    #[test]
    fn test_end_to_end_capacity_four() {
        let ring = filled(4, 4);

        assert_eq!(*ring.current().unwrap(), 3);
        assert_eq!(values(&ring.oldest_window(4)), vec![0, 1, 2, 3]);
        assert_eq!(values(&ring.current_window(4)), vec![3, 2, 1, 0]);

        ring.write(4).unwrap();
        assert_eq!(*ring.oldest().unwrap(), 1);

        let pinned = ring.current_window(4);
        assert_eq!(values(&pinned), vec![4, 3, 2, 1]);
        assert_eq!(
            ring.acquire_for_write().unwrap_err(),
            RingError::BufferFull { capacity: 4 }
        );
    }

    #[test]
    fn test_nth_and_out_of_range() {
        let ring = filled(4, 4);
        assert_eq!(*ring.nth(0).unwrap(), 3);
        assert_eq!(*ring.nth(3).unwrap(), 0);
        assert!(ring.nth(4).is_none());
        assert_eq!(
            ring.try_nth(9).unwrap_err(),
            RingError::OutOfRange { requested: 9, available: 4 }
        );
    }

    #[test]
    fn test_slot_being_written_is_invisible() {
        let ring = filled(3, 3);
        let mut slot = ring.acquire_for_write().unwrap();
        *slot = 99;

        assert_eq!(*ring.current().unwrap(), 2);
        assert_eq!(values(&ring.current_window(3)), vec![2, 1]);
        assert!(ring.nth(2).is_none());

        slot.publish();
        assert_eq!(*ring.current().unwrap(), 99);
    }

    #[test]
    fn test_holder_clone_repins_and_drop_releases() {
        let ring = filled(3, 3);
        let first = ring.current().unwrap();
        let second = first.clone();
        assert_eq!(ring.pinned_slots(), 1);

        drop(first);
        assert_eq!(ring.pinned_slots(), 1);
        second.release();
        assert_eq!(ring.pinned_slots(), 0);
    }

    #[test]
    fn test_release_any_pin_unblocks_writer() {
        let ring = filled(4, 4);
        let mut pinned = ring.oldest_window(4);
        assert!(ring.acquire_for_write().is_err());

        pinned.remove(1);
        let slot = ring.acquire_for_write().unwrap();
        slot.publish();
    }

    #[test]
    fn test_abandoned_write_strands_slot() {
        let ring = filled(3, 3);
        drop(ring.acquire_for_write().unwrap());

        // The stranded slot is never read and never handed out again
        for value in 10..20 {
            ring.write(value).unwrap();
            assert!(ring.current_window(3).iter().all(|h| **h >= 1));
        }
        assert_eq!(ring.readable_len(), 2);
    }

    #[test]
    fn test_next_after_and_prev_before() {
        let ring = filled(4, 4);
        let oldest = ring.oldest().unwrap();
        let next = ring.next_after(&oldest).unwrap();
        assert_eq!(*next, 1);
        let back = ring.prev_before(&next).unwrap();
        assert_eq!(*back, 0);
        assert!(ring.prev_before(&oldest).is_none());

        let current = ring.current().unwrap();
        assert!(ring.next_after(&current).is_none());
    }

    #[test]
    fn test_next_wait_after_returns_immediately_when_behind() {
        let ring = filled(4, 4);
        let oldest = ring.oldest().unwrap();
        assert_eq!(*ring.next_wait_after(&oldest), 1);
    }

    #[test]
    fn test_wait_for_new_wakes_on_publish() {
        let ring = Arc::new(Ring::<u64>::new(4).unwrap());
        let before = ring.current().unwrap().seq();

        let reader = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let holder = ring.wait_for_new();
                (holder.seq(), *holder)
            })
        };

        // Keep publishing until the reader has observed one
        while !reader.is_finished() {
            ring.write(7).unwrap();
            thread::sleep(Duration::from_millis(5));
        }

        let (seq, value) = reader.join().unwrap();
        assert!(seq > before);
        assert_eq!(value, 7);
    }

    #[test]
    fn test_metrics_track_skip_hits() {
        let ring = Ring::<u64>::with_config(Config::new(4, true)).unwrap();
        let pinned = ring.oldest().unwrap();
        ring.write(1).unwrap();
        drop(pinned);
        ring.write(2).unwrap();

        let metrics = ring.metrics();
        assert_eq!(metrics.slots_published, 2);
        assert_eq!(metrics.slots_parked, 1);
        assert_eq!(metrics.skip_set_hits, 1);
        assert_eq!(metrics.outstanding_pins(), 0);
    }

    #[test]
    fn test_metrics_disabled_by_default() {
        let ring = filled(4, 4);
        assert_eq!(ring.metrics(), MetricsSnapshot::default());
    }

    #[test]
    fn test_backoff_acquire_succeeds_once_pin_released() {
        let ring = filled(4, 4);
        let mut pinned = ring.oldest_window(3);
        assert!(ring.acquire_for_write_with_backoff().is_err());

        let freed = pinned.remove(1).index();
        let slot = ring.acquire_for_write_with_backoff().unwrap();
        assert_eq!(slot.index(), freed);
        slot.publish();
    }

    #[test]
    fn test_backoff_acquire_waits_out_another_thread() {
        let ring = filled(4, 4);

        thread::scope(|s| {
            // Everything but `current` is pinned until the reader lets go
            let pinned = ring.oldest_window(3);
            assert!(ring.acquire_for_write().is_err());
            s.spawn(move || {
                thread::sleep(Duration::from_millis(5));
                drop(pinned);
            });

            let mut slot = loop {
                match ring.acquire_for_write_with_backoff() {
                    Ok(slot) => break slot,
                    Err(err) => assert!(err.is_recoverable()),
                }
            };
            *slot = 42;
            slot.publish();
        });
        assert_eq!(ring.pinned_slots(), 0);
        assert_eq!(*ring.current().unwrap(), 42);
    }

    #[test]
    fn test_next_wait_wakes_on_publish() {
        let ring = Arc::new(filled(4, 4));
        let before = ring.current().unwrap().seq();

        let reader = {
            let ring = Arc::clone(&ring);
            thread::spawn(move || {
                let holder = ring.next_wait();
                (holder.seq(), *holder)
            })
        };

        let mut value = 100;
        while !reader.is_finished() {
            ring.write(value).unwrap();
            value += 1;
            thread::sleep(Duration::from_millis(5));
        }

        // The oldest slot published after the reader started waiting
        let (seq, seen) = reader.join().unwrap();
        assert!(seq > before);
        assert!(seen >= 100);
        assert_eq!(seen - 100, seq - before - 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "still has")]
    fn test_leaked_pin_panics_on_drop_in_debug() {
        let ring = filled(3, 3);
        std::mem::forget(ring.current().unwrap());
        drop(ring);
    }
}
