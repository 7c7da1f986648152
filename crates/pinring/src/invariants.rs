//! Debug assertion macros for ring invariants.
//!
//! Only active in debug builds (`debug_assert!`), so release builds pay
//! nothing. A failure here is a misuse or an internal bug, never a
//! recoverable condition.

// =============================================================================
// Cut: the ring is open between `final` and `current`
// =============================================================================

/// Assert that `current.next == final` and `final.prev == current`.
///
/// Used in: `Topology::advance_current()`, `Topology::detach()`
macro_rules! debug_assert_cut {
    ($topology:expr) => {
        debug_assert!(
            $topology.next_of($topology.current()) == $topology.final_slot()
                && $topology.prev_of($topology.final_slot()) == $topology.current(),
            "ring cut violated: current {} -> {}, final {} <- {}",
            $topology.current(),
            $topology.next_of($topology.current()),
            $topology.final_slot(),
            $topology.prev_of($topology.final_slot())
        )
    };
}

// =============================================================================
// Pins: counts never go negative, published slots only
// =============================================================================

/// Assert that a slot being unpinned actually holds a pin.
///
/// Used in: `Slot::release()`
macro_rules! debug_assert_pinned {
    ($index:expr, $pins:expr) => {
        debug_assert!(
            $pins > 0,
            "pin released twice: slot {} has no outstanding pins",
            $index
        )
    };
}

/// Assert that a reader is about to pin a published slot.
///
/// Used in: `Slot::hold()`
macro_rules! debug_assert_readable {
    ($index:expr, $valid:expr) => {
        debug_assert!($valid, "reader pinned slot {} while it is being written", $index)
    };
}

/// Assert that no holder outlives the ring.
///
/// Used in: `Drop for Ring`
macro_rules! debug_assert_no_outstanding_pins {
    ($index:expr, $pins:expr) => {
        debug_assert!(
            $pins == 0,
            "ring dropped while slot {} still has {} pins",
            $index,
            $pins
        )
    };
}

// =============================================================================
// Publish order
// =============================================================================

/// Assert that publish sequence numbers strictly increase.
///
/// Used in: `Ring::publish()`
macro_rules! debug_assert_monotonic_seq {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new > $old,
            "publish sequence went from {} to {}",
            $old,
            $new
        )
    };
}

pub(crate) use debug_assert_cut;
pub(crate) use debug_assert_monotonic_seq;
pub(crate) use debug_assert_no_outstanding_pins;
pub(crate) use debug_assert_pinned;
pub(crate) use debug_assert_readable;
