//! Error types for ring operations.

use thiserror::Error;

/// Errors returned by [`Ring`](crate::Ring) construction and access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// The ring was configured with zero slots.
    #[error("invalid configuration: capacity must be at least 1 (got {capacity})")]
    InvalidConfiguration {
        /// The rejected capacity.
        capacity: usize,
    },

    /// Every slot is pinned by a reader or otherwise unavailable for writing.
    #[error("ring buffer is full: no reusable slot among {capacity}")]
    BufferFull {
        /// Total number of slots in the ring.
        capacity: usize,
    },

    /// The requested position lies outside the readable window.
    #[error("requested position {requested} but only {available} readable slots")]
    OutOfRange {
        /// Zero-based position that was asked for.
        requested: usize,
        /// Number of readable slots at the time of the call.
        available: usize,
    },
}

impl RingError {
    /// Returns `true` if retrying the operation later may succeed.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::BufferFull { .. } | Self::OutOfRange { .. })
    }

    /// Returns `true` if the ring cannot be used at all.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}
