//! pinring - Single-Producer Multi-Consumer Ring with Pinned Reads
//!
//! A fixed set of slots arranged in a ring. One producer keeps overwriting the
//! oldest slot with new data; any number of readers take the latest value, a
//! window of recent values, or block for the next one. Readers *pin* the slots
//! they hold, and the producer steps around pinned slots instead of
//! overwriting them, so a slow reader never sees its data change underneath it
//! and never stalls the producer unless it pins every slot.
//!
//! # Key Features
//!
//! - Slots are updated in place (`&mut T`), so payload allocations are reused
//! - RAII [`Holder`] pins with re-pinning clones
//! - Skip set: slots stepped over while pinned are reclaimed first once free
//! - Latest / nth / windowed / blocking reads, all from one critical section
//! - [`RingError::BufferFull`] as the only backpressure signal
//!
//! # Example
//!
//! ```
//! use pinring_rs::Ring;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let ring = Arc::new(Ring::<u64>::new(8).unwrap());
//!
//! let reader = {
//!     let ring = Arc::clone(&ring);
//!     thread::spawn(move || {
//!         let frame = ring.wait_for_new();
//!         *frame
//!     })
//! };
//!
//! // Publish until the reader has picked something up
//! let mut value = 0;
//! while !reader.is_finished() {
//!     value += 1;
//!     ring.write(value).unwrap();
//!     thread::yield_now();
//! }
//! assert!(reader.join().unwrap() >= 1);
//!
//! // Pinned windows stay stable while the producer keeps going
//! let window = ring.current_window(3);
//! assert_eq!(window.len(), 3);
//! assert!(window.windows(2).all(|w| w[0].seq() > w[1].seq()));
//! ```

mod builder;
mod config;
mod error;
mod holder;
mod invariants;
mod metrics;
mod ring;
mod skip_set;
mod slot;
mod sync;
mod topology;
mod write_slot;

pub use builder::RingBuilder;
pub use config::{Config, HISTORY_CONFIG, LATEST_VALUE_CONFIG};
pub use error::RingError;
pub use holder::Holder;
pub use metrics::MetricsSnapshot;
pub use ring::Ring;
pub use topology::{SlotView, TopologySnapshot};
pub use write_slot::WriteSlot;
