//! Lock primitives used by the ring.
//!
//! Under the `loom` feature these resolve to loom's model-checked versions so
//! the publish/wait protocol can be explored exhaustively.

#[cfg(feature = "loom")]
pub(crate) use loom::sync::{Condvar, Mutex, MutexGuard};

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::{Condvar, Mutex, MutexGuard};
