//! Type aliases for shared mutable state.
//!
//! The plotter is driven from a worker thread while status queries and
//! reconfiguration arrive from other threads, so the shared types here are all
//! thread-safe and built on `parking_lot` locks.
//!
//! ## Usage
//!
//! ```rust
//! use sketchkit_core::types::*;
//!
//! let counter: ThreadSafe<u32> = thread_safe(0);
//! *counter.lock() += 1;
//! assert_eq!(*counter.lock(), 1);
//! ```

use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// A thread-safe, mutex-protected wrapper for cross-thread sharing.
///
/// Uses `parking_lot::Mutex`, which does not poison on panic: a job that
/// panics while holding the plotter leaves it usable for the next job.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// A thread-safe reader-writer lock wrapper for read-heavy workloads.
///
/// Used for handles that are read on every job but replaced rarely.
pub type ThreadSafeRw<T> = Arc<RwLock<T>>;

/// Create a new `ThreadSafe<T>` from a value.
#[inline]
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

/// Create a new `ThreadSafeRw<T>` from a value.
#[inline]
pub fn thread_safe_rw<T>(value: T) -> ThreadSafeRw<T> {
    Arc::new(RwLock::new(value))
}
