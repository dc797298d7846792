//! crates/blog_core/src/sync.rs
//!
//! Shared-state helpers: the advisory "operation in flight" flag carried by
//! each store, and mutex access that survives poisoning.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the data if a previous holder panicked.
///
/// Store mutations are applied in a single step after all checks pass, so
/// a poisoned guard never exposes a half-written collection.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Raised while a store call is suspended on its backend round trip.
///
/// This is a hint for callers (disable the submit button), not a lock. Two
/// calls issued at the same time both run, and the first to finish lowers
/// the flag while the second is still pending.
#[derive(Debug, Default)]
pub struct BusyFlag(AtomicBool);

impl BusyFlag {
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raises the flag until the returned guard is dropped.
    pub fn raise(&self) -> BusyGuard<'_> {
        self.0.store(true, Ordering::Release);
        BusyGuard(&self.0)
    }
}

pub struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
