/*!
 * Condvar Wait Signal
 *
 * A `parking_lot::Condvar` paired with a waiter count. The count makes
 * wake results observable (`WakeResult`) and lets callers inspect how many
 * threads are parked on a condition, e.g. producers blocked on a full channel.
 *
 * The signal does not own the mutex it waits with: callers wait on the guard
 * of the lock protecting the condition's state, re-checking the predicate
 * after each wake.
 */

use parking_lot::{Condvar, MutexGuard};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Result of a wake operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeResult {
    /// Successfully woke N waiters (N >= 1)
    Woken(usize),
    /// No waiters were waiting
    NoWaiters,
}

impl WakeResult {
    /// Check if any waiters were woken
    #[inline(always)]
    pub fn is_woken(&self) -> bool {
        matches!(self, WakeResult::Woken(_))
    }

    /// Get number of woken waiters (0 if none)
    #[inline(always)]
    pub fn count(&self) -> usize {
        match self {
            WakeResult::Woken(n) => *n,
            WakeResult::NoWaiters => 0,
        }
    }
}

/// Condition signal with waiter accounting
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
pub struct WaitSignal {
    condvar: Condvar,
    waiters: AtomicUsize,
}

impl WaitSignal {
    pub const fn new() -> Self {
        Self {
            condvar: Condvar::new(),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Block until notified. The guard is released while parked.
    pub fn wait<T>(&self, guard: &mut MutexGuard<'_, T>) {
        self.waiters.fetch_add(1, Ordering::Relaxed);
        self.condvar.wait(guard);
        self.waiters.fetch_sub(1, Ordering::Relaxed);
    }

    /// Block until notified or until `timeout` elapses
    ///
    /// Returns `true` if woken by notify, `false` if timeout occurred.
    pub fn wait_for<T>(&self, guard: &mut MutexGuard<'_, T>, timeout: Duration) -> bool {
        self.waiters.fetch_add(1, Ordering::Relaxed);
        let timed_out = self.condvar.wait_for(guard, timeout).timed_out();
        self.waiters.fetch_sub(1, Ordering::Relaxed);
        !timed_out
    }

    /// Wake one waiter
    pub fn notify_one(&self) -> WakeResult {
        if self.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        if self.condvar.notify_one() {
            WakeResult::Woken(1)
        } else {
            WakeResult::NoWaiters
        }
    }

    /// Wake all waiters
    pub fn notify_all(&self) -> WakeResult {
        if self.waiters.load(Ordering::Relaxed) == 0 {
            return WakeResult::NoWaiters;
        }

        match self.condvar.notify_all() {
            0 => WakeResult::NoWaiters,
            n => WakeResult::Woken(n),
        }
    }

    /// Approximate number of parked threads (for diagnostics)
    pub fn waiters(&self) -> usize {
        self.waiters.load(Ordering::Relaxed)
    }
}

impl Default for WaitSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WaitSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaitSignal")
            .field("waiters", &self.waiters())
            .finish()
    }
}
