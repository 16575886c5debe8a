/*!
 * Shared Counter
 * Lock-based and lock-free counters behind one interface
 */

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Synchronization strategy backing a [`SharedCounter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterStrategy {
    /// Lock-free `fetch_add`
    Atomic,
    /// Read-modify-write under a mutex
    Locked,
}

/// Counter that is either an atomic or a mutex-guarded integer
///
/// Both variants are exact: after `n` workers each call `increment()` `k`
/// times and are joined, `get()` returns `n * k`.
#[derive(Debug)]
pub enum SharedCounter {
    Atomic(AtomicU64),
    Locked(Mutex<u64>),
}

impl SharedCounter {
    pub fn new(strategy: CounterStrategy) -> Self {
        match strategy {
            CounterStrategy::Atomic => Self::Atomic(AtomicU64::new(0)),
            CounterStrategy::Locked => Self::Locked(Mutex::new(0)),
        }
    }

    #[inline]
    pub fn atomic() -> Self {
        Self::new(CounterStrategy::Atomic)
    }

    #[inline]
    pub fn locked() -> Self {
        Self::new(CounterStrategy::Locked)
    }

    /// Add one, returning the previous value
    #[inline(always)]
    pub fn increment(&self) -> u64 {
        self.add(1)
    }

    /// Add `delta`, returning the previous value
    #[inline(always)]
    pub fn add(&self, delta: u64) -> u64 {
        match self {
            Self::Atomic(a) => a.fetch_add(delta, Ordering::AcqRel),
            Self::Locked(m) => {
                let mut guard = m.lock();
                let old = *guard;
                *guard += delta;
                old
            }
        }
    }

    #[inline(always)]
    pub fn get(&self) -> u64 {
        match self {
            Self::Atomic(a) => a.load(Ordering::Acquire),
            Self::Locked(m) => *m.lock(),
        }
    }

    pub fn strategy(&self) -> CounterStrategy {
        match self {
            Self::Atomic(_) => CounterStrategy::Atomic,
            Self::Locked(_) => CounterStrategy::Locked,
        }
    }
}
