/*!
 * Split Counter List
 *
 * A list whose length is tracked by a separate atomic counter that is
 * updated *after* the list lock is released. `size()` is a lock-free read,
 * but it is only an approximation while operations are in flight:
 *
 * - between an add's push and its increment, the list is one longer than
 *   the counter reports
 * - a remove can overtake the increment of the add it undoes, driving the
 *   raw counter below zero for an instant
 *
 * Once every in-flight operation has returned, the counter equals the true
 * length. The gap is the point of this structure; do not move the counter
 * update inside the lock.
 */

use crate::core::errors::{CollectionError, CollectionResult};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicIsize, Ordering};
use tracing::trace;

/// List plus an independently synchronized element count
#[derive(Debug)]
pub struct SplitCounterList<T> {
    items: Mutex<Vec<T>>,
    count: AtomicIsize,
}

impl<T> SplitCounterList<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            count: AtomicIsize::new(0),
        }
    }

    /// Append under the list lock, then bump the counter outside it
    pub fn add(&self, element: T) {
        {
            let mut items = self.items.lock();
            items.push(element);
        }
        // Lock released: a concurrent reader may see len = count + 1 here
        let count = self.count.fetch_add(1, Ordering::AcqRel) + 1;
        trace!(count, "split_counter add");
    }

    /// Lock-free element count
    ///
    /// Clamped at zero; see [`raw_count`](Self::raw_count) for the signed value.
    pub fn size(&self) -> usize {
        self.raw_count().max(0) as usize
    }

    /// Signed counter value, possibly transiently negative
    pub fn raw_count(&self) -> isize {
        self.count.load(Ordering::Acquire)
    }

    /// Length of the backing list, read under the lock
    pub fn true_len(&self) -> usize {
        self.items.lock().len()
    }

    /// Counter minus true length
    ///
    /// The two reads are not taken at the same instant, so a non-zero value
    /// during concurrent activity is expected. It is zero at quiescence.
    pub fn drift(&self) -> isize {
        let len = self.true_len() as isize;
        self.raw_count() - len
    }

    /// Read-only access to the backing list with its lock held
    ///
    /// The counter is not touched, so `size()` stays callable while `f` runs.
    pub fn with_list<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let items = self.items.lock();
        f(&items)
    }
}

impl<T: PartialEq> SplitCounterList<T> {
    /// Remove the first match under the list lock; decrement the counter
    /// outside it, and only if something was actually removed
    pub fn remove(&self, element: &T) -> bool {
        let removed = {
            let mut items = self.items.lock();
            match items.iter().position(|item| item == element) {
                Some(index) => {
                    items.remove(index);
                    true
                }
                None => false,
            }
        };

        if removed {
            let count = self.count.fetch_sub(1, Ordering::AcqRel) - 1;
            trace!(count, "split_counter remove");
        }
        removed
    }
}

impl<T: Clone> SplitCounterList<T> {
    /// Element at `index`, read under the list lock
    pub fn get(&self, index: usize) -> CollectionResult<T> {
        let items = self.items.lock();
        items
            .get(index)
            .cloned()
            .ok_or(CollectionError::OutOfRange {
                index,
                len: items.len(),
            })
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T> Default for SplitCounterList<T> {
    fn default() -> Self {
        Self::new()
    }
}
