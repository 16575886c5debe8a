/*!
 * Guarded List
 * Coarse-grained locking: one exclusive lock around the whole sequence
 */

use crate::core::errors::{CollectionError, CollectionResult};
use parking_lot::Mutex;
use tracing::trace;

/// Insertion-ordered sequence behind a single mutex
///
/// Every operation holds the lock for its full duration, so each one is
/// linearizable and no reader ever sees a half-applied mutation. The guard
/// is released on every exit path, including unwinding out of a closure
/// passed to [`GuardedList::with_locked`].
///
/// # Example
///
/// ```
/// use concurrency_core::collections::GuardedList;
///
/// let list = GuardedList::new();
/// list.add(1);
/// list.add(2);
/// assert!(list.remove(&1));
/// assert_eq!(list.get(0).unwrap(), 2);
/// assert_eq!(list.size(), 1);
/// ```
#[derive(Debug)]
pub struct GuardedList<T> {
    items: Mutex<Vec<T>>,
}

impl<T> GuardedList<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append an element
    pub fn add(&self, element: T) {
        let mut items = self.items.lock();
        items.push(element);
        trace!(len = items.len(), "guarded_list add");
    }

    /// Number of elements
    pub fn size(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Remove and return the last element
    pub fn pop(&self) -> CollectionResult<T> {
        self.items.lock().pop().ok_or(CollectionError::Empty)
    }

    /// Remove every element
    pub fn clear(&self) {
        self.items.lock().clear();
    }

    /// Run `f` with the lock held for a compound operation
    ///
    /// Iterating and modifying inside one call is safe; doing the same
    /// through separate calls would interleave with other threads.
    pub fn with_locked<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Vec<T>) -> R,
    {
        let mut items = self.items.lock();
        f(&mut items)
    }

    /// Consume the list, returning its contents
    pub fn into_inner(self) -> Vec<T> {
        self.items.into_inner()
    }
}

impl<T: PartialEq> GuardedList<T> {
    /// Remove the first element equal to `element`
    ///
    /// Returns `false` (and changes nothing) if no element matches.
    pub fn remove(&self, element: &T) -> bool {
        let mut items = self.items.lock();
        match items.iter().position(|item| item == element) {
            Some(index) => {
                items.remove(index);
                trace!(index, len = items.len(), "guarded_list remove");
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, element: &T) -> bool {
        self.items.lock().contains(element)
    }
}

impl<T: Clone> GuardedList<T> {
    /// Element at `index`
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

    /// Consistent copy of the contents
    pub fn snapshot(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T> Default for GuardedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for GuardedList<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}
