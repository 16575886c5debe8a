/*!
 * Slot Store
 * Fine-grained locking: one lock per fixed index
 */

use crate::core::config::HarnessConfig;
use crate::core::errors::{CollectionError, CollectionResult};
use crate::core::limits::CACHE_LINE_SIZE;
use parking_lot::Mutex;
use tracing::trace;

/// A single slot, padded to its own cache line
#[repr(C, align(64))] // Cache-line aligned to prevent false sharing
#[derive(Debug)]
struct Slot<T> {
    value: Mutex<Option<T>>,
}

const _: () = assert!(std::mem::align_of::<Slot<()>>() >= CACHE_LINE_SIZE);

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            value: Mutex::new(None),
        }
    }
}

/// Fixed-capacity array of optional elements with a lock per index
///
/// # Guarantees
///
/// - **Disjoint indices never contend**: an operation on index `i` touches
///   only slot `i`'s lock
/// - **Same index is mutually exclusive**: operations on one slot are
///   linearizable
/// - **Bounds checked first**: an out-of-range index fails before any lock
///   is acquired
///
/// # Example
///
/// ```
/// use concurrency_core::collections::SlotStore;
///
/// let store = SlotStore::new(4);
/// store.set(1, "a").unwrap();
/// assert_eq!(store.get(1).unwrap(), Some("a"));
/// assert!(store.get(4).is_err());
/// ```
#[derive(Debug)]
pub struct SlotStore<T> {
    slots: Box<[Slot<T>]>,
}

impl<T> SlotStore<T> {
    /// Create a store with `capacity` empty slots
    ///
    /// `capacity` must be non-zero
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "SlotStore capacity must be > 0");

        let slots: Vec<Slot<T>> = (0..capacity).map(|_| Slot::empty()).collect();
        Self {
            slots: slots.into_boxed_slice(),
        }
    }

    /// Create a store sized by `config.slot_capacity`
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.slot_capacity)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn slot(&self, index: usize) -> CollectionResult<&Slot<T>> {
        self.slots.get(index).ok_or(CollectionError::OutOfRange {
            index,
            len: self.slots.len(),
        })
    }

    /// Store `element` at `index`, returning the previous occupant
    pub fn set(&self, index: usize, element: T) -> CollectionResult<Option<T>> {
        let slot = self.slot(index)?;
        let previous = slot.value.lock().replace(element);
        trace!(index, replaced = previous.is_some(), "slot set");
        Ok(previous)
    }

    /// Empty the slot at `index`, returning what it held
    pub fn clear(&self, index: usize) -> CollectionResult<Option<T>> {
        let slot = self.slot(index)?;
        let previous = slot.value.lock().take();
        trace!(index, cleared = previous.is_some(), "slot clear");
        Ok(previous)
    }

    /// Alias of [`clear`](Self::clear) for callers that want the value
    pub fn take(&self, index: usize) -> CollectionResult<Option<T>> {
        self.clear(index)
    }

    /// Run `f` holding only the lock for `index`
    pub fn with_slot<F, R>(&self, index: usize, f: F) -> CollectionResult<R>
    where
        F: FnOnce(&mut Option<T>) -> R,
    {
        let slot = self.slot(index)?;
        let mut value = slot.value.lock();
        Ok(f(&mut value))
    }

    /// Number of filled slots
    ///
    /// Locks one slot at a time, never two at once, so the count is not a
    /// consistent snapshot under concurrent writes.
    pub fn occupied(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.value.lock().is_some())
            .count()
    }
}

impl<T: Clone> SlotStore<T> {
    /// Copy of the element at `index`, if any
    pub fn get(&self, index: usize) -> CollectionResult<Option<T>> {
        let slot = self.slot(index)?;
        let value = slot.value.lock().clone();
        Ok(value)
    }

    /// Per-slot copies, taken one lock at a time
    pub fn snapshot(&self) -> Vec<Option<T>> {
        self.slots
            .iter()
            .map(|slot| slot.value.lock().clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_starts_empty() {
        let store: SlotStore<u32> = SlotStore::new(3);
        assert_eq!(store.capacity(), 3);
        assert_eq!(store.occupied(), 0);
        assert_eq!(store.snapshot(), vec![None, None, None]);
    }

    #[test]
    fn test_from_config_uses_slot_capacity() {
        let config = HarnessConfig::quick().with_slot_capacity(7);
        let store: SlotStore<u8> = SlotStore::from_config(&config);
        assert_eq!(store.capacity(), 7);
        assert!(store.get(7).is_err());
    }

    #[test]
    fn test_set_get_clear() {
        let store = SlotStore::new(4);

        assert_eq!(store.set(2, 10).unwrap(), None);
        assert_eq!(store.set(2, 20).unwrap(), Some(10));
        assert_eq!(store.get(2).unwrap(), Some(20));
        assert_eq!(store.occupied(), 1);

        assert_eq!(store.clear(2).unwrap(), Some(20));
        assert_eq!(store.get(2).unwrap(), None);
        assert_eq!(store.take(2).unwrap(), None);
    }

    #[test]
    fn test_out_of_range() {
        let store: SlotStore<u8> = SlotStore::new(5);
        let expected = CollectionError::OutOfRange { index: 5, len: 5 };

        assert_eq!(store.get(5), Err(expected.clone()));
        assert_eq!(store.set(5, 1), Err(expected.clone()));
        assert_eq!(store.clear(5), Err(expected.clone()));
        assert_eq!(store.with_slot(5, |_| ()), Err(expected));
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_rejected() {
        let _store: SlotStore<u8> = SlotStore::new(0);
    }

    #[test]
    fn test_slot_alignment() {
        assert!(std::mem::align_of::<Slot<u8>>() >= CACHE_LINE_SIZE);
    }

    #[test]
    fn test_held_slot_does_not_block_neighbour() {
        let store = Arc::new(SlotStore::new(2));
        let (held_tx, held_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let holder = {
            let store = store.clone();
            thread::spawn(move || {
                store
                    .with_slot(0, |value| {
                        *value = Some(1);
                        held_tx.send(()).unwrap();
                        release_rx.recv().unwrap();
                    })
                    .unwrap();
            })
        };

        held_rx.recv().unwrap();

        // Slot 0 is locked; slot 1 must still be usable from another thread
        let (done_tx, done_rx) = mpsc::channel();
        {
            let store = store.clone();
            thread::spawn(move || {
                store.set(1, 2).unwrap();
                store.clear(1).unwrap();
                store.set(1, 3).unwrap();
                done_tx.send(()).unwrap();
            });
        }
        assert!(done_rx.recv_timeout(Duration::from_secs(1)).is_ok());

        release_tx.send(()).unwrap();
        holder.join().unwrap();
        assert_eq!(store.snapshot(), vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_concurrent_disjoint_indices() {
        let store = Arc::new(SlotStore::new(8));
        let mut handles = vec![];

        for i in 0..8 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                for j in 0..1000 {
                    store.set(i, j).unwrap();
                    assert_eq!(store.get(i).unwrap(), Some(j));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.snapshot(), vec![Some(999); 8]);
    }
}
