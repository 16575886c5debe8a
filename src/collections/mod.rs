/*!
 * Shared Collections
 *
 * In-memory structures mutated concurrently by worker threads:
 * - `GuardedList`: coarse-grained, one lock for the whole list
 * - `SplitCounterList`: list lock plus a lock-free counter updated outside
 *   it; the count is only eventually consistent
 * - `SlotStore`: fixed array with one lock per index
 * - `SharedCounter`: atomic vs. mutex-guarded counter
 */

mod counter;
mod guarded_list;
mod slot_store;
mod split_counter;

// Re-export public API
pub use counter::{CounterStrategy, SharedCounter};
pub use guarded_list::GuardedList;
pub use slot_store::SlotStore;
pub use split_counter::SplitCounterList;
