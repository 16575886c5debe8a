/*!
 * Concurrency Core Library
 * Thread-safe collections, a blocking channel, and a lock order hazard,
 * with a harness for driving them from many workers
 */

pub mod channel;
pub mod collections;
pub mod core;
pub mod hazard;
pub mod monitoring;
pub mod workload;

// Re-exports
pub use channel::{BoundedChannel, Capacity};
pub use collections::{CounterStrategy, GuardedList, SharedCounter, SlotStore, SplitCounterList};
pub use crate::core::errors::*;
pub use crate::core::{HarnessConfig, TimeoutPolicy};
pub use hazard::{HazardSchedule, LockOrderHazard, OrderedPair};
pub use monitoring::init_tracing;
pub use workload::{join_within, Completion, Workload, WorkloadReport};
