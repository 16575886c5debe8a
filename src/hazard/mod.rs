/*!
 * Lock Order Hazards
 *
 * `LockOrderHazard` reproduces a circular wait: two workers take the same
 * two locks in opposite order and never finish. It has no timeout and no
 * escape; callers bound it with [`crate::workload::join_within`].
 *
 * `OrderedPair` is the same pair of workers acquiring in one global rank
 * order, which always completes.
 */

mod lock_order;
mod ordered;

pub use lock_order::{HazardSchedule, LockOrderHazard, ResourceId};
pub use ordered::OrderedPair;
