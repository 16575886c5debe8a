/*!
 * Synchronization Primitives
 *
 * Wait/notify building blocks shared by the blocking structures:
 * - `WaitSignal`: condvar with waiter accounting, used for the
 *   not-full / not-empty conditions of the bounded channel
 * - `WakeResult`: observable outcome of a notify
 */

mod signal;

pub use signal::{WaitSignal, WakeResult};
