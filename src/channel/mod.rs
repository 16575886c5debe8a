/*!
 * Blocking Channel
 *
 * Bounded (or unbounded) FIFO hand-off between producer and consumer
 * threads, terminated by a sentinel value.
 *
 * # Blocking
 *
 * - `put` parks while the queue is full, `take` while it is empty
 * - Blocking is not an error; callers wanting a bound use the `_timeout`
 *   variants and get `ChannelError::Timeout` on expiry
 */

mod bounded;
pub mod pipeline;

pub use bounded::{BoundedChannel, Capacity};
pub use pipeline::{consume, produce, produce_paced, run_pipeline, PipelineReport};
