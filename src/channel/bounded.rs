/*!
 * Bounded Blocking Channel
 *
 * FIFO queue guarded by one mutex with two wait conditions:
 * - `not_full`: producers park here while the queue is at capacity
 * - `not_empty`: consumers park here while the queue is empty
 *
 * The end of the stream is marked by a sentinel value sent exactly once by
 * `close()`. The sentinel cannot be sent as a payload, so it is always the
 * last item ever dequeued.
 */

use crate::core::config::HarnessConfig;
use crate::core::errors::{ChannelError, ChannelResult, CollectionError};
use crate::core::sync::WaitSignal;
use crate::core::timeout::{TimeoutContext, TimeoutPolicy};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, trace};

/// Queue capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Capacity {
    /// At most N queued items; `put` blocks beyond that
    Bounded(usize),
    /// `put` never blocks
    Unbounded,
}

impl Capacity {
    /// Maximum queued items, `None` when unbounded
    #[inline]
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Bounded(n) => Some(*n),
            Self::Unbounded => None,
        }
    }

    #[inline]
    fn is_full(&self, len: usize) -> bool {
        match self {
            Self::Bounded(n) => len >= *n,
            Self::Unbounded => false,
        }
    }
}

struct ChannelState<T> {
    queue: VecDeque<T>,
    /// Set once the sentinel is enqueued
    closed: bool,
}

/// Blocking FIFO channel terminated by a sentinel
///
/// # Ordering
///
/// Items are taken in exactly the order they were put. No reordering, loss
/// or duplication under any interleaving: every transfer happens under the
/// channel mutex.
///
/// # Example
///
/// ```
/// use concurrency_core::channel::BoundedChannel;
///
/// let channel = BoundedChannel::bounded(3, -1);
/// channel.put(1).unwrap();
/// channel.put(2).unwrap();
/// channel.close().unwrap(); // sentinel takes the last free slot
///
/// assert_eq!(channel.take().unwrap(), 1);
/// assert_eq!(channel.take().unwrap(), 2);
/// assert!(channel.is_sentinel(&channel.take().unwrap()));
/// ```
pub struct BoundedChannel<T> {
    state: Mutex<ChannelState<T>>,
    not_full: WaitSignal,
    not_empty: WaitSignal,
    capacity: Capacity,
    sentinel: T,
}

impl<T: Clone + PartialEq> BoundedChannel<T> {
    /// Create a channel with the given capacity and end-of-stream sentinel
    ///
    /// `Capacity::Bounded(0)` is rejected: nothing could ever be put.
    pub fn new(capacity: Capacity, sentinel: T) -> Self {
        assert!(
            capacity != Capacity::Bounded(0),
            "Bounded channel capacity must be > 0"
        );

        let queue = match capacity {
            Capacity::Bounded(n) => VecDeque::with_capacity(n.saturating_add(1)),
            Capacity::Unbounded => VecDeque::new(),
        };

        Self {
            state: Mutex::new(ChannelState {
                queue,
                closed: false,
            }),
            not_full: WaitSignal::new(),
            not_empty: WaitSignal::new(),
            capacity,
            sentinel,
        }
    }

    pub fn bounded(capacity: usize, sentinel: T) -> Self {
        Self::new(Capacity::Bounded(capacity), sentinel)
    }

    pub fn unbounded(sentinel: T) -> Self {
        Self::new(Capacity::Unbounded, sentinel)
    }

    /// Create a channel sized by `config.channel_capacity`
    pub fn from_config(config: &HarnessConfig, sentinel: T) -> Self {
        Self::new(config.channel_capacity, sentinel)
    }

    /// Enqueue `value`, blocking while the queue is full
    pub fn put(&self, value: T) -> ChannelResult<()> {
        self.put_with(value, &TimeoutContext::new(TimeoutPolicy::None))
    }

    /// Enqueue `value`, giving up once `timeout` expires
    pub fn put_timeout(&self, value: T, timeout: TimeoutPolicy) -> ChannelResult<()> {
        self.put_with(value, &TimeoutContext::new(timeout))
    }

    /// Enqueue without blocking
    pub fn try_put(&self, value: T) -> ChannelResult<()> {
        self.reject_sentinel(&value)?;

        let mut state = self.state.lock();
        if state.closed {
            return Err(ChannelError::Closed);
        }
        if let Some(capacity) = self.capacity.limit() {
            if state.queue.len() >= capacity {
                return Err(CollectionError::CapacityExceeded { capacity }.into());
            }
        }

        self.push_locked(&mut state, value);
        Ok(())
    }

    /// Dequeue the oldest item, blocking while the queue is empty
    ///
    /// The sentinel is returned like any other item; check it with
    /// [`is_sentinel`](Self::is_sentinel). After the sentinel has been taken
    /// the channel is drained and `take` fails with `Closed` instead of
    /// blocking forever.
    pub fn take(&self) -> ChannelResult<T> {
        self.take_with(&TimeoutContext::new(TimeoutPolicy::None))
    }

    /// Dequeue, giving up once `timeout` expires
    pub fn take_timeout(&self, timeout: TimeoutPolicy) -> ChannelResult<T> {
        self.take_with(&TimeoutContext::new(timeout))
    }

    /// Dequeue without blocking
    pub fn try_take(&self) -> ChannelResult<T> {
        let mut state = self.state.lock();
        match self.pop_locked(&mut state) {
            Some(value) => Ok(value),
            None if state.closed => Err(ChannelError::Closed),
            None => Err(CollectionError::Empty.into()),
        }
    }

    /// Send the sentinel and stop accepting items
    ///
    /// Blocks for space like `put`. Producers still parked on a full queue
    /// are woken and fail with `Closed`. Closing twice fails with `Closed`.
    pub fn close(&self) -> ChannelResult<()> {
        let mut state = self.state.lock();

        while !state.closed && self.capacity.is_full(state.queue.len()) {
            self.not_full.wait(&mut state);
        }
        if state.closed {
            return Err(ChannelError::Closed);
        }

        state.queue.push_back(self.sentinel.clone());
        state.closed = true;

        self.not_empty.notify_one();
        let rejected = self.not_full.notify_all();
        debug!(
            queued = state.queue.len(),
            woken_producers = rejected.count(),
            "channel closed, sentinel enqueued"
        );
        Ok(())
    }

    /// Check whether `value` is this channel's sentinel
    #[inline]
    pub fn is_sentinel(&self, value: &T) -> bool {
        *value == self.sentinel
    }

    pub fn sentinel(&self) -> &T {
        &self.sentinel
    }

    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    /// Queued items, including a pending sentinel
    pub fn len(&self) -> usize {
        self.state.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().queue.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Producers currently parked on a full queue
    pub fn blocked_producers(&self) -> usize {
        self.not_full.waiters()
    }

    /// Consumers currently parked on an empty queue
    pub fn blocked_consumers(&self) -> usize {
        self.not_empty.waiters()
    }

    #[inline]
    fn reject_sentinel(&self, value: &T) -> ChannelResult<()> {
        if self.is_sentinel(value) {
            Err(ChannelError::ReservedSentinel)
        } else {
            Ok(())
        }
    }

    fn put_with(&self, value: T, ctx: &TimeoutContext) -> ChannelResult<()> {
        self.reject_sentinel(&value)?;

        let mut state = self.state.lock();
        loop {
            if state.closed {
                return Err(ChannelError::Closed);
            }
            if !self.capacity.is_full(state.queue.len()) {
                break;
            }
            Self::park(&self.not_full, &mut state, ctx)?;
        }

        self.push_locked(&mut state, value);
        Ok(())
    }

    fn take_with(&self, ctx: &TimeoutContext) -> ChannelResult<T> {
        let mut state = self.state.lock();
        loop {
            if let Some(value) = self.pop_locked(&mut state) {
                return Ok(value);
            }
            if state.closed {
                return Err(ChannelError::Closed);
            }
            Self::park(&self.not_empty, &mut state, ctx)?;
        }
    }

    fn push_locked(&self, state: &mut MutexGuard<'_, ChannelState<T>>, value: T) {
        state.queue.push_back(value);
        trace!(len = state.queue.len(), "channel put");
        self.not_empty.notify_one();
    }

    fn pop_locked(&self, state: &mut MutexGuard<'_, ChannelState<T>>) -> Option<T> {
        let value = state.queue.pop_front()?;

        if state.closed && state.queue.is_empty() {
            // The sentinel is always last: the stream just ended. Wake every
            // other consumer so they observe `Closed` instead of parking.
            let woken = self.not_empty.notify_all();
            if woken.is_woken() {
                debug!(woken_consumers = woken.count(), "channel drained, releasing consumers");
            } else {
                debug!("channel drained, sentinel taken");
            }
        } else {
            trace!(len = state.queue.len(), "channel take");
        }

        self.not_full.notify_one();
        Some(value)
    }

    /// Wait on `signal`, honouring the context's deadline
    fn park(
        signal: &WaitSignal,
        state: &mut MutexGuard<'_, ChannelState<T>>,
        ctx: &TimeoutContext,
    ) -> ChannelResult<()> {
        match ctx.remaining() {
            None => signal.wait(state),
            Some(remaining) if remaining.is_zero() => return Err(ctx.channel_timeout()),
            Some(remaining) => {
                signal.wait_for(state, remaining);
            }
        }
        Ok(())
    }
}

impl<T> std::fmt::Debug for BoundedChannel<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("BoundedChannel")
            .field("capacity", &self.capacity)
            .field("queued", &state.queue.len())
            .field("closed", &state.closed)
            .field("blocked_producers", &self.not_full.waiters())
            .field("blocked_consumers", &self.not_empty.waiters())
            .finish()
    }
}
