/*!
 * Timeout Policy
 *
 * Caller-imposed bounds for blocking operations. None of the shared
 * structures time out on their own; a caller that wants a bounded wait
 * passes a policy and receives a distinct timeout outcome on expiry.
 *
 * ## Timeout Classes
 *
 * - **Channel**: blocking put/take on a channel
 * - **Join**: waiting for a group of workers
 * - **Custom**: user-defined
 */

use crate::core::errors::ChannelError;
use std::time::{Duration, Instant};

/// Timeout policy for blocking operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeoutPolicy {
    /// No timeout (infinite wait)
    #[default]
    None,

    /// Channel put/take timeout
    Channel(Duration),

    /// Worker join timeout
    Join(Duration),

    /// Custom timeout
    Custom(Duration),
}

impl TimeoutPolicy {
    /// Get the duration for this policy
    pub fn duration(&self) -> Option<Duration> {
        match self {
            Self::None => None,
            Self::Channel(d) | Self::Join(d) | Self::Custom(d) => Some(*d),
        }
    }

    /// Get remaining time before timeout
    pub fn remaining(&self, start: Instant) -> Option<Duration> {
        self.duration().map(|d| d.saturating_sub(start.elapsed()))
    }

    /// Get timeout category as string
    pub fn category(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Channel(_) => "channel",
            Self::Join(_) => "join",
            Self::Custom(_) => "custom",
        }
    }
}

/// Deadline tracking for a single blocking operation
#[derive(Debug, Clone)]
pub struct TimeoutContext {
    policy: TimeoutPolicy,
    start: Instant,
}

impl TimeoutContext {
    /// Start tracking a policy from now
    pub fn new(policy: TimeoutPolicy) -> Self {
        Self {
            policy,
            start: Instant::now(),
        }
    }

    /// Remaining budget, `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.policy.remaining(self.start)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Build the channel timeout error for this context
    pub fn channel_timeout(&self) -> ChannelError {
        ChannelError::Timeout {
            elapsed_ms: self.elapsed().as_millis() as u64,
            timeout_ms: self.policy.duration().map(|d| d.as_millis() as u64),
        }
    }
}
