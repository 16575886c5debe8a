/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 *
 * Blocking is never an error: a `put` on a full channel or a `take` on an
 * empty one waits. Only a caller-supplied timeout turns a stuck wait into
 * `ChannelError::Timeout`.
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for collection operations
pub type CollectionResult<T> = Result<T, CollectionError>;

/// Result type for channel operations
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Result type for workload harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

/// Errors raised by the shared collections
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum CollectionError {
    #[error("Index {index} out of range for length {len}")]
    #[diagnostic(
        code(collection::out_of_range),
        help("Valid indices are 0..len. Check the size before indexing.")
    )]
    OutOfRange { index: usize, len: usize },

    #[error("Collection is empty")]
    #[diagnostic(
        code(collection::empty),
        help("The operation requires at least one element.")
    )]
    Empty,

    #[error("Capacity exceeded: {capacity}")]
    #[diagnostic(
        code(collection::capacity_exceeded),
        help("The structure is full. Use the blocking variant or drain it first.")
    )]
    CapacityExceeded { capacity: usize },
}

/// Errors raised by the bounded channel
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ChannelError {
    #[error("Channel closed")]
    #[diagnostic(
        code(channel::closed),
        help("The sentinel has already been sent. No further items are accepted or delivered.")
    )]
    Closed,

    #[error("Channel operation timed out after {elapsed_ms}ms (timeout: {timeout_ms:?}ms)")]
    #[diagnostic(
        code(channel::timeout),
        help("The peer did not make progress in time. Increase the timeout or check the peer thread.")
    )]
    Timeout {
        elapsed_ms: u64,
        timeout_ms: Option<u64>,
    },

    #[error("Value is reserved as the channel sentinel")]
    #[diagnostic(
        code(channel::reserved_sentinel),
        help("Use close() to send the sentinel. It cannot be sent as a payload.")
    )]
    ReservedSentinel,

    #[error("{0}")]
    #[diagnostic(transparent)]
    Collection(#[from] CollectionError),
}

impl ChannelError {
    /// Check whether this error marks the end of the stream
    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, ChannelError::Closed)
    }

    /// Check whether this error is a caller-imposed timeout
    #[inline]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ChannelError::Timeout { .. })
    }
}

/// Errors raised by the workload harness
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum HarnessError {
    #[error("Failed to spawn worker: {0}")]
    #[diagnostic(
        code(harness::spawn_failed),
        help("The OS refused to create a thread. Reduce the worker count.")
    )]
    Spawn(String),

    #[error("Worker {worker} panicked")]
    #[diagnostic(
        code(harness::worker_panicked),
        help("A worker task panicked. Run with RUST_LOG=debug to see the failing operation.")
    )]
    WorkerPanicked { worker: usize },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(
        code(harness::invalid_config),
        help("Worker count and slot capacity must be non-zero.")
    )]
    InvalidConfig(String),
}

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum ConcurrencyError {
    #[error("Collection error: {0}")]
    #[diagnostic(transparent)]
    Collection(#[from] CollectionError),

    #[error("Channel error: {0}")]
    #[diagnostic(transparent)]
    Channel(#[from] ChannelError),

    #[error("Harness error: {0}")]
    #[diagnostic(transparent)]
    Harness(#[from] HarnessError),
}
