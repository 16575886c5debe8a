/*!
 * Core Module
 * Errors, limits, configuration, timeouts and sync signals
 */

pub mod config;
pub mod errors;
pub mod limits;
pub mod sync;
pub mod timeout;

// Re-export for convenience
pub use config::HarnessConfig;
pub use errors::*;
pub use sync::{WaitSignal, WakeResult};
pub use timeout::{TimeoutContext, TimeoutPolicy};
