/*!
 * Limits and Defaults
 *
 * Centralized location for worker counts, capacities, delays and timeouts.
 * Organized by component.
 */

use std::time::Duration;

// =============================================================================
// WORKLOAD DEFAULTS
// =============================================================================

/// Default number of concurrent workers per workload
pub const DEFAULT_WORKERS: usize = 3;

/// Default number of operations each worker performs
pub const DEFAULT_OPS_PER_WORKER: usize = 1000;

/// Upper bound on workers accepted from configuration
/// Keeps a typo in CONCURRENCY_WORKERS from exhausting OS threads
pub const MAX_WORKERS: usize = 512;

// =============================================================================
// COLLECTION DEFAULTS
// =============================================================================

/// Default slot count for SlotStore
pub const DEFAULT_SLOT_CAPACITY: usize = 100;

/// Cache line size used to pad per-slot locks
/// [PERF] Prevents false sharing between neighbouring slots
pub const CACHE_LINE_SIZE: usize = 64;

// =============================================================================
// CHANNEL DEFAULTS
// =============================================================================

/// Number of real items the default producer emits
pub const DEFAULT_PRODUCER_ITEMS: usize = 10;

/// Sentinel marking the end of an integer stream
pub const DEFAULT_SENTINEL: i64 = -1;

// =============================================================================
// HAZARD DEFAULTS
// =============================================================================

/// Simulated work between the first and second acquisition
pub const HAZARD_HOLD_DELAY: Duration = Duration::from_millis(100);

/// Wall-clock budget after which a worker pair is declared stuck
pub const DEADLOCK_WATCHDOG: Duration = Duration::from_secs(2);
