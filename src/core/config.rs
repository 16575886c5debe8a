/*!
 * Harness Configuration
 *
 * Runtime configuration for workloads: worker counts, per-worker operation
 * counts, capacities and hazard timing. Values can be overridden through
 * environment variables.
 */

use crate::channel::Capacity;
use crate::core::errors::{HarnessError, HarnessResult};
use crate::core::limits::{
    DEADLOCK_WATCHDOG, DEFAULT_OPS_PER_WORKER, DEFAULT_SLOT_CAPACITY, DEFAULT_WORKERS,
    HAZARD_HOLD_DELAY, MAX_WORKERS,
};
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const ENV_WORKERS: &str = "CONCURRENCY_WORKERS";
pub const ENV_OPS_PER_WORKER: &str = "CONCURRENCY_OPS_PER_WORKER";
pub const ENV_SLOT_CAPACITY: &str = "CONCURRENCY_SLOT_CAPACITY";
pub const ENV_CHANNEL_CAPACITY: &str = "CONCURRENCY_CHANNEL_CAPACITY";
pub const ENV_HAZARD_DELAY_MS: &str = "CONCURRENCY_HAZARD_DELAY_MS";
pub const ENV_WATCHDOG_MS: &str = "CONCURRENCY_WATCHDOG_MS";

/// Workload configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Number of concurrent workers
    pub workers: usize,
    /// Operations performed by each worker
    pub ops_per_worker: usize,
    /// Slot count for SlotStore workloads
    pub slot_capacity: usize,
    /// Capacity for channel workloads
    pub channel_capacity: Capacity,
    /// Simulated work between the hazard's two acquisitions
    pub hazard_delay: Duration,
    /// Budget after which a hazard run is declared stuck
    pub watchdog: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            ops_per_worker: DEFAULT_OPS_PER_WORKER,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            channel_capacity: Capacity::Unbounded,
            hazard_delay: HAZARD_HOLD_DELAY,
            watchdog: DEADLOCK_WATCHDOG,
        }
    }
}

impl HarnessConfig {
    /// Small, fast configuration for unit tests
    pub const fn quick() -> Self {
        Self {
            workers: 2,
            ops_per_worker: 100,
            slot_capacity: 8,
            channel_capacity: Capacity::Bounded(4),
            hazard_delay: Duration::from_millis(20),
            watchdog: Duration::from_millis(500),
        }
    }

    /// Heavier configuration for contention testing
    pub const fn stress() -> Self {
        Self {
            workers: 16,
            ops_per_worker: 10_000,
            slot_capacity: 64,
            channel_capacity: Capacity::Bounded(16),
            hazard_delay: HAZARD_HOLD_DELAY,
            watchdog: DEADLOCK_WATCHDOG,
        }
    }

    /// Defaults overridden by any CONCURRENCY_* variables that parse
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let channel_capacity = match std::env::var(ENV_CHANNEL_CAPACITY) {
            Ok(raw) => match raw.trim() {
                "0" | "unbounded" => Capacity::Unbounded,
                other => match other.parse::<usize>() {
                    Ok(n) => Capacity::Bounded(n),
                    Err(_) => {
                        warn!(var = ENV_CHANNEL_CAPACITY, value = %raw, "Ignoring unparsable value");
                        defaults.channel_capacity
                    }
                },
            },
            Err(_) => defaults.channel_capacity,
        };

        Self {
            workers: env_or(ENV_WORKERS, defaults.workers),
            ops_per_worker: env_or(ENV_OPS_PER_WORKER, defaults.ops_per_worker),
            slot_capacity: env_or(ENV_SLOT_CAPACITY, defaults.slot_capacity),
            channel_capacity,
            hazard_delay: Duration::from_millis(env_or(
                ENV_HAZARD_DELAY_MS,
                defaults.hazard_delay.as_millis() as u64,
            )),
            watchdog: Duration::from_millis(env_or(
                ENV_WATCHDOG_MS,
                defaults.watchdog.as_millis() as u64,
            )),
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_ops_per_worker(mut self, ops: usize) -> Self {
        self.ops_per_worker = ops;
        self
    }

    pub fn with_slot_capacity(mut self, capacity: usize) -> Self {
        self.slot_capacity = capacity;
        self
    }

    pub fn with_channel_capacity(mut self, capacity: Capacity) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn with_hazard_delay(mut self, delay: Duration) -> Self {
        self.hazard_delay = delay;
        self
    }

    pub fn with_watchdog(mut self, watchdog: Duration) -> Self {
        self.watchdog = watchdog;
        self
    }

    /// Total operations across all workers
    pub fn total_ops(&self) -> usize {
        self.workers.saturating_mul(self.ops_per_worker)
    }

    /// Reject configurations no workload can run with
    pub fn validate(&self) -> HarnessResult<()> {
        if self.workers == 0 {
            return Err(HarnessError::InvalidConfig("workers must be > 0".into()));
        }
        if self.workers > MAX_WORKERS {
            return Err(HarnessError::InvalidConfig(format!(
                "workers must be <= {MAX_WORKERS}, got {}",
                self.workers
            )));
        }
        if self.slot_capacity == 0 {
            return Err(HarnessError::InvalidConfig(
                "slot_capacity must be > 0".into(),
            ));
        }
        if self.channel_capacity == Capacity::Bounded(0) {
            return Err(HarnessError::InvalidConfig(
                "bounded channel capacity must be > 0".into(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr + Copy>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                warn!(var, value = %raw, "Ignoring unparsable value");
                default
            }
        },
        Err(_) => default,
    }
}
