/*!
 * Opposite-order acquisition of two resources
 */

use crate::core::config::HarnessConfig;
use crate::core::errors::{HarnessError, HarnessResult};
use parking_lot::Mutex;
use std::sync::{Arc, Barrier};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info};

/// One of the two shared resources, ordered by rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceId {
    First,
    Second,
}

impl ResourceId {
    pub fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// How the workers are paced between their two acquisitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardSchedule {
    /// Sleep while holding the first resource (simulated work)
    Delay(Duration),
    /// Wait until both workers hold their first resource
    Rendezvous,
}

impl HazardSchedule {
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::Delay(config.hazard_delay)
    }
}

/// Two workers locking `First`/`Second` in opposite order
///
/// Worker A takes `First` then `Second`; worker B takes `Second` then
/// `First`. Under [`HazardSchedule::Rendezvous`] both always hold one lock
/// when they request the other, so neither thread ever returns.
#[derive(Debug)]
pub struct LockOrderHazard {
    first: Mutex<()>,
    second: Mutex<()>,
    schedule: HazardSchedule,
    rendezvous: Barrier,
}

impl LockOrderHazard {
    pub fn new(schedule: HazardSchedule) -> Self {
        Self {
            first: Mutex::new(()),
            second: Mutex::new(()),
            schedule,
            rendezvous: Barrier::new(2),
        }
    }

    pub fn schedule(&self) -> HazardSchedule {
        self.schedule
    }

    fn resource(&self, id: ResourceId) -> &Mutex<()> {
        match id {
            ResourceId::First => &self.first,
            ResourceId::Second => &self.second,
        }
    }

    /// Start worker A and worker B
    ///
    /// The handles are returned unjoined. Joining them without a deadline
    /// may block forever.
    pub fn spawn(self: &Arc<Self>) -> HarnessResult<Vec<JoinHandle<()>>> {
        info!(schedule = ?self.schedule, "starting lock order hazard");

        [("a", ResourceId::First), ("b", ResourceId::Second)]
            .into_iter()
            .map(|(label, held)| {
                let hazard = Arc::clone(self);
                thread::Builder::new()
                    .name(format!("hazard-{label}"))
                    .spawn(move || hazard.acquire(label, held, held.other()))
                    .map_err(|e| HarnessError::Spawn(e.to_string()))
            })
            .collect()
    }

    fn acquire(&self, label: &str, held: ResourceId, wanted: ResourceId) {
        let _held = self.resource(held).lock();
        debug!(worker = label, ?held, "holding resource");

        match self.schedule {
            HazardSchedule::Delay(delay) => thread::sleep(delay),
            HazardSchedule::Rendezvous => {
                self.rendezvous.wait();
            }
        }

        debug!(worker = label, ?held, ?wanted, "waiting for resource");
        let _wanted = self.resource(wanted).lock();
        debug!(worker = label, "holding both resources");
    }
}
