/*!
 * Rank-ordered acquisition of the same two resources
 */

use super::lock_order::ResourceId;
use crate::core::errors::{HarnessError, HarnessResult};
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Two resources that are always locked lowest rank first
#[derive(Debug)]
pub struct OrderedPair {
    first: Mutex<()>,
    second: Mutex<()>,
    hold: Duration,
}

impl OrderedPair {
    pub fn new(hold: Duration) -> Self {
        Self {
            first: Mutex::new(()),
            second: Mutex::new(()),
            hold,
        }
    }

    fn resource(&self, id: ResourceId) -> &Mutex<()> {
        match id {
            ResourceId::First => &self.first,
            ResourceId::Second => &self.second,
        }
    }

    /// Lock both resources regardless of the order they were requested in
    ///
    /// Guards are returned in rank order.
    pub fn lock_both(
        &self,
        a: ResourceId,
        b: ResourceId,
    ) -> (MutexGuard<'_, ()>, MutexGuard<'_, ()>) {
        debug_assert_ne!(a, b);
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        let low_guard = self.resource(low).lock();
        if !self.hold.is_zero() {
            thread::sleep(self.hold);
        }
        let high_guard = self.resource(high).lock();
        (low_guard, high_guard)
    }

    /// Start the same two workers as the hazard, requesting in opposite order
    pub fn spawn(self: &Arc<Self>) -> HarnessResult<Vec<JoinHandle<()>>> {
        [("a", ResourceId::First), ("b", ResourceId::Second)]
            .into_iter()
            .map(|(label, requested)| {
                let pair = Arc::clone(self);
                thread::Builder::new()
                    .name(format!("ordered-{label}"))
                    .spawn(move || {
                        let _guards = pair.lock_both(requested, requested.other());
                        debug!(worker = label, "holding both resources");
                    })
                    .map_err(|e| HarnessError::Spawn(e.to_string()))
            })
            .collect()
    }
}
