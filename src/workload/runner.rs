/*!
 * Workload Runner
 * Fans a task out over named worker threads and joins them all
 */

use crate::core::config::HarnessConfig;
use crate::core::errors::{HarnessError, HarnessResult};
use crate::monitoring::WorkloadSpan;
use serde::{Deserialize, Serialize};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, trace};
use uuid::Uuid;

/// Summary of a completed workload run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub run_id: Uuid,
    pub name: String,
    pub workers: usize,
    pub ops_per_worker: usize,
    pub total_ops: usize,
    #[serde(with = "duration_micros")]
    pub elapsed: Duration,
}

impl WorkloadReport {
    /// Operations per second over the whole run
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return self.total_ops as f64;
        }
        self.total_ops as f64 / secs
    }

    /// Serialize for machine-readable harness output
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Validated workload shape
#[derive(Debug, Clone)]
pub struct Workload {
    config: HarnessConfig,
}

impl Workload {
    pub fn new(config: HarnessConfig) -> HarnessResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run `task(worker, op)` for every worker and operation index
    ///
    /// Workers run on scoped threads named `<name>-worker-<n>`, so the task
    /// may borrow the structure under test. Every worker is joined before
    /// returning; a panicking worker surfaces as `WorkerPanicked` carrying
    /// the lowest panicking index.
    pub fn run<F>(&self, name: &str, task: F) -> HarnessResult<WorkloadReport>
    where
        F: Fn(usize, usize) + Sync,
    {
        let workers = self.config.workers;
        let ops_per_worker = self.config.ops_per_worker;
        let span = WorkloadSpan::new(name, workers, ops_per_worker);
        let run_id = span.run_id();
        let start = Instant::now();

        let outcome = thread::scope(|scope| -> HarnessResult<()> {
            let task = &task;
            let mut handles = Vec::with_capacity(workers);

            for worker in 0..workers {
                let worker_span = span.span().clone();
                let handle = thread::Builder::new()
                    .name(format!("{name}-worker-{worker}"))
                    .spawn_scoped(scope, move || {
                        let _entered = worker_span.enter();
                        for op in 0..ops_per_worker {
                            task(worker, op);
                        }
                        trace!(worker, "worker finished");
                    })
                    .map_err(|e| HarnessError::Spawn(e.to_string()))?;
                handles.push(handle);
            }

            let mut first_panic = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                if handle.join().is_err() {
                    error!(worker, "worker panicked");
                    first_panic.get_or_insert(worker);
                }
            }

            match first_panic {
                Some(worker) => Err(HarnessError::WorkerPanicked { worker }),
                None => Ok(()),
            }
        });

        let elapsed = start.elapsed();
        match outcome {
            Ok(()) => {
                span.finish(true);
                Ok(WorkloadReport {
                    run_id,
                    name: name.to_string(),
                    workers,
                    ops_per_worker,
                    total_ops: self.config.total_ops(),
                    elapsed,
                })
            }
            Err(e) => {
                span.finish(false);
                Err(e)
            }
        }
    }
}

mod duration_micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_micros() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_micros)
    }
}
