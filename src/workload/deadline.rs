/*!
 * Deadline Join
 *
 * Joins detached worker threads under a timeout. Each handle gets a small
 * joiner thread that reports over a flume channel, so the caller can stop
 * waiting without cancelling anything. Workers still pending at the
 * deadline are left running and detached.
 */

use crate::core::errors::{HarnessError, HarnessResult};
use crate::core::timeout::TimeoutPolicy;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Result of joining a set of workers under a deadline
#[derive(Debug)]
pub enum Completion<T> {
    /// Every worker finished; results are in handle order
    Completed { results: Vec<T>, elapsed: Duration },
    /// The deadline passed first
    TimedOut {
        /// Indices of workers that finished in time
        finished: Vec<usize>,
        /// Indices of workers still running
        pending: Vec<usize>,
        elapsed: Duration,
    },
}

impl<T> Completion<T> {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    pub fn elapsed(&self) -> Duration {
        match self {
            Self::Completed { elapsed, .. } | Self::TimedOut { elapsed, .. } => *elapsed,
        }
    }
}

/// Join `handles`, giving up once `policy` expires
///
/// `TimeoutPolicy::None` waits indefinitely. A worker that panicked is
/// reported as `WorkerPanicked` with its index.
pub fn join_within<T>(handles: Vec<JoinHandle<T>>, policy: TimeoutPolicy) -> HarnessResult<Completion<T>>
where
    T: Send + 'static,
{
    let start = Instant::now();
    let total = handles.len();
    let (tx, rx) = flume::unbounded();

    for (index, handle) in handles.into_iter().enumerate() {
        let tx = tx.clone();
        thread::Builder::new()
            .name(format!("joiner-{index}"))
            .spawn(move || {
                let _ = tx.send((index, handle.join().ok()));
            })
            .map_err(|e| HarnessError::Spawn(e.to_string()))?;
    }
    drop(tx);

    let deadline = policy.duration().map(|d| start + d);
    let mut results: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut finished = Vec::with_capacity(total);

    while finished.len() < total {
        let received = match deadline {
            Some(deadline) => rx.recv_deadline(deadline).ok(),
            None => rx.recv().ok(),
        };

        match received {
            Some((index, Some(value))) => {
                results[index] = Some(value);
                finished.push(index);
            }
            Some((index, None)) => {
                warn!(worker = index, "worker panicked");
                return Err(HarnessError::WorkerPanicked { worker: index });
            }
            None => {
                finished.sort_unstable();
                let pending: Vec<usize> = (0..total).filter(|i| results[*i].is_none()).collect();
                let elapsed = start.elapsed();
                warn!(
                    ?pending,
                    elapsed_ms = elapsed.as_millis() as u64,
                    timeout = policy.category(),
                    "workers did not finish before the deadline"
                );
                return Ok(Completion::TimedOut {
                    finished,
                    pending,
                    elapsed,
                });
            }
        }
    }

    let elapsed = start.elapsed();
    debug!(workers = total, elapsed_us = elapsed.as_micros() as u64, "all workers joined");
    Ok(Completion::Completed {
        results: results.into_iter().flatten().collect(),
        elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_complete() {
        let handles: Vec<_> = (0..4).map(|i| thread::spawn(move || i * 10)).collect();

        match join_within(handles, TimeoutPolicy::Join(Duration::from_secs(5))).unwrap() {
            Completion::Completed { results, .. } => assert_eq!(results, vec![0, 10, 20, 30]),
            other => panic!("expected completion, got {other:?}"),
        }
    }

    #[test]
    fn test_no_handles() {
        let completion = join_within::<()>(vec![], TimeoutPolicy::None).unwrap();
        assert!(completion.is_completed());
    }

    #[test]
    fn test_times_out_on_stuck_worker() {
        let (release_tx, release_rx) = flume::bounded::<()>(0);
        let handles = vec![
            thread::spawn(|| ()),
            thread::spawn(move || {
                let _ = release_rx.recv();
            }),
        ];

        let completion = join_within(handles, TimeoutPolicy::Custom(Duration::from_millis(100))).unwrap();
        match completion {
            Completion::TimedOut { finished, pending, elapsed } => {
                assert_eq!(finished, vec![0]);
                assert_eq!(pending, vec![1]);
                assert!(elapsed >= Duration::from_millis(100));
            }
            other => panic!("expected timeout, got {other:?}"),
        }

        drop(release_tx);
    }

    #[test]
    fn test_panic_reported() {
        let handles = vec![
            thread::spawn(|| 1),
            thread::spawn(|| -> i32 { panic!("worker failure") }),
        ];

        let result = join_within(handles, TimeoutPolicy::Join(Duration::from_secs(5)));
        assert_eq!(result.unwrap_err(), HarnessError::WorkerPanicked { worker: 1 });
    }
}
