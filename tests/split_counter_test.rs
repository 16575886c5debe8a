/*!
 * SplitCounterList Integration Tests
 *
 * The counter is only required to agree with the list once every worker
 * has been joined.
 */

use concurrency_core::collections::SplitCounterList;
use concurrency_core::core::HarnessConfig;
use concurrency_core::workload::Workload;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_converges_after_concurrent_adds() {
    let config = HarnessConfig::default().with_workers(6).with_ops_per_worker(1000);
    let list = SplitCounterList::new();

    let report = Workload::new(config)
        .unwrap()
        .run("split-add", |worker, op| list.add((worker, op)))
        .unwrap();

    assert_eq!(list.size(), report.total_ops);
    assert_eq!(list.true_len(), report.total_ops);
    assert_eq!(list.drift(), 0);
}

#[test]
fn test_converges_after_add_remove() {
    let list = Arc::new(SplitCounterList::new());

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let list = list.clone();
            thread::spawn(move || {
                for op in 0..500 {
                    list.add((worker, op));
                }
                for op in 0..250 {
                    list.remove(&(worker, op));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(list.size(), 1000);
    assert_eq!(list.true_len(), 1000);
}

#[test]
fn test_size_readable_during_churn() {
    let list = Arc::new(SplitCounterList::new());
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let list = list.clone();
        let done = done.clone();
        thread::spawn(move || {
            let mut reads = 0u64;
            while !done.load(Ordering::Acquire) {
                // Approximate, but never beyond what was ever inserted
                assert!(list.size() <= 4 * 1000);
                reads += 1;
            }
            reads
        })
    };

    let writers: Vec<_> = (0..4)
        .map(|worker| {
            let list = list.clone();
            thread::spawn(move || {
                for op in 0..1000 {
                    list.add((worker, op));
                    if op % 2 == 0 {
                        list.remove(&(worker, op));
                    }
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    assert!(reader.join().unwrap() > 0);

    assert_eq!(list.size(), 2000);
    assert_eq!(list.true_len(), 2000);
}

#[test]
fn test_counter_lags_list_under_contention() {
    const MAX_OBSERVATIONS: usize = 2_000_000;
    let list = Arc::new(SplitCounterList::new());
    let stop = Arc::new(AtomicBool::new(false));

    let writers: Vec<_> = (0..4)
        .map(|worker| {
            let list = list.clone();
            let stop = stop.clone();
            thread::spawn(move || {
                let mut op = 0u64;
                while !stop.load(Ordering::Acquire) {
                    list.add((worker, op));
                    list.remove(&(worker, op));
                    op += 1;
                }
            })
        })
        .collect();

    // Holding the list lock freezes the list, but not the counter: a writer
    // that just released the lock has not adjusted the count yet.
    let mut gap_seen = false;
    for _ in 0..MAX_OBSERVATIONS {
        if list.with_list(|items| items.len() as isize != list.raw_count()) {
            gap_seen = true;
            break;
        }
    }

    stop.store(true, Ordering::Release);
    for writer in writers {
        writer.join().unwrap();
    }

    assert!(gap_seen, "counter never disagreed with the list");
    assert_eq!(list.size(), 0);
    assert_eq!(list.drift(), 0);
}

#[test]
fn test_remove_absent_leaves_counter() {
    let list = SplitCounterList::new();
    list.add(1);
    assert!(!list.remove(&2));
    assert_eq!(list.size(), 1);
}
