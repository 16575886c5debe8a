/*!
 * Contention Benchmarks
 *
 * Compare coarse locking, split counting, per-slot locking, counter
 * strategies and channel capacities under multi-threaded load
 */

use concurrency_core::channel::{run_pipeline, Capacity};
use concurrency_core::collections::{
    CounterStrategy, GuardedList, SharedCounter, SlotStore, SplitCounterList,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::thread;

const OPS_PER_THREAD: usize = 1_000;

fn bench_list_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_add");

    for threads in [1, 2, 4, 8] {
        group.bench_with_input(
            BenchmarkId::new("guarded", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let list = GuardedList::with_capacity(threads * OPS_PER_THREAD);
                    thread::scope(|s| {
                        for t in 0..threads {
                            let list = &list;
                            s.spawn(move || {
                                for op in 0..OPS_PER_THREAD {
                                    list.add(black_box(t * OPS_PER_THREAD + op));
                                }
                            });
                        }
                    });
                    black_box(list.size())
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("split_counter", threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let list = SplitCounterList::new();
                    thread::scope(|s| {
                        for t in 0..threads {
                            let list = &list;
                            s.spawn(move || {
                                for op in 0..OPS_PER_THREAD {
                                    list.add(black_box(t * OPS_PER_THREAD + op));
                                }
                            });
                        }
                    });
                    black_box(list.size())
                });
            },
        );
    }

    group.finish();
}

fn bench_slot_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("slot_store");

    // Distinct slots per thread vs. every thread on slot 0
    for (name, shared) in [("distinct", false), ("same_slot", true)] {
        group.bench_function(name, |b| {
            let store = SlotStore::new(8);
            b.iter(|| {
                thread::scope(|s| {
                    for t in 0..4 {
                        let store = &store;
                        let index = if shared { 0 } else { t };
                        s.spawn(move || {
                            for op in 0..OPS_PER_THREAD {
                                store.set(index, black_box(op)).ok();
                            }
                        });
                    }
                });
            });
        });
    }

    group.finish();
}

fn bench_counter(c: &mut Criterion) {
    let mut group = c.benchmark_group("counter");

    for strategy in [CounterStrategy::Atomic, CounterStrategy::Locked] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", strategy)),
            &strategy,
            |b, &strategy| {
                b.iter(|| {
                    let counter = SharedCounter::new(strategy);
                    thread::scope(|s| {
                        for _ in 0..4 {
                            let counter = &counter;
                            s.spawn(move || {
                                for _ in 0..OPS_PER_THREAD {
                                    counter.increment();
                                }
                            });
                        }
                    });
                    black_box(counter.get())
                });
            },
        );
    }

    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let items: Vec<i64> = (0..OPS_PER_THREAD as i64).collect();

    for capacity in [Capacity::Bounded(1), Capacity::Bounded(64), Capacity::Unbounded] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:?}", capacity)),
            &capacity,
            |b, &capacity| {
                b.iter(|| {
                    let report = run_pipeline(capacity, items.clone(), -1).ok();
                    black_box(report)
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_list_add,
    bench_slot_store,
    bench_counter,
    bench_pipeline
);
criterion_main!(benches);
