/*!
 * BoundedChannel Integration Tests
 *
 * FIFO delivery, sentinel termination and capacity backpressure
 */

use concurrency_core::channel::{consume, produce, run_pipeline, BoundedChannel, Capacity};
use concurrency_core::core::limits::DEFAULT_SENTINEL;
use concurrency_core::core::{HarnessConfig, TimeoutPolicy};
use concurrency_core::ChannelError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_ten_items_then_sentinel() {
    for capacity in [Capacity::Unbounded, Capacity::Bounded(1), Capacity::Bounded(3)] {
        let report = run_pipeline(capacity, (0..10).collect(), DEFAULT_SENTINEL).unwrap();

        assert_eq!(report.received, (0..10).collect::<Vec<i64>>(), "{capacity:?}");
        assert!(!report.received.contains(&DEFAULT_SENTINEL));
        assert_eq!(report.produced, 10);
    }
}

#[test]
fn test_pipeline_sized_from_config() {
    let config = HarnessConfig::quick().with_channel_capacity(Capacity::Bounded(2));
    let report = run_pipeline(config.channel_capacity, (0..25).collect(), DEFAULT_SENTINEL).unwrap();
    assert_eq!(report.received, (0..25).collect::<Vec<i64>>());
}

#[test]
fn test_put_beyond_capacity_blocks_until_take() {
    const CAPACITY: usize = 3;
    let config = HarnessConfig::default().with_channel_capacity(Capacity::Bounded(CAPACITY));
    let channel = Arc::new(BoundedChannel::from_config(&config, -1i64));
    for i in 0..CAPACITY as i64 {
        channel.put(i).unwrap();
    }

    let put_done = Arc::new(AtomicBool::new(false));
    let producer = {
        let channel = channel.clone();
        let put_done = put_done.clone();
        thread::spawn(move || {
            channel.put(99).unwrap();
            put_done.store(true, Ordering::Release);
        })
    };

    thread::sleep(Duration::from_millis(100));
    assert!(!put_done.load(Ordering::Acquire), "put of item C+1 did not block");
    assert_eq!(channel.blocked_producers(), 1);
    assert_eq!(channel.len(), CAPACITY);

    assert_eq!(channel.take(), Ok(0));
    producer.join().unwrap();
    assert!(put_done.load(Ordering::Acquire));

    let mut rest = vec![];
    while let Ok(v) = channel.try_take() {
        rest.push(v);
    }
    assert_eq!(rest, vec![1, 2, 99]);
}

#[test]
fn test_take_on_empty_blocks_until_put() {
    let channel = Arc::new(BoundedChannel::unbounded(0u32));
    let consumer = {
        let channel = channel.clone();
        thread::spawn(move || channel.take())
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());

    channel.put(7).unwrap();
    assert_eq!(consumer.join().unwrap(), Ok(7));
}

#[test]
fn test_nothing_accepted_after_sentinel() {
    let channel = BoundedChannel::bounded(4, -1);
    channel.put(1).unwrap();
    channel.close().unwrap();

    assert_eq!(channel.put(2), Err(ChannelError::Closed));
    assert_eq!(channel.close(), Err(ChannelError::Closed));

    assert_eq!(channel.take(), Ok(1));
    assert_eq!(channel.take(), Ok(-1));
    assert_eq!(channel.take(), Err(ChannelError::Closed));
}

#[test]
fn test_take_timeout_reports_elapsed() {
    let channel = BoundedChannel::bounded(1, -1);
    let result = channel.take_timeout(TimeoutPolicy::Channel(Duration::from_millis(30)));
    match result {
        Err(ChannelError::Timeout { elapsed_ms, timeout_ms }) => {
            assert!(elapsed_ms >= 30);
            assert_eq!(timeout_ms, Some(30));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn test_many_consumers_all_stop() {
    let channel = Arc::new(BoundedChannel::bounded(2, u64::MAX));

    let consumers: Vec<_> = (0..3)
        .map(|_| {
            let channel = channel.clone();
            thread::spawn(move || {
                let mut seen = vec![];
                consume(&channel, |v| seen.push(v)).unwrap();
                seen
            })
        })
        .collect();

    assert_eq!(produce(&channel, 0..300u64).unwrap(), 300);

    let mut all: Vec<u64> = consumers
        .into_iter()
        .flat_map(|c| c.join().unwrap())
        .collect();
    all.sort_unstable();
    assert_eq!(all, (0..300).collect::<Vec<_>>());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_fifo_under_any_capacity(
        items in prop::collection::vec(0i64..1000, 0..100),
        capacity in 1usize..8,
    ) {
        let report = run_pipeline(Capacity::Bounded(capacity), items.clone(), -1).unwrap();
        prop_assert_eq!(report.received, items);
    }
}
