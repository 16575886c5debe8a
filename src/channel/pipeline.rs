/*!
 * Producer/Consumer Pipeline
 *
 * The producer puts every item then sends the sentinel exactly once; the
 * consumer takes until it observes the sentinel and stops without
 * forwarding it.
 */

use super::bounded::{BoundedChannel, Capacity};
use crate::core::errors::{ChannelError, ChannelResult, ConcurrencyError, HarnessError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Put every item in order, then close the channel
///
/// Returns the number of real items produced.
pub fn produce<T, I>(channel: &BoundedChannel<T>, items: I) -> ChannelResult<usize>
where
    T: Clone + PartialEq,
    I: IntoIterator<Item = T>,
{
    produce_paced(channel, items, Duration::ZERO)
}

/// Like [`produce`], sleeping `pause` after each item to simulate work
pub fn produce_paced<T, I>(
    channel: &BoundedChannel<T>,
    items: I,
    pause: Duration,
) -> ChannelResult<usize>
where
    T: Clone + PartialEq,
    I: IntoIterator<Item = T>,
{
    let mut produced = 0;
    for item in items {
        channel.put(item)?;
        produced += 1;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    channel.close()?;
    debug!(produced, "producer finished");
    Ok(produced)
}

/// Take items until the sentinel, handing each real item to `f`
///
/// A `Closed` result means another consumer already took the sentinel and
/// also ends the loop. Returns the number of real items consumed.
pub fn consume<T, F>(channel: &BoundedChannel<T>, mut f: F) -> ChannelResult<usize>
where
    T: Clone + PartialEq,
    F: FnMut(T),
{
    let mut consumed = 0;
    loop {
        match channel.take() {
            Ok(value) if channel.is_sentinel(&value) => break,
            Ok(value) => {
                f(value);
                consumed += 1;
            }
            Err(ChannelError::Closed) => break,
            Err(e) => return Err(e),
        }
    }
    debug!(consumed, "consumer finished");
    Ok(consumed)
}

/// Outcome of a one-producer/one-consumer run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport<T> {
    /// Items in the order the consumer received them
    pub received: Vec<T>,
    pub produced: usize,
    pub elapsed: Duration,
}

/// Run one producer thread and one consumer thread over a fresh channel
#[instrument(level = "debug", skip(items, sentinel), fields(item_count = items.len()))]
pub fn run_pipeline<T>(
    capacity: Capacity,
    items: Vec<T>,
    sentinel: T,
) -> Result<PipelineReport<T>, ConcurrencyError>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    let channel = Arc::new(BoundedChannel::new(capacity, sentinel));
    let start = Instant::now();

    let producer = {
        let channel = channel.clone();
        thread::Builder::new()
            .name("producer".into())
            .spawn(move || produce(&channel, items))
            .map_err(|e| HarnessError::Spawn(e.to_string()))?
    };

    let consumer = {
        let channel = channel.clone();
        thread::Builder::new()
            .name("consumer".into())
            .spawn(move || {
                let mut received = Vec::new();
                consume(&channel, |value| received.push(value)).map(|_| received)
            })
            .map_err(|e| HarnessError::Spawn(e.to_string()))?
    };

    let produced = producer
        .join()
        .map_err(|_| HarnessError::WorkerPanicked { worker: 0 })??;
    let received = consumer
        .join()
        .map_err(|_| HarnessError::WorkerPanicked { worker: 1 })??;

    let elapsed = start.elapsed();
    info!(
        produced,
        received = received.len(),
        elapsed_us = elapsed.as_micros() as u64,
        ?capacity,
        "pipeline complete"
    );

    Ok(PipelineReport {
        received,
        produced,
        elapsed,
    })
}
