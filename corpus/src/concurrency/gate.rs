//! Blocking coordination around the shared ring buffer.
//!
//! [`SyncGate`] combines one mutex protecting a [`RingBuffer`] with two counting semaphores:
//! `space` (free slots, starts at the buffer capacity) and `items` (occupied slots, starts at
//! zero). Both sides always wait on their semaphore *before* taking the mutex and signal the
//! partner semaphore *after* releasing it, so nobody ever blocks while holding the lock.
//!
//! The invariant maintained by the gate is:
//!
//! `space permits + space slots held by crawlers + buffer length == capacity`
//!
//! which makes a push on a full buffer or a pop on an empty one unreachable. Should either
//! happen anyway it is reported as [`ErrorKind::InvalidState`].

use std::sync::{Mutex, MutexGuard};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::buffer::RingBuffer;
use crate::concurrency::shutdown::ShutdownLatch;
use crate::error::{CorpusResult, ErrorKind};
use crate::{bail, corpus_error};

/// A reserved free slot in the ring buffer.
///
/// Obtained from [`SyncGate::acquire_space`]. The slot is consumed by
/// [`SyncGate::publish`]. Dropping it without a successful publish hands the space token
/// back to the gate, which is what happens to a crawler that wakes up after shutdown.
#[derive(Debug)]
#[must_use = "dropping a space slot returns it to the gate"]
pub struct SpaceSlot<'a> {
    permit: SemaphorePermit<'a>,
}

/// Outcome of [`SyncGate::publish`].
#[derive(Debug, PartialEq, Eq)]
pub enum Publish<T> {
    /// The item was enqueued and an item token was released.
    Accepted,
    /// The shutdown latch was tripped, the item is handed back and the slot was returned.
    Refused(T),
}

/// Mutex-protected ring buffer with blocking space and item accounting.
#[derive(Debug)]
pub struct SyncGate<T> {
    buffer: Mutex<RingBuffer<T>>,
    space: Semaphore,
    items: Semaphore,
}

impl<T> SyncGate<T> {
    /// Creates a gate around an empty buffer of the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: Mutex::new(RingBuffer::new(capacity)),
            space: Semaphore::new(capacity),
            items: Semaphore::new(0),
        }
    }

    /// Returns the number of free space tokens right now.
    ///
    /// The value is stale as soon as it is returned. It is only good for advisory tracing
    /// and must never drive a decision.
    pub fn available_space(&self) -> usize {
        self.space.available_permits()
    }

    /// Waits until a free slot can be reserved.
    ///
    /// Returns [`None`] once the gate has been closed.
    pub async fn acquire_space(&self) -> Option<SpaceSlot<'_>> {
        let permit = self.space.acquire().await.ok()?;

        Some(SpaceSlot { permit })
    }

    /// Enqueues `item` into the slot reserved by `slot`.
    ///
    /// The shutdown latch is checked while holding the buffer lock. The classifier decides
    /// whether it is done under the same lock, so an item is either accepted before the
    /// classifier's final emptiness check or refused.
    pub fn publish(
        &self,
        slot: SpaceSlot<'_>,
        item: T,
        latch: &ShutdownLatch,
    ) -> CorpusResult<Publish<T>> {
        {
            let mut buffer = self.lock()?;
            if latch.is_tripped() {
                return Ok(Publish::Refused(item));
            }

            if buffer.push(item).is_err() {
                bail!(
                    ErrorKind::InvalidState,
                    "Ring buffer was full while holding a space slot",
                    format!("capacity {}", buffer.capacity())
                );
            }
        }

        // The slot now lives in the buffer, it is given back by the consumer once popped.
        slot.permit.forget();
        self.items.add_permits(1);

        Ok(Publish::Accepted)
    }

    /// Waits for an item and removes it from the head of the buffer.
    ///
    /// Fails with [`ErrorKind::GateClosed`] if the gate was closed.
    pub async fn take(&self) -> CorpusResult<T> {
        let permit = self.items.acquire().await.map_err(|err| {
            corpus_error!(
                ErrorKind::GateClosed,
                "Sync gate closed while waiting for an item",
                source: err
            )
        })?;
        permit.forget();

        let item = self.lock()?.pop();
        let Some(item) = item else {
            bail!(
                ErrorKind::InvalidState,
                "Ring buffer was empty while holding an item token"
            );
        };

        self.space.add_permits(1);

        Ok(item)
    }

    /// Returns whether the buffer is currently empty, checked under the buffer lock.
    pub fn is_empty(&self) -> CorpusResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    /// Returns the number of buffered items, checked under the buffer lock.
    pub fn len(&self) -> CorpusResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Closes the gate waking every task blocked on it.
    ///
    /// Blocked and future [`SyncGate::acquire_space`] calls return [`None`], and
    /// [`SyncGate::take`] calls fail with [`ErrorKind::GateClosed`].
    pub fn close(&self) {
        self.space.close();
        self.items.close();
    }

    pub fn is_closed(&self) -> bool {
        self.space.is_closed()
    }

    fn lock(&self) -> CorpusResult<MutexGuard<'_, RingBuffer<T>>> {
        self.buffer.lock().map_err(|_| {
            corpus_error!(
                ErrorKind::InvalidState,
                "Ring buffer lock was poisoned by a panicking worker"
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    const SHORT_WAIT: Duration = Duration::from_millis(50);

    async fn push(gate: &SyncGate<u32>, item: u32, latch: &ShutdownLatch) -> Publish<u32> {
        let slot = gate.acquire_space().await.unwrap();
        gate.publish(slot, item, latch).unwrap()
    }

    #[tokio::test]
    async fn published_items_are_taken_in_order() {
        let gate = SyncGate::new(4);
        let latch = ShutdownLatch::new();

        for item in 1..=3 {
            assert_eq!(push(&gate, item, &latch).await, Publish::Accepted);
        }

        assert_eq!(gate.len().unwrap(), 3);
        assert_eq!(gate.available_space(), 1);
        assert_eq!(gate.take().await.unwrap(), 1);
        assert_eq!(gate.take().await.unwrap(), 2);
        assert_eq!(gate.take().await.unwrap(), 3);
        assert!(gate.is_empty().unwrap());
        assert_eq!(gate.available_space(), 4);
    }

    #[tokio::test]
    async fn acquire_space_blocks_while_full() {
        let gate = SyncGate::new(2);
        let latch = ShutdownLatch::new();

        push(&gate, 1, &latch).await;
        push(&gate, 2, &latch).await;

        assert!(timeout(SHORT_WAIT, gate.acquire_space()).await.is_err());

        assert_eq!(gate.take().await.unwrap(), 1);
        let slot = timeout(SHORT_WAIT, gate.acquire_space()).await.unwrap();
        assert!(slot.is_some());
    }

    #[tokio::test]
    async fn take_blocks_while_empty() {
        let gate = SyncGate::<u32>::new(2);

        assert!(timeout(SHORT_WAIT, gate.take()).await.is_err());
    }

    #[tokio::test]
    async fn refused_publish_returns_space_token() {
        let gate = SyncGate::new(1);
        let latch = ShutdownLatch::new();

        let slot = gate.acquire_space().await.unwrap();
        assert_eq!(gate.available_space(), 0);

        latch.trip();

        assert_eq!(gate.publish(slot, 9, &latch).unwrap(), Publish::Refused(9));
        assert_eq!(gate.available_space(), 1);
        assert!(gate.is_empty().unwrap());
    }

    #[tokio::test]
    async fn dropped_slot_returns_space_token() {
        let gate = SyncGate::<u32>::new(1);

        let slot = gate.acquire_space().await.unwrap();
        assert_eq!(gate.available_space(), 0);
        drop(slot);

        assert_eq!(gate.available_space(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn close_wakes_blocked_crawler() {
        let gate = Arc::new(SyncGate::new(1));
        let latch = ShutdownLatch::new();
        push(&gate, 1, &latch).await;

        let waiter = tokio::spawn({
            let gate = gate.clone();
            async move { gate.acquire_space().await.is_none() }
        });

        tokio::time::sleep(SHORT_WAIT).await;
        gate.close();

        assert!(timeout(Duration::from_secs(5), waiter).await.unwrap().unwrap());
        assert!(gate.is_closed());
    }

    #[tokio::test]
    async fn take_on_closed_gate_fails() {
        let gate = SyncGate::<u32>::new(1);
        gate.close();

        let err = gate.take().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::GateClosed);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_producers_keep_per_producer_order() {
        const PRODUCERS: u32 = 4;
        const PER_PRODUCER: u32 = 250;

        let gate = Arc::new(SyncGate::new(3));
        let latch = ShutdownLatch::new();

        let producers = (0..PRODUCERS)
            .map(|producer| {
                let gate = gate.clone();
                let latch = latch.clone();
                tokio::spawn(async move {
                    for seq in 0..PER_PRODUCER {
                        let slot = gate.acquire_space().await.unwrap();
                        let item = producer * PER_PRODUCER + seq;
                        assert_eq!(gate.publish(slot, item, &latch).unwrap(), Publish::Accepted);
                    }
                })
            })
            .collect::<Vec<_>>();

        let mut last_seen = vec![None; PRODUCERS as usize];
        for _ in 0..PRODUCERS * PER_PRODUCER {
            let item = gate.take().await.unwrap();
            assert!(gate.len().unwrap() <= 3);

            let producer = (item / PER_PRODUCER) as usize;
            let seq = item % PER_PRODUCER;
            if let Some(previous) = last_seen[producer] {
                assert!(seq > previous, "items of one producer must stay in order");
            }
            last_seen[producer] = Some(seq);
        }

        for producer in producers {
            producer.await.unwrap();
        }

        assert!(gate.is_empty().unwrap());
        assert_eq!(gate.available_space(), 3);
        assert!(last_seen.iter().all(|seq| *seq == Some(PER_PRODUCER - 1)));
    }
}
