//! Inbound event queue
//!
//! A bounded, blocking multi-producer/multi-consumer queue of events with a
//! data-driven shutdown path: [`EventQueue::interrupt`] enqueues one sentinel
//! per worker, and each blocked worker wakes, consumes exactly one sentinel
//! and exits. Shutdown is an ordinary queue message, not a thread interrupt,
//! so a queue that has fully drained its sentinels can be reused for a later
//! run cycle.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};

use vigil_event::Event;

use crate::error::{DispatchError, Result};

/// One message on the inbound queue
pub(crate) enum QueueItem {
    /// A normalized event to dispatch
    Event(Event),
    /// Shutdown sentinel; the consuming worker exits its loop
    Shutdown,
}

/// Blocking MPMC queue feeding the dispatch workers
///
/// Cloning is cheap and shares the same queue; producers call
/// [`push`](Self::push) from any thread, workers block on the internal
/// dequeue. A bounded queue applies backpressure to producers when full.
#[derive(Clone)]
pub struct EventQueue {
    tx: Sender<QueueItem>,
    rx: Receiver<QueueItem>,
}

impl EventQueue {
    /// Create a bounded queue with the given capacity
    pub fn bounded(capacity: usize) -> Self {
        let (tx, rx) = bounded(capacity);
        Self { tx, rx }
    }

    /// Create an unbounded queue (no producer backpressure)
    pub fn unbounded() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Enqueue an event, blocking while the queue is full
    ///
    /// # Errors
    ///
    /// Returns `QueueClosed` if every consumer handle has been dropped.
    pub fn push(&self, event: Event) -> Result<()> {
        self.tx
            .send(QueueItem::Event(event))
            .map_err(|_| DispatchError::QueueClosed)
    }

    /// Number of items currently queued (events and pending sentinels)
    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Check if the queue is currently empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Queue capacity, `None` if unbounded
    #[inline]
    pub fn capacity(&self) -> Option<usize> {
        self.rx.capacity()
    }

    /// Dequeue the next item, blocking until one is available
    ///
    /// A disconnected queue is reported as `Shutdown`: with no producers
    /// left there is nothing further to dispatch.
    pub(crate) fn pop(&self) -> QueueItem {
        self.rx.recv().unwrap_or(QueueItem::Shutdown)
    }

    /// Wake `workers` blocked consumers for shutdown
    ///
    /// Enqueues exactly one sentinel per worker, behind any events already
    /// queued. Each worker consumes exactly one sentinel, so none leak into
    /// a subsequent run cycle.
    pub(crate) fn interrupt(&self, workers: usize) {
        for _ in 0..workers {
            // Send only fails when all receivers are gone, in which case
            // there is nobody left to wake.
            let _ = self.tx.send(QueueItem::Shutdown);
        }
    }
}

impl std::fmt::Debug for EventQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}
