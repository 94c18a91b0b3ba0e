// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sv-bus: typed, non-blocking fan-out of lifecycle [`Event`]s to N
//! subscribers, each backed by a bounded FIFO.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use sv_core::Event;
use tokio::sync::mpsc;

/// Default per-subscriber FIFO capacity when none is given to [`EventBus::new`].
pub const DEFAULT_CAPACITY: usize = 64;

type SubscriberId = u64;

struct Inner {
    capacity: usize,
    next_event_id: AtomicU64,
    next_subscriber_id: AtomicU64,
    subscribers: RwLock<HashMap<SubscriberId, mpsc::Sender<Event>>>,
    closed: AtomicBool,
}

/// Typed fan-out bus for lifecycle events.
///
/// Cloning an `EventBus` shares the same subscriber table; it is cheap and
/// intended for handing out to every component that needs to publish.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

/// A receive-only handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    id: SubscriberId,
    rx: mpsc::Receiver<Event>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Receives the next event, or `None` once the bus has dropped this
    /// subscriber (via [`EventBus::unsubscribe`] or [`EventBus::close`]).
    pub async fn recv(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Result<Event, mpsc::error::TryRecvError> {
        self.rx.try_recv()
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity: capacity.max(1),
                next_event_id: AtomicU64::new(1),
                next_subscriber_id: AtomicU64::new(1),
                subscribers: RwLock::new(HashMap::new()),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Registers a new subscriber with the bus's default capacity. After the
    /// bus is closed, returns a handle whose `recv` immediately yields `None`
    /// instead of panicking or blocking forever.
    pub fn subscribe(&self) -> Subscription {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.capacity);
        if self.inner.closed.load(Ordering::Acquire) {
            // Drop `tx` immediately so `rx` observes end-of-stream on first poll.
            return Subscription { id, rx };
        }
        self.inner.subscribers.write().insert(id, tx);
        Subscription { id, rx }
    }

    /// Publishes an event to every current subscriber, assigning it the next
    /// monotonic `id`. Non-blocking: a subscriber whose FIFO is full has this
    /// event silently dropped for it alone, never for the others.
    /// A no-op after [`EventBus::close`].
    pub fn publish(&self, mut event: Event) -> Option<Event> {
        if self.inner.closed.load(Ordering::Acquire) {
            return None;
        }
        event.id = self.inner.next_event_id.fetch_add(1, Ordering::Relaxed);
        for tx in self.inner.subscribers.read().values() {
            if let Err(err) = tx.try_send(event.clone()) {
                match err {
                    mpsc::error::TrySendError::Full(_) => {
                        tracing::debug!(event_id = event.id, "dropping event for slow subscriber");
                    }
                    mpsc::error::TrySendError::Closed(_) => {}
                }
            }
        }
        Some(event)
    }

    /// Removes a subscriber, closing its FIFO so it observes end-of-stream.
    /// Idempotent and safe for unknown handles.
    pub fn unsubscribe(&self, id: u64) {
        self.inner.subscribers.write().remove(&id);
    }

    /// Closes the bus. Idempotent; subsequent `publish` calls are no-ops and
    /// every outstanding subscriber observes end-of-stream.
    pub fn close(&self) {
        self.inner.closed.store(true, Ordering::Release);
        self.inner.subscribers.write().clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
