// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-process event bus: registry enforcement, bounded history, fan-out,
//! and best-effort durable projection.
//!
//! `emit` never blocks on a subscriber: delivery uses bounded channels and a
//! subscriber whose buffer is full is closed and removed — its consumer
//! observes end-of-stream and may resubscribe. All subscribers observe the
//! same total order as the emit calls. Projection failures are logged and
//! never reach subscribers.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use room_core::registry::{self, names};
use room_core::{Clock, Event, Fields, Level, SystemClock};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// Most recent events kept in memory for snapshots and observer backfill.
pub const RING_CAPACITY: usize = 512;

/// Bounded delivery depth per subscriber.
pub const SUBSCRIBER_DEPTH: usize = 64;

/// Durable sink for emitted events. Writes are best-effort; errors are
/// logged by the bus and never affect in-process fan-out.
pub trait Projection: Send + Sync {
    fn append(&self, event: &Event) -> Result<u64, ProjectionError>;
}

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("projection write failed: {0}")]
    Write(String),
}

impl Projection for room_storage::EventLog {
    fn append(&self, event: &Event) -> Result<u64, ProjectionError> {
        room_storage::EventLog::append(self, event).map_err(|e| ProjectionError::Write(e.to_string()))
    }
}

/// Opaque unsubscribe token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberHandle(u64);

/// A live subscription: bounded FIFO endpoint plus its handle.
pub struct Subscription {
    pub handle: SubscriberHandle,
    pub rx: mpsc::Receiver<Event>,
}

struct BusInner {
    ring: VecDeque<Event>,
    subscribers: HashMap<u64, mpsc::Sender<Event>>,
    next_handle: u64,
    total: u64,
}

/// Single in-process broadcast channel for all state changes.
pub struct EventBus<C: Clock = SystemClock> {
    clock: C,
    projection: Option<Arc<dyn Projection>>,
    inner: Mutex<BusInner>,
}

impl<C: Clock> EventBus<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            projection: None,
            inner: Mutex::new(BusInner {
                ring: VecDeque::with_capacity(RING_CAPACITY),
                subscribers: HashMap::new(),
                next_handle: 1,
                total: 0,
            }),
        }
    }

    pub fn with_projection(clock: C, projection: Arc<dyn Projection>) -> Self {
        let mut bus = Self::new(clock);
        bus.projection = Some(projection);
        bus
    }

    /// Current time from the bus clock; also used for synthetic evaluation
    /// events that are never emitted.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Validate, stamp, persist, ring-buffer, and fan out one event.
    ///
    /// Returns false when the name is not in the registry (the event is
    /// dropped and an error logged; no subscriber sees it).
    pub fn emit(&self, level: Level, name: &str, message: Option<&str>, fields: Fields) -> bool {
        if !registry::is_registered(name) {
            tracing::error!(name, "dropping event with unregistered name");
            return false;
        }
        let event = Event::new(self.clock.now(), level, name, message.map(String::from), fields);
        tracing::trace!(event = %event.log_summary(), "emit");

        if let Some(projection) = &self.projection {
            if let Err(e) = projection.append(&event) {
                tracing::warn!(error = %e, name, "event projection write failed");
            }
        }

        let mut inner = self.inner.lock();
        inner.total += 1;
        if inner.ring.len() == RING_CAPACITY {
            inner.ring.pop_front();
        }
        inner.ring.push_back(event.clone());
        inner.subscribers.retain(|handle, tx| match tx.try_send(event.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(handle = *handle, event = name, "closing slow event subscriber");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });
        true
    }

    /// `emit` at info with no message.
    pub fn info(&self, name: &str, fields: Fields) -> bool {
        self.emit(Level::Info, name, None, fields)
    }

    /// `emit` at error with a message.
    pub fn error(&self, name: &str, message: &str, fields: Fields) -> bool {
        self.emit(Level::Error, name, Some(message), fields)
    }

    /// Register a new subscriber. Concurrent with `emit`.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(SUBSCRIBER_DEPTH);
        let mut inner = self.inner.lock();
        let handle = inner.next_handle;
        inner.next_handle += 1;
        inner.subscribers.insert(handle, tx);
        Subscription { handle: SubscriberHandle(handle), rx }
    }

    /// Remove a subscriber; idempotent.
    pub fn unsubscribe(&self, handle: SubscriberHandle) {
        self.inner.lock().subscribers.remove(&handle.0);
    }

    /// Copy of the ring, oldest-first.
    pub fn snapshot(&self) -> Vec<Event> {
        self.inner.lock().ring.iter().cloned().collect()
    }

    /// The `k` most recent events, oldest-first, for observer backfill.
    pub fn recent(&self, k: usize) -> Vec<Event> {
        let inner = self.inner.lock();
        let skip = inner.ring.len().saturating_sub(k);
        inner.ring.iter().skip(skip).cloned().collect()
    }

    /// Monotonic count of emissions since construction (or [`Self::clear`]).
    pub fn total_count(&self) -> u64 {
        self.inner.lock().total
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// Drop every subscriber (each observes end-of-stream).
    pub fn close_all_subscribers(&self) {
        self.inner.lock().subscribers.clear();
    }

    /// Test support: empty the ring and reset the emission counter.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.ring.clear();
        inner.total = 0;
    }

    /// Names of everything in the ring, oldest-first. Assertion helper.
    pub fn event_names(&self) -> Vec<String> {
        self.inner.lock().ring.iter().map(|e| e.name.to_string()).collect()
    }
}

/// Emit a `system.error` for a downstream failure that the runtime absorbed.
pub fn emit_system_error<C: Clock>(bus: &EventBus<C>, context: &str, error: &str) {
    bus.error(
        names::SYSTEM_ERROR,
        error,
        room_core::fields! {"context" => context},
    );
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
