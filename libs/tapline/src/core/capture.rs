// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Shared event buffer between the driver's producer thread and the host's
//! consumer tick.
//!
//! # Architecture
//!
//! - Producer appends hold the lock for one push (driver threads may be
//!   latency-sensitive, so the hold time is constant)
//! - Consumer drains swap the whole buffer out in O(1), then dispatch
//!   outside the lock (a slow host callback never stalls the producer)
//! - Order is arrival order, always; ties on identical timestamps keep
//!   arrival order too
//! - Growth between drains is unbounded; draining at a reasonable cadence is
//!   the host's responsibility, and a high-water warning flags drains that
//!   fall behind

use crate::core::clock::{self, ClockKind};
use crate::core::timebase::TimeBase;
use parking_lot::Mutex;
use std::sync::Arc;

/// A hardware message plus the host time it arrived.
///
/// The payload is copied out of the driver's buffer at capture, because the
/// driver may reuse or invalidate its own storage the moment the callback
/// returns.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedEvent {
    /// Arrival time in the host's coordinate system (seconds).
    pub timestamp: f64,
    /// Raw message bytes, never empty.
    pub payload: Vec<u8>,
}

/// Drains larger than this log a warning: the consumer is falling behind the
/// producer's input rate.
const DRAIN_HIGH_WATER: usize = 4096;

/// Append-only (producer) / swap-to-empty (consumer) buffer of timed events.
///
/// Cloning is cheap and shares the same buffer; the producer side typically
/// holds one clone inside the driver callback while the consumer drains
/// through another.
#[derive(Clone)]
pub struct EventBuffer {
    inner: Arc<Inner>,
}

struct Inner {
    timebase: TimeBase,
    events: Mutex<Vec<TimedEvent>>,
}

impl EventBuffer {
    pub fn new(timebase: TimeBase) -> Self {
        Self {
            inner: Arc::new(Inner {
                timebase,
                events: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Producer entry point, called by the driver on its own thread for every
    /// inbound hardware message. Serialized by the driver, never overlapping.
    ///
    /// Empty payloads are ignored. A failed monotonic query drops the message
    /// loudly - there is no caller to propagate to, and fabricating a
    /// timestamp would poison the session's ordering guarantees.
    pub fn on_hardware_message(&self, payload: &[u8]) {
        if payload.is_empty() {
            return;
        }
        let sample = match clock::query(ClockKind::Monotonic) {
            Ok(sample) => sample,
            Err(err) => {
                tracing::error!("dropping hardware message, monotonic clock failed: {err}");
                return;
            }
        };
        let event = TimedEvent {
            timestamp: self.inner.timebase.to_host_time(sample),
            payload: payload.to_vec(),
        };
        // Allocation and stamping happen above; the lock covers the append only.
        self.inner.events.lock().push(event);
    }

    /// Consumer entry point, called once per host tick.
    ///
    /// Empty buffer: one lock probe, no side effects. Otherwise the entire
    /// contents are taken in one O(1) swap and dispatched FIFO after the lock
    /// is released. Returns the number of events dispatched. Drained events
    /// are dropped afterwards; there is no replay.
    pub fn drain_and_dispatch<F>(&self, mut dispatch: F) -> usize
    where
        F: FnMut(f64, &[u8]),
    {
        let drained = {
            let mut events = self.inner.events.lock();
            if events.is_empty() {
                return 0;
            }
            std::mem::take(&mut *events)
        };

        if drained.len() > DRAIN_HIGH_WATER {
            tracing::warn!(
                count = drained.len(),
                "large drain - consumer is falling behind the producer"
            );
        } else {
            tracing::debug!(count = drained.len(), "dispatching drained events");
        }

        for event in &drained {
            dispatch(event.timestamp, &event.payload);
        }
        drained.len()
    }

    /// Number of events currently buffered. Racy by nature; observability only.
    pub fn len(&self) -> usize {
        self.inner.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn timebase(&self) -> &TimeBase {
        &self.inner.timebase
    }
}
