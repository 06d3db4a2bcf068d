// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Session lifecycle around the capture buffer.
//!
//! `Uninitialized -> Synchronized -> Armed`, terminal `Shutdown`. The time
//! base must be established before the producer callback is registered: a
//! failed synchronization refuses to arm rather than emitting systematically
//! wrong timestamps for the whole session.

use crate::core::capture::EventBuffer;
use crate::core::timebase::TimeBase;
use crate::core::{Result, TapError};

/// Registration seam for the external driver.
///
/// The driver owns device enumeration and the port lifecycle; this core only
/// needs a hook to hand its producer callback to. The driver must invoke the
/// callback serially - concurrent with the consumer is fine, overlapping with
/// itself is not.
pub trait InputDriver: Send {
    /// Install the producer callback. Every inbound hardware message is
    /// delivered to it as a raw byte slice, valid only for the duration of
    /// the call.
    fn register(&mut self, callback: Box<dyn Fn(&[u8]) + Send + Sync>) -> Result<()>;

    /// Remove the producer callback. After this returns, the driver must not
    /// invoke it again.
    fn unregister(&mut self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Uninitialized,
    Synchronized,
    Armed,
    Shutdown,
}

/// Single per-session instance tying the time base, the event buffer and the
/// driver registration together.
pub struct InputPipeline<D: InputDriver> {
    driver: D,
    state: PipelineState,
    buffer: Option<EventBuffer>,
}

impl<D: InputDriver> InputPipeline<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            state: PipelineState::Uninitialized,
            buffer: None,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Establish the time base from the host's reference time. Called exactly
    /// once, before arming.
    pub fn synchronize(&mut self, host_reference_time: f64) -> Result<()> {
        match self.state {
            PipelineState::Uninitialized => {}
            PipelineState::Shutdown => return Err(TapError::Shutdown),
            _ => return Err(TapError::AlreadySynchronized),
        }
        let timebase = TimeBase::synchronize(host_reference_time)?;
        self.buffer = Some(EventBuffer::new(timebase));
        self.state = PipelineState::Synchronized;
        Ok(())
    }

    /// Register the producer callback with the driver and begin capturing.
    pub fn arm(&mut self) -> Result<()> {
        match self.state {
            PipelineState::Synchronized => {}
            PipelineState::Uninitialized => return Err(TapError::NotSynchronized),
            PipelineState::Armed => return Err(TapError::AlreadyArmed),
            PipelineState::Shutdown => return Err(TapError::Shutdown),
        }
        let buffer = self
            .buffer
            .clone()
            .ok_or(TapError::NotSynchronized)?;
        self.driver
            .register(Box::new(move |payload| buffer.on_hardware_message(payload)))?;
        self.state = PipelineState::Armed;
        tracing::info!("input pipeline armed");
        Ok(())
    }

    /// Drain all buffered events and hand them to `dispatch` in arrival
    /// order. Called once per host tick; cheap when nothing arrived. Returns
    /// the number of events dispatched.
    ///
    /// The drain contract is satisfied once every event has been handed over;
    /// what the host does with them is its own business.
    pub fn drain_and_dispatch<F>(&mut self, dispatch: F) -> Result<usize>
    where
        F: FnMut(f64, &[u8]),
    {
        if self.state == PipelineState::Shutdown {
            return Err(TapError::Shutdown);
        }
        let buffer = self.buffer.as_ref().ok_or(TapError::NotSynchronized)?;
        Ok(buffer.drain_and_dispatch(dispatch))
    }

    /// Unregister the producer callback and release the buffer. Idempotent;
    /// no further capture or drain is valid afterwards.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == PipelineState::Shutdown {
            return Ok(());
        }
        if self.state == PipelineState::Armed {
            self.driver.unregister()?;
        }
        self.buffer = None;
        self.state = PipelineState::Shutdown;
        tracing::info!("input pipeline shut down");
        Ok(())
    }
}
