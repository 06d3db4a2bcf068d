// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Timestamped hardware input capture.
//!
//! Two layers, the second built on the first:
//!
//! - [`core::clock`]: four logical clocks (wall-clock, monotonic, process CPU
//!   time, thread CPU time) behind one query shape, regardless of which native
//!   timing primitives the platform exposes.
//! - [`core::capture`] / [`core::pipeline`]: an asynchronous driver callback
//!   stamps each inbound hardware message with a host-synchronized monotonic
//!   timestamp and appends it to a shared buffer; the host's tick loop drains
//!   the buffer and dispatches events in arrival order.
//!
//! The producer never blocks on the consumer: appends and drains each hold the
//! buffer lock for a constant-time operation, and dispatch runs outside it.

pub mod core;

// Platform clock backends. Both converge on `core::clock::ClockSample`.
#[cfg(unix)]
pub(crate) mod unix;

#[cfg(windows)]
pub(crate) mod windows;

pub use core::{
    query, ClockKind, ClockSample, EventBuffer, InputDriver, InputPipeline, PipelineState, Result,
    TapError, TimeBase, TimedEvent,
};

pub mod platform {
    pub fn name() -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS";
        #[cfg(target_os = "linux")]
        return "Linux";
        #[cfg(target_os = "windows")]
        return "Windows";
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        return "Unix";
    }
}
