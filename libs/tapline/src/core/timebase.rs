// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Host time-base synchronization.
//!
//! The host runtime has its own notion of "current time" with its own epoch.
//! At startup we sample the monotonic clock once and store the difference to
//! the host's reference value; every later monotonic sample translates into
//! the host's coordinate system as `offset + monotonic_secs`. Whatever
//! wall-clock delay passed between process start and the host's reference
//! query is absorbed into the offset, so translated timestamps stay
//! drift-free against the host's clock for the whole session.

use crate::core::clock::{self, ClockKind, ClockSample};
use crate::core::Result;

/// Immutable translation from local monotonic time into host time.
///
/// An explicit context object rather than process-global state, so tests can
/// construct independent instances.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    offset: f64,
}

impl TimeBase {
    /// Sample the monotonic clock once and anchor it to the host's reference
    /// time. Called exactly once, before any event can be stamped; fails with
    /// [`crate::core::TapError::ClockUnavailable`] if the monotonic query
    /// fails, in which case the pipeline must not arm.
    pub fn synchronize(host_reference_time: f64) -> Result<Self> {
        let local_zero = clock::query(ClockKind::Monotonic)?.as_secs_f64();
        let offset = host_reference_time - local_zero;
        tracing::info!(host_reference_time, offset, "time base synchronized");
        Ok(Self { offset })
    }

    /// Build a time base from a known offset, bypassing the monotonic sample.
    /// Intended for tests that need a deterministic coordinate system.
    pub fn with_offset(offset: f64) -> Self {
        Self { offset }
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Translate a monotonic sample into host time.
    #[inline]
    pub fn to_host_time(&self, sample: ClockSample) -> f64 {
        self.offset + sample.as_secs_f64()
    }

    /// Current host time from a fresh monotonic sample.
    pub fn now(&self) -> Result<f64> {
        Ok(self.to_host_time(clock::query(ClockKind::Monotonic)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ClockSample;

    #[test]
    fn test_translation_is_linear() {
        // A sample advanced by d seconds must map to T0 + d.
        let timebase = TimeBase::with_offset(1000.0);
        let base = ClockSample::new(50, 0);
        let advanced = ClockSample::new(52, 500_000_000);
        let t0 = timebase.to_host_time(base);
        let t1 = timebase.to_host_time(advanced);
        assert!((t1 - t0 - 2.5).abs() < 1e-9);
        assert!((t0 - 1050.0).abs() < 1e-9);
    }

    #[test]
    fn test_synchronize_absorbs_startup_delay() {
        let host_reference = 777.25;
        let timebase = TimeBase::synchronize(host_reference).unwrap();
        // Immediately after synchronizing, host time is the reference value.
        let now = timebase.now().unwrap();
        assert!(now >= host_reference);
        assert!(now - host_reference < 0.5, "now drifted: {now}");
    }

    #[test]
    fn test_now_advances() {
        let timebase = TimeBase::synchronize(0.0).unwrap();
        let a = timebase.now().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let b = timebase.now().unwrap();
        assert!(b > a);
    }
}
