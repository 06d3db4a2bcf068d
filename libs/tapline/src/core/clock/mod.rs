// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Clock abstraction - one query shape over four native timing sources.
//!
//! Callers ask for a timestamp of a given [`ClockKind`] and get back a
//! normalized [`ClockSample`] without caring whether the platform natively
//! offers nanosecond-resolution monotonic time, a counter/frequency pair, or
//! 100 ns filetime ticks. Clocks here are **passive**: they answer queries and
//! never schedule or wake anything.

pub mod convert;

use crate::core::Result;

/// Which native timing source a query consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClockKind {
    /// Real calendar time, seconds since the Unix epoch (1970-01-01T00:00:00Z).
    /// May jump forward or back with system adjustments.
    WallClock,
    /// Non-decreasing time since an unspecified starting point. The only kind
    /// safe for interval measurement and event timestamping.
    Monotonic,
    /// Combined kernel+user CPU time accounted to the current process.
    ProcessCpuTime,
    /// Combined kernel+user CPU time accounted to the calling thread.
    ThreadCpuTime,
}

/// A normalized clock reading.
///
/// Invariant: `0 <= nanoseconds < 1_000_000_000`. `seconds` is absolute for
/// [`ClockKind::WallClock`] and relative to an arbitrary epoch for the other
/// kinds. Produced fresh on every query, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    pub seconds: i64,
    pub nanoseconds: i32,
}

impl ClockSample {
    pub fn new(seconds: i64, nanoseconds: i32) -> Self {
        debug_assert!(
            (0..1_000_000_000).contains(&nanoseconds),
            "nanoseconds out of range: {nanoseconds}"
        );
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Fractional-seconds view, the unit the time base works in.
    #[inline]
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds as f64 + self.nanoseconds as f64 * 1.0e-9
    }
}

/// Query the requested clock.
///
/// Fails with [`crate::core::TapError::UnsupportedClock`] if the platform
/// cannot service `kind`, or [`crate::core::TapError::ClockUnavailable`] if
/// the native facility reports a transient failure (e.g. a frequency query
/// returning zero). Never returns stale or zeroed data on failure.
pub fn query(kind: ClockKind) -> Result<ClockSample> {
    #[cfg(unix)]
    return crate::unix::time::query(kind);

    #[cfg(windows)]
    return crate::windows::time::query(kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_normalized(sample: ClockSample) {
        assert!(
            (0..1_000_000_000).contains(&sample.nanoseconds),
            "nanoseconds out of range: {:?}",
            sample
        );
    }

    #[test]
    fn test_monotonic_never_decreases() {
        let mut last = query(ClockKind::Monotonic).unwrap().as_secs_f64();
        for _ in 0..100 {
            let current = query(ClockKind::Monotonic).unwrap().as_secs_f64();
            assert!(current >= last, "monotonic clock went backwards");
            last = current;
        }
    }

    #[test]
    fn test_wall_clock_is_past_2020() {
        let sample = query(ClockKind::WallClock).unwrap();
        assert_normalized(sample);
        // 2020-01-01T00:00:00Z
        assert!(sample.seconds > 1_577_836_800);
    }

    #[test]
    fn test_all_kinds_normalized() {
        for kind in [
            ClockKind::WallClock,
            ClockKind::Monotonic,
            ClockKind::ProcessCpuTime,
            ClockKind::ThreadCpuTime,
        ] {
            let sample = query(kind).unwrap();
            assert_normalized(sample);
        }
    }

    #[test]
    fn test_cpu_time_advances_under_load() {
        let before = query(ClockKind::ThreadCpuTime).unwrap().as_secs_f64();
        // Burn a little CPU on this thread.
        let mut acc = 0u64;
        for i in 0..5_000_000u64 {
            acc = acc.wrapping_add(i).rotate_left(7);
        }
        std::hint::black_box(acc);
        let after = query(ClockKind::ThreadCpuTime).unwrap().as_secs_f64();
        assert!(after >= before);
    }

    #[test]
    fn test_as_secs_f64() {
        let sample = ClockSample::new(5, 250_000_000);
        assert!((sample.as_secs_f64() - 5.25).abs() < 1e-12);
    }
}
