// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Unix clock backend (Linux, macOS).
//!
//! `clock_gettime(2)` already reports nanoseconds for all four kinds, so no
//! tick conversion is needed here. Errors are mapped by errno: `EINVAL` means
//! the clock id is unknown to this kernel (unsupported), anything else is a
//! transient facility failure.

use crate::core::clock::{ClockKind, ClockSample};
use crate::core::{Result, TapError};

pub fn query(kind: ClockKind) -> Result<ClockSample> {
    let clock_id: libc::clockid_t = match kind {
        ClockKind::WallClock => libc::CLOCK_REALTIME,
        ClockKind::Monotonic => libc::CLOCK_MONOTONIC,
        ClockKind::ProcessCpuTime => libc::CLOCK_PROCESS_CPUTIME_ID,
        ClockKind::ThreadCpuTime => libc::CLOCK_THREAD_CPUTIME_ID,
    };

    let mut ts = libc::timespec {
        tv_sec: 0,
        tv_nsec: 0,
    };
    // SAFETY: `ts` is a valid, exclusively borrowed out-pointer for the call.
    let rc = unsafe { libc::clock_gettime(clock_id, &mut ts) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        return Err(match err.raw_os_error() {
            Some(libc::EINVAL) => TapError::UnsupportedClock(kind),
            _ => TapError::ClockUnavailable(format!("clock_gettime({kind:?}): {err}")),
        });
    }

    Ok(ClockSample::new(ts.tv_sec as i64, ts.tv_nsec as i32))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_clock_ids_serviced() {
        for kind in [
            ClockKind::WallClock,
            ClockKind::Monotonic,
            ClockKind::ProcessCpuTime,
            ClockKind::ThreadCpuTime,
        ] {
            let sample = query(kind).unwrap();
            assert!((0..1_000_000_000).contains(&sample.nanoseconds));
        }
    }

    #[test]
    fn test_monotonic_resolution_is_subsecond() {
        let a = query(ClockKind::Monotonic).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let b = query(ClockKind::Monotonic).unwrap();
        let elapsed = b.as_secs_f64() - a.as_secs_f64();
        assert!(elapsed >= 0.010 && elapsed < 1.0, "elapsed {elapsed}");
    }
}
