// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Pure tick-count conversions shared by the platform backends.
//!
//! Kept platform-independent so the rounding, carry and epoch contracts are
//! unit-tested on every host, not just the platform whose backend uses them.

use super::ClockSample;
use crate::core::{Result, TapError};

const NANOS_PER_SEC: i64 = 1_000_000_000;
const TICKS_100NS_PER_SEC: i64 = 10_000_000;

/// 100 ns ticks between the 1601-01-01 filetime epoch and the Unix epoch.
pub const EPOCH_DELTA_100NS: i64 = 116_444_736_000_000_000;

/// Convert a raw counter reading with a separate ticks-per-second frequency
/// into a normalized sample.
///
/// The remainder is converted with round-to-nearest, not truncation:
/// `nanos = (rem * 1e9 + freq/2) / freq`, carrying one second when the result
/// reaches 1e9. Truncating here produces a measurable long-run skew against
/// the host's own clock.
pub fn counter_to_sample(ticks: i64, frequency: i64) -> Result<ClockSample> {
    if frequency <= 0 {
        return Err(TapError::ClockUnavailable(format!(
            "counter frequency query returned {frequency}"
        )));
    }
    let mut seconds = ticks / frequency;
    let remainder = ticks % frequency;
    // i128 keeps `rem * 1e9` exact for frequencies beyond ~9.2 GHz.
    let mut nanos =
        ((remainder as i128 * NANOS_PER_SEC as i128 + frequency as i128 / 2) / frequency as i128) as i64;
    if nanos >= NANOS_PER_SEC {
        seconds += 1;
        nanos -= NANOS_PER_SEC;
    }
    Ok(ClockSample::new(seconds, nanos as i32))
}

/// Convert a 100 ns tick count with an arbitrary epoch into a sample.
/// Sub-tick precision does not exist, so the nanosecond part is exact.
pub fn ticks_100ns_to_sample(ticks: i64) -> ClockSample {
    ClockSample::new(
        ticks / TICKS_100NS_PER_SEC,
        ((ticks % TICKS_100NS_PER_SEC) * 100) as i32,
    )
}

/// Convert an absolute filetime (100 ns ticks since 1601-01-01) into a sample
/// on the Unix epoch.
pub fn filetime_to_sample(ticks_100ns: u64) -> ClockSample {
    ticks_100ns_to_sample(ticks_100ns as i64 - EPOCH_DELTA_100NS)
}

/// Sum kernel and user CPU accounting (each in 100 ns ticks) into a sample.
pub fn cputime_to_sample(kernel_100ns: u64, user_100ns: u64) -> ClockSample {
    ticks_100ns_to_sample((kernel_100ns + user_100ns) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_whole_seconds() {
        let sample = counter_to_sample(30_000_000, 10_000_000).unwrap();
        assert_eq!(sample, ClockSample::new(3, 0));
    }

    #[test]
    fn test_counter_rounds_to_nearest_up() {
        // 2/3 of a second at 3 Hz: 666666666.67 ns must round to ...67, not ...66.
        let sample = counter_to_sample(2, 3).unwrap();
        assert_eq!(sample, ClockSample::new(0, 666_666_667));
    }

    #[test]
    fn test_counter_rounds_to_nearest_down() {
        // 1/3 of a second: 333333333.33 ns rounds down.
        let sample = counter_to_sample(1, 3).unwrap();
        assert_eq!(sample, ClockSample::new(0, 333_333_333));
    }

    #[test]
    fn test_counter_carry_at_one_second() {
        // 4 GHz counter, one tick short of a full second: the rounded
        // nanosecond part computes to exactly 1e9 and must carry.
        let freq = 4_000_000_000;
        let sample = counter_to_sample(freq - 1, freq).unwrap();
        assert_eq!(sample, ClockSample::new(1, 0));
    }

    #[test]
    fn test_counter_high_frequency_no_overflow() {
        // Remainder * 1e9 exceeds i64 at this frequency.
        let freq = 10_000_000_000;
        let sample = counter_to_sample(freq + freq / 2, freq).unwrap();
        assert_eq!(sample, ClockSample::new(1, 500_000_000));
    }

    #[test]
    fn test_counter_zero_frequency_fails() {
        assert!(counter_to_sample(12345, 0).is_err());
    }

    #[test]
    fn test_100ns_ticks_truncate() {
        // 1.5 s plus one tick: 100 ns granularity, no rounding involved.
        let sample = ticks_100ns_to_sample(15_000_001);
        assert_eq!(sample, ClockSample::new(1, 500_000_100));
    }

    #[test]
    fn test_filetime_epoch_delta() {
        assert_eq!(
            filetime_to_sample(EPOCH_DELTA_100NS as u64),
            ClockSample::new(0, 0)
        );
        // 2020-01-01T00:00:00Z is 1577836800 s after the Unix epoch.
        let ticks = EPOCH_DELTA_100NS as u64 + 1_577_836_800 * TICKS_100NS_PER_SEC as u64;
        assert_eq!(
            filetime_to_sample(ticks),
            ClockSample::new(1_577_836_800, 0)
        );
    }

    #[test]
    fn test_cputime_sums_kernel_and_user() {
        // 0.25 s kernel + 0.75 s user = 1 s even.
        let sample = cputime_to_sample(2_500_000, 7_500_000);
        assert_eq!(sample, ClockSample::new(1, 0));
    }
}
