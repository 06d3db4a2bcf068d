// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Windows clock backend.
//!
//! Thin FFI shell over kernel32: the wall clock comes from
//! `GetSystemTimeAsFileTime` (1601 epoch, corrected to Unix), the monotonic
//! clock from the QPC counter/frequency pair, and CPU time from
//! `GetProcessTimes` / `GetThreadTimes` (kernel+user sum). All tick math
//! lives in [`crate::core::clock::convert`] so it stays testable off-platform.

use crate::core::clock::convert::{counter_to_sample, cputime_to_sample, filetime_to_sample};
use crate::core::clock::{ClockKind, ClockSample};
use crate::core::{Result, TapError};
use std::ffi::c_void;

type Handle = *mut c_void;
type Bool = i32;

#[repr(C)]
#[derive(Clone, Copy)]
struct FileTime {
    low_date_time: u32,
    high_date_time: u32,
}

impl FileTime {
    const ZERO: FileTime = FileTime {
        low_date_time: 0,
        high_date_time: 0,
    };

    #[inline]
    fn ticks(self) -> u64 {
        (self.high_date_time as u64) << 32 | self.low_date_time as u64
    }
}

#[link(name = "kernel32")]
unsafe extern "system" {
    fn GetSystemTimeAsFileTime(system_time_as_file_time: *mut FileTime);
    fn QueryPerformanceFrequency(frequency: *mut i64) -> Bool;
    fn QueryPerformanceCounter(count: *mut i64) -> Bool;
    fn GetCurrentProcess() -> Handle;
    fn GetCurrentThread() -> Handle;
    fn GetProcessTimes(
        process: Handle,
        creation_time: *mut FileTime,
        exit_time: *mut FileTime,
        kernel_time: *mut FileTime,
        user_time: *mut FileTime,
    ) -> Bool;
    fn GetThreadTimes(
        thread: Handle,
        creation_time: *mut FileTime,
        exit_time: *mut FileTime,
        kernel_time: *mut FileTime,
        user_time: *mut FileTime,
    ) -> Bool;
}

pub fn query(kind: ClockKind) -> Result<ClockSample> {
    match kind {
        ClockKind::WallClock => {
            let mut filetime = FileTime::ZERO;
            // SAFETY: valid out-pointer; the call cannot fail.
            unsafe { GetSystemTimeAsFileTime(&mut filetime) };
            Ok(filetime_to_sample(filetime.ticks()))
        }
        ClockKind::Monotonic => {
            let mut frequency = 0i64;
            let mut counter = 0i64;
            // SAFETY: valid out-pointers for both calls.
            let ok = unsafe {
                QueryPerformanceFrequency(&mut frequency) != 0
                    && QueryPerformanceCounter(&mut counter) != 0
            };
            if !ok {
                return Err(TapError::ClockUnavailable(
                    "QueryPerformanceCounter failed".into(),
                ));
            }
            counter_to_sample(counter, frequency)
        }
        ClockKind::ProcessCpuTime => {
            let mut times = [FileTime::ZERO; 4];
            // SAFETY: pseudo-handle plus four valid out-pointers.
            let ok = unsafe {
                GetProcessTimes(
                    GetCurrentProcess(),
                    &mut times[0],
                    &mut times[1],
                    &mut times[2],
                    &mut times[3],
                ) != 0
            };
            if !ok {
                return Err(TapError::ClockUnavailable("GetProcessTimes failed".into()));
            }
            Ok(cputime_to_sample(times[2].ticks(), times[3].ticks()))
        }
        ClockKind::ThreadCpuTime => {
            let mut times = [FileTime::ZERO; 4];
            // SAFETY: pseudo-handle plus four valid out-pointers.
            let ok = unsafe {
                GetThreadTimes(
                    GetCurrentThread(),
                    &mut times[0],
                    &mut times[1],
                    &mut times[2],
                    &mut times[3],
                ) != 0
            };
            if !ok {
                return Err(TapError::ClockUnavailable("GetThreadTimes failed".into()));
            }
            Ok(cputime_to_sample(times[2].ticks(), times[3].ticks()))
        }
    }
}
