// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

pub mod capture;
pub mod clock;
pub mod error;
pub mod pipeline;
pub mod timebase;

pub use capture::{EventBuffer, TimedEvent};
pub use clock::{query, ClockKind, ClockSample};
pub use error::{Result, TapError};
pub use pipeline::{InputDriver, InputPipeline, PipelineState};
pub use timebase::TimeBase;
