use crate::core::clock::ClockKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TapError {
    #[error("clock kind {0:?} is not supported on this platform")]
    UnsupportedClock(ClockKind),

    #[error("native clock facility failed: {0}")]
    ClockUnavailable(String),

    #[error("time base has not been synchronized")]
    NotSynchronized,

    #[error("time base is already synchronized")]
    AlreadySynchronized,

    #[error("producer callback is already registered")]
    AlreadyArmed,

    #[error("pipeline has been shut down")]
    Shutdown,

    #[error("driver error: {0}")]
    Driver(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TapError>;
