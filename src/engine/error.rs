//! Engine rejection reasons

use thiserror::Error;

use super::Status;

/// A precondition the caller violated. The engine state is left untouched
/// whenever one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("cannot {action} while the timer is {status}")]
    InvalidTransition { action: &'static str, status: Status },

    #[error("the timer is running; reset before changing the duration or preset")]
    Busy,

    #[error("a chained run is about to start; reset to cancel it")]
    ChainPending,

    #[error("set a duration first")]
    NoDuration,

    #[error("time can only be added while the timer is running")]
    NotRunning,

    #[error("time to add must be a positive number of seconds, got {seconds}")]
    InvalidAmount { seconds: i64 },

    #[error("a chained preset needs a second run of at least one minute")]
    InvalidPreset,
}
