//! Errors raised when dispatching actions to the engine task

use thiserror::Error;

use crate::engine::TimerError;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Rejected(#[from] TimerError),

    #[error("the timer engine is not running")]
    EngineUnavailable,
}
