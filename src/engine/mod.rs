//! Timer engine module
//!
//! This module contains the countdown state machine, the tagged actions it
//! accepts, and the collaborator interfaces it reports to.

pub mod action;
pub mod collaborators;
pub mod error;
pub mod snapshot;
pub mod timer_engine;

// Re-export main types
pub use action::{Action, ChainedRun, DurationSetting};
pub use collaborators::{AlarmNotifier, Controls, CountingAlarm, Presenter, RecordingPresenter};
pub use error::TimerError;
pub use snapshot::TimerSnapshot;
pub use timer_engine::{Status, TimerEngine, GRACE_DELAY, TICK_PERIOD};
