//! Scheduling abstraction for periodic ticks and one-shot delays
//!
//! The engine never touches a clock directly. It asks a [`Scheduler`] for
//! registrations and is handed the matching [`ScheduleHandle`] back when one
//! fires, which keeps the timer logic deterministic under a fake clock.

pub mod manual;
pub mod tokio_scheduler;

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

// Re-export implementations
pub use manual::ManualScheduler;
pub use tokio_scheduler::TokioScheduler;

/// Opaque identifier for one scheduler registration. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ScheduleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of periodic and delayed callbacks.
///
/// `every` must not fire immediately: the first delivery happens one full
/// period after registration.
pub trait Scheduler {
    /// Register a repeating event every `period`
    fn every(&mut self, period: Duration) -> ScheduleHandle;

    /// Register a single event after `delay`
    fn after(&mut self, delay: Duration) -> ScheduleHandle;

    /// Cancel a registration. Unknown or already finished handles are ignored.
    fn cancel(&mut self, handle: ScheduleHandle);
}
