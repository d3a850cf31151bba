//! Serializable view of the engine

use serde::{Deserialize, Serialize};

use super::{ChainedRun, Controls, DurationSetting, Status};
use crate::hourglass::{format_clock, HourglassFill};

/// Point-in-time copy of everything a front end needs to draw the timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub status: Status,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    /// `MM:SS` of the remaining time
    pub display: String,
    pub percent_remaining: Option<f64>,
    pub hourglass: Option<HourglassFill>,
    pub configured: DurationSetting,
    /// Run queued behind the current one, not yet consumed
    pub chained_run: Option<ChainedRun>,
    /// A consumed chain is waiting out its grace delay
    pub chain_pending: bool,
    pub controls: Controls,
    pub completed_runs: u64,
}

impl Default for TimerSnapshot {
    fn default() -> Self {
        Self {
            status: Status::Idle,
            remaining_seconds: 0,
            total_seconds: 0,
            display: format_clock(0),
            percent_remaining: None,
            hourglass: None,
            configured: DurationSetting::default(),
            chained_run: None,
            chain_pending: false,
            controls: Controls::idle(),
            completed_runs: 0,
        }
    }
}
