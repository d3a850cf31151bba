//! Tagged user actions and deferred runs

use serde::{Deserialize, Serialize};

/// Minutes/seconds pair as entered by the user. Seconds are not limited to
/// `0..60`; only the summed total matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DurationSetting {
    pub minutes: u32,
    pub seconds: u32,
}

impl DurationSetting {
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self { minutes, seconds }
    }

    pub fn from_minutes(minutes: u32) -> Self {
        Self::new(minutes, 0)
    }

    /// Split a second count back into a normalized setting. `None` when the
    /// minutes do not fit.
    pub fn from_total_seconds(total: u64) -> Option<Self> {
        let minutes = u32::try_from(total / 60).ok()?;
        Some(Self::new(minutes, (total % 60) as u32))
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

/// Run to start automatically once the current one has completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChainedRun {
    StartPreset { minutes: u32, seconds: u32 },
}

impl ChainedRun {
    pub fn duration(&self) -> DurationSetting {
        match *self {
            ChainedRun::StartPreset { minutes, seconds } => DurationSetting::new(minutes, seconds),
        }
    }
}

/// Every operation a user can request from the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Configure { minutes: u32, seconds: u32 },
    Start,
    Pause,
    Resume,
    Reset,
    AddTime { seconds: i64 },
    SelectPreset { minutes: u32 },
    SelectChainedPreset { first_minutes: u32, second_minutes: u32 },
}

impl Action {
    /// Stable name used for last-action tracking and logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Configure { .. } => "configure",
            Action::Start => "start",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Reset => "reset",
            Action::AddTime { .. } => "add-time",
            Action::SelectPreset { .. } => "preset",
            Action::SelectChainedPreset { .. } => "chained-preset",
        }
    }
}
