//! Interfaces the engine calls into, plus recording doubles for tests

use serde::{Deserialize, Serialize};

/// Which user controls are currently meaningful. Reset is always available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Controls {
    pub start: bool,
    pub pause: bool,
    pub resume: bool,
    pub config_inputs: bool,
    pub add_time: bool,
}

impl Controls {
    pub fn idle() -> Self {
        Self {
            start: true,
            config_inputs: true,
            ..Self::default()
        }
    }

    pub fn running() -> Self {
        Self {
            pause: true,
            add_time: true,
            ..Self::default()
        }
    }

    pub fn paused() -> Self {
        Self {
            resume: true,
            ..Self::default()
        }
    }

    /// Everything locked while a chained run waits out its grace delay
    pub fn locked() -> Self {
        Self::default()
    }
}

/// Receives display data from the engine
pub trait Presenter {
    fn render(&mut self, remaining_seconds: u64, total_seconds: u64);

    fn set_controls(&mut self, controls: Controls);
}

/// Performs the completion effects. Called once per finished run and must
/// return promptly; failures stay inside the implementation.
pub trait AlarmNotifier {
    fn on_complete(&mut self);
}

/// Presenter that keeps everything it was given
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub renders: Vec<(u64, u64)>,
    pub controls: Vec<Controls>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_render(&self) -> Option<(u64, u64)> {
        self.renders.last().copied()
    }

    pub fn last_controls(&self) -> Option<Controls> {
        self.controls.last().copied()
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, remaining_seconds: u64, total_seconds: u64) {
        self.renders.push((remaining_seconds, total_seconds));
    }

    fn set_controls(&mut self, controls: Controls) {
        self.controls.push(controls);
    }
}

/// Alarm that only counts completions
#[derive(Debug, Default)]
pub struct CountingAlarm {
    pub fired: usize,
}

impl CountingAlarm {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AlarmNotifier for CountingAlarm {
    fn on_complete(&mut self) {
        self.fired += 1;
    }
}
