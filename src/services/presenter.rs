//! Log-based presenter for the headless service

use tracing::{debug, info};

use crate::{
    engine::{Controls, Presenter},
    hourglass::{format_clock, HourglassFill},
};

const BAR_WIDTH: usize = 20;

/// Writes every render to the log. Front ends get the full state through
/// the snapshot channel; this keeps a trace of the countdown on the console.
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_controls: Option<Controls>,
}

impl LogPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for LogPresenter {
    fn render(&mut self, remaining_seconds: u64, total_seconds: u64) {
        match HourglassFill::from_counts(remaining_seconds, total_seconds) {
            Some(fill) => debug!(
                "⏳ {} [{}] {:.0}%",
                format_clock(remaining_seconds),
                fill.bar(BAR_WIDTH),
                fill.top_percent
            ),
            None => debug!("⏳ {} (no duration set)", format_clock(remaining_seconds)),
        }
    }

    fn set_controls(&mut self, controls: Controls) {
        if self.last_controls == Some(controls) {
            return;
        }
        info!(
            "Controls: start={} pause={} resume={} inputs={} add_time={}",
            controls.start, controls.pause, controls.resume, controls.config_inputs, controls.add_time
        );
        self.last_controls = Some(controls);
    }
}
