//! Countdown state machine with single-hop chaining

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{
    Action, AlarmNotifier, ChainedRun, Controls, DurationSetting, Presenter, TimerError,
    TimerSnapshot,
};
use crate::{
    hourglass::{format_clock, percent_remaining, HourglassFill},
    scheduler::{ManualScheduler, ScheduleHandle, Scheduler},
};

/// Period of the countdown tick
pub const TICK_PERIOD: Duration = Duration::from_millis(1000);

/// Pause between a completed run and the start of its chained successor
pub const GRACE_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Idle,
    Running,
    Paused,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Idle => "idle",
            Status::Running => "running",
            Status::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// The single timer of a session.
///
/// All mutations happen through `&mut self` and run to completion, so the
/// owner decides how user actions and fired schedules are serialized.
/// Scheduler events are fed back through [`TimerEngine::on_fired`].
#[derive(Debug)]
pub struct TimerEngine<S, P, A> {
    scheduler: S,
    presenter: P,
    alarm: A,
    configured: DurationSetting,
    total_seconds: u64,
    remaining_seconds: u64,
    status: Status,
    chained_run: Option<ChainedRun>,
    tick: Option<ScheduleHandle>,
    pending_launch: Option<(ScheduleHandle, ChainedRun)>,
    completed_runs: u64,
}

impl<S, P, A> TimerEngine<S, P, A>
where
    S: Scheduler,
    P: Presenter,
    A: AlarmNotifier,
{
    /// Create an idle engine configured for `initial` and push the initial
    /// view to the presenter
    pub fn new(scheduler: S, presenter: P, alarm: A, initial: DurationSetting) -> Self {
        let total = initial.total_seconds();
        let mut engine = Self {
            scheduler,
            presenter,
            alarm,
            configured: initial,
            total_seconds: total,
            remaining_seconds: total,
            status: Status::Idle,
            chained_run: None,
            tick: None,
            pending_launch: None,
            completed_runs: 0,
        };
        engine.render();
        engine.publish_controls();
        engine
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn total_seconds(&self) -> u64 {
        self.total_seconds
    }

    pub fn configured(&self) -> DurationSetting {
        self.configured
    }

    pub fn chained_run(&self) -> Option<ChainedRun> {
        self.chained_run
    }

    /// Chained run that has been consumed and is waiting for its grace delay
    pub fn pending_launch(&self) -> Option<ChainedRun> {
        self.pending_launch.map(|(_, run)| run)
    }

    pub fn completed_runs(&self) -> u64 {
        self.completed_runs
    }

    pub fn percent_remaining(&self) -> Option<f64> {
        percent_remaining(self.remaining_seconds, self.total_seconds)
    }

    pub fn controls(&self) -> Controls {
        match self.status {
            Status::Running => Controls::running(),
            Status::Paused => Controls::paused(),
            Status::Idle if self.pending_launch.is_some() => Controls::locked(),
            Status::Idle => Controls::idle(),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn alarm(&self) -> &A {
        &self.alarm
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            status: self.status,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            display: format_clock(self.remaining_seconds),
            percent_remaining: self.percent_remaining(),
            hourglass: HourglassFill::from_counts(self.remaining_seconds, self.total_seconds),
            configured: self.configured,
            chained_run: self.chained_run,
            chain_pending: self.pending_launch.is_some(),
            controls: self.controls(),
            completed_runs: self.completed_runs,
        }
    }

    /// Dispatch a tagged action to the matching operation
    pub fn apply(&mut self, action: Action) -> Result<(), TimerError> {
        match action {
            Action::Configure { minutes, seconds } => self.configure(minutes, seconds),
            Action::Start => self.start(),
            Action::Pause => self.pause(),
            Action::Resume => self.resume(),
            Action::Reset => {
                self.reset();
                Ok(())
            }
            Action::AddTime { seconds } => self.add_time(seconds),
            Action::SelectPreset { minutes } => self.select_preset(minutes),
            Action::SelectChainedPreset {
                first_minutes,
                second_minutes,
            } => self.select_chained_preset(first_minutes, second_minutes),
        }
    }

    /// Set the duration of the next run. Only allowed while idle.
    pub fn configure(&mut self, minutes: u32, seconds: u32) -> Result<(), TimerError> {
        self.ensure_idle()?;
        if self.pending_launch.is_some() {
            return Err(TimerError::ChainPending);
        }
        self.set_duration(DurationSetting::new(minutes, seconds));
        debug!("Configured {}", format_clock(self.total_seconds));
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), TimerError> {
        if self.status != Status::Idle {
            return Err(TimerError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }
        if self.pending_launch.is_some() {
            return Err(TimerError::ChainPending);
        }
        let total = self.configured.total_seconds();
        if total == 0 {
            return Err(TimerError::NoDuration);
        }

        self.total_seconds = total;
        self.remaining_seconds = total;
        self.begin_run();
        info!("Timer started for {}", format_clock(total));
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.status != Status::Running {
            return Err(TimerError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }
        self.cancel_tick();
        self.status = Status::Paused;
        self.publish_controls();
        info!("Timer paused at {}", format_clock(self.remaining_seconds));
        Ok(())
    }

    /// Continue a paused run. The next decrement lands one full tick period
    /// after this call.
    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.status != Status::Paused {
            return Err(TimerError::InvalidTransition {
                action: "resume",
                status: self.status,
            });
        }
        self.arm_tick();
        self.status = Status::Running;
        self.publish_controls();
        info!("Timer resumed at {}", format_clock(self.remaining_seconds));
        Ok(())
    }

    /// Extend the running countdown. Both the remaining and the total time
    /// grow, and the configured baseline follows the new total.
    pub fn add_time(&mut self, delta_seconds: i64) -> Result<(), TimerError> {
        if self.status != Status::Running {
            return Err(TimerError::NotRunning);
        }
        // The extended total must stay expressible as a reset baseline
        let (delta, total, baseline) = u64::try_from(delta_seconds)
            .ok()
            .filter(|d| *d > 0)
            .and_then(|delta| {
                let total = self.total_seconds.checked_add(delta)?;
                let baseline = DurationSetting::from_total_seconds(total)?;
                Some((delta, total, baseline))
            })
            .ok_or(TimerError::InvalidAmount {
                seconds: delta_seconds,
            })?;

        self.total_seconds = total;
        self.remaining_seconds = self.remaining_seconds.saturating_add(delta);
        self.configured = baseline;
        self.render();
        info!(
            "Added {}s, {} of {} remaining",
            delta,
            format_clock(self.remaining_seconds),
            format_clock(self.total_seconds)
        );
        Ok(())
    }

    /// Stop everything and return to the configured baseline. Allowed in any
    /// state; also cancels a chained run that is waiting for its grace delay.
    pub fn reset(&mut self) {
        self.cancel_tick();
        if let Some((handle, run)) = self.pending_launch.take() {
            self.scheduler.cancel(handle);
            info!("Cancelled pending chained run {:?}", run);
        }
        self.chained_run = None;
        self.status = Status::Idle;

        let total = self.configured.total_seconds();
        self.total_seconds = total;
        self.remaining_seconds = total;
        self.render();
        self.publish_controls();
        info!("Timer reset to {}", format_clock(total));
    }

    pub fn select_preset(&mut self, minutes: u32) -> Result<(), TimerError> {
        self.ensure_idle()?;
        self.supersede_chain();
        self.set_duration(DurationSetting::from_minutes(minutes));
        self.publish_controls();
        info!("Preset selected: {} min", minutes);
        Ok(())
    }

    /// Configure `first_minutes` now and queue `second_minutes` to start on
    /// its own after the first run completes. Does not start anything.
    pub fn select_chained_preset(
        &mut self,
        first_minutes: u32,
        second_minutes: u32,
    ) -> Result<(), TimerError> {
        self.ensure_idle()?;
        if second_minutes == 0 {
            return Err(TimerError::InvalidPreset);
        }
        self.supersede_chain();
        self.set_duration(DurationSetting::from_minutes(first_minutes));
        self.chained_run = Some(ChainedRun::StartPreset {
            minutes: second_minutes,
            seconds: 0,
        });
        self.publish_controls();
        info!(
            "Chained preset selected: {} min then {} min",
            first_minutes, second_minutes
        );
        Ok(())
    }

    /// Deliver a fired scheduler registration. Handles that no longer belong
    /// to the engine (cancelled after being queued) are ignored.
    pub fn on_fired(&mut self, handle: ScheduleHandle) {
        if self.tick == Some(handle) {
            self.on_tick();
        } else if let Some((pending, run)) = self.pending_launch {
            if pending == handle {
                self.pending_launch = None;
                self.launch(run);
            } else {
                debug!("Ignoring stale schedule {}", handle);
            }
        } else {
            debug!("Ignoring stale schedule {}", handle);
        }
    }

    fn on_tick(&mut self) {
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.render();
        if self.remaining_seconds == 0 {
            self.complete();
        }
    }

    fn complete(&mut self) {
        self.cancel_tick();
        self.status = Status::Idle;
        self.completed_runs += 1;
        info!("Timer finished (run #{})", self.completed_runs);
        self.alarm.on_complete();

        if let Some(run) = self.chained_run.take() {
            let handle = self.scheduler.after(GRACE_DELAY);
            self.pending_launch = Some((handle, run));
            info!("Chained run {:?} starts in {:?}", run, GRACE_DELAY);
        }
        self.publish_controls();
    }

    fn launch(&mut self, run: ChainedRun) {
        self.set_duration(run.duration());
        if self.total_seconds == 0 {
            warn!("Chained run {:?} has no duration, not starting", run);
            self.publish_controls();
            return;
        }
        self.begin_run();
        info!("Chained run started for {}", format_clock(self.total_seconds));
    }

    fn begin_run(&mut self) {
        self.arm_tick();
        self.status = Status::Running;
        self.render();
        self.publish_controls();
    }

    fn arm_tick(&mut self) {
        if let Some(previous) = self.tick.take() {
            warn!("Tick {} still registered, cancelling before re-arming", previous);
            self.scheduler.cancel(previous);
        }
        self.tick = Some(self.scheduler.every(TICK_PERIOD));
    }

    fn cancel_tick(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn ensure_idle(&self) -> Result<(), TimerError> {
        match self.status {
            Status::Idle => Ok(()),
            Status::Running | Status::Paused => Err(TimerError::Busy),
        }
    }

    /// A manual selection replaces both a queued and an in-flight chain
    fn supersede_chain(&mut self) {
        if let Some((handle, run)) = self.pending_launch.take() {
            self.scheduler.cancel(handle);
            debug!("Pending chained run {:?} superseded", run);
        }
        if let Some(run) = self.chained_run.take() {
            debug!("Chained run {:?} superseded", run);
        }
    }

    fn set_duration(&mut self, setting: DurationSetting) {
        self.configured = setting;
        self.total_seconds = setting.total_seconds();
        self.remaining_seconds = self.total_seconds;
        self.render();
    }

    fn render(&mut self) {
        self.presenter.render(self.remaining_seconds, self.total_seconds);
    }

    fn publish_controls(&mut self) {
        let controls = self.controls();
        self.presenter.set_controls(controls);
    }
}

impl<P, A> TimerEngine<ManualScheduler, P, A>
where
    P: Presenter,
    A: AlarmNotifier,
{
    /// Move the fake clock forward by `by`, delivering every registration
    /// that comes due in order, including ones registered along the way
    pub fn advance(&mut self, by: Duration) {
        let until = self.scheduler.now() + by;
        while let Some(handle) = self.scheduler.pop_due(until) {
            self.on_fired(handle);
        }
        self.scheduler.set_now(until);
    }
}
