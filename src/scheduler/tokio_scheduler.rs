//! Real-time scheduler backed by tokio timers

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{interval_at, sleep_until, Instant, MissedTickBehavior},
};
use tracing::{debug, trace};

use super::{ScheduleHandle, Scheduler};

/// Spawns one tokio task per registration. Fired handles are delivered on
/// the channel returned by [`TokioScheduler::new`]; the owner of the engine
/// feeds them back into it.
#[derive(Debug)]
pub struct TokioScheduler {
    next_id: u64,
    tasks: HashMap<ScheduleHandle, JoinHandle<()>>,
    fired_tx: mpsc::UnboundedSender<ScheduleHandle>,
}

impl TokioScheduler {
    /// Must be called from within a tokio runtime
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ScheduleHandle>) {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            tasks: HashMap::new(),
            fired_tx,
        };
        (scheduler, fired_rx)
    }

    /// Number of registrations whose task is still alive
    pub fn active(&self) -> usize {
        self.tasks.values().filter(|t| !t.is_finished()).count()
    }

    fn next_handle(&mut self) -> ScheduleHandle {
        // Finished one-shot tasks are dropped lazily here
        self.tasks.retain(|_, task| !task.is_finished());
        self.next_id += 1;
        ScheduleHandle::new(self.next_id)
    }
}

impl Scheduler for TokioScheduler {
    fn every(&mut self, period: Duration) -> ScheduleHandle {
        let handle = self.next_handle();
        let tx = self.fired_tx.clone();
        let first = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                trace!("Schedule {} fired", handle);
                if tx.send(handle).is_err() {
                    break;
                }
            }
        });

        debug!("Registered repeating schedule {} every {:?}", handle, period);
        self.tasks.insert(handle, task);
        handle
    }

    fn after(&mut self, delay: Duration) -> ScheduleHandle {
        let handle = self.next_handle();
        let tx = self.fired_tx.clone();
        let deadline = Instant::now() + delay;

        let task = tokio::spawn(async move {
            sleep_until(deadline).await;
            trace!("Schedule {} fired", handle);
            let _ = tx.send(handle);
        });

        debug!("Registered one-shot schedule {} after {:?}", handle, delay);
        self.tasks.insert(handle, task);
        handle
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        if let Some(task) = self.tasks.remove(&handle) {
            task.abort();
            debug!("Cancelled schedule {}", handle);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    #[tokio::test(start_paused = true)]
    async fn every_waits_a_full_period_before_first_fire() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let h = sched.every(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));

        assert_eq!(rx.recv().await, Some(h));
        assert_eq!(rx.recv().await, Some(h));
    }

    #[tokio::test(start_paused = true)]
    async fn after_fires_once() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let h = sched.after(Duration::from_secs(1));

        assert_eq!(rx.recv().await, Some(h));
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_delivery() {
        let (mut sched, mut rx) = TokioScheduler::new();
        let tick = sched.every(Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(tick));

        sched.cancel(tick);
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(sched.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn handles_are_unique() {
        let (mut sched, _rx) = TokioScheduler::new();
        let a = sched.after(Duration::from_secs(1));
        sched.cancel(a);
        let b = sched.after(Duration::from_secs(1));
        assert_ne!(a, b);
    }
}
