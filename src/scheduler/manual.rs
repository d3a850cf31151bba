//! Deterministic scheduler driven by a virtual clock

use std::time::Duration;

use super::{ScheduleHandle, Scheduler};

#[derive(Debug, Clone)]
struct Entry {
    handle: ScheduleHandle,
    due_ms: u64,
    period_ms: Option<u64>,
}

/// Fake clock for tests. Nothing fires until the caller pulls due handles
/// with [`ManualScheduler::pop_due`].
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction
    pub fn now(&self) -> Duration {
        Duration::from_millis(self.now_ms)
    }

    /// Number of live registrations
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Number of live repeating registrations
    pub fn repeating(&self) -> usize {
        self.entries.iter().filter(|e| e.period_ms.is_some()).count()
    }

    pub fn is_registered(&self, handle: ScheduleHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Pop the earliest registration due at or before `until`, moving the
    /// clock to its due time. Repeating entries are re-armed one period later.
    /// Ties fire in registration order.
    pub fn pop_due(&mut self, until: Duration) -> Option<ScheduleHandle> {
        let until_ms = until.as_millis() as u64;
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle))
            .map(|(i, _)| i)?;

        let Entry {
            handle,
            due_ms,
            period_ms,
        } = self.entries[index].clone();
        self.now_ms = self.now_ms.max(due_ms);
        match period_ms {
            Some(period) => self.entries[index].due_ms = due_ms + period,
            None => {
                self.entries.remove(index);
            }
        }
        Some(handle)
    }

    /// Move the clock forward without firing anything
    pub fn set_now(&mut self, now: Duration) {
        self.now_ms = self.now_ms.max(now.as_millis() as u64);
    }

    fn register(&mut self, delay: Duration, period_ms: Option<u64>) -> ScheduleHandle {
        self.next_id += 1;
        let handle = ScheduleHandle::new(self.next_id);
        self.entries.push(Entry {
            handle,
            due_ms: self.now_ms + delay.as_millis() as u64,
            period_ms,
        });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn every(&mut self, period: Duration) -> ScheduleHandle {
        self.register(period, Some(period.as_millis() as u64))
    }

    fn after(&mut self, delay: Duration) -> ScheduleHandle {
        self.register(delay, None)
    }

    fn cancel(&mut self, handle: ScheduleHandle) {
        self.entries.retain(|e| e.handle != handle);
    }
}
