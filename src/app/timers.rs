//! Deferred one-shot actions
//!
//! The only deferred work today is the automatic removal of a winner a few
//! seconds after the wheel stops. Timers are polled by the controller's
//! pump; nothing here runs on its own.

use std::time::Duration;

/// Work a timer performs when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerAction {
    /// Drop this past winner from the entry list
    RemoveWinner(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Timer {
    due: Duration,
    action: TimerAction,
}

/// Pending timers ordered by due time (ties keep insertion order)
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    pending: Vec<Timer>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, action: TimerAction) {
        let position = self.pending.partition_point(|timer| timer.due <= due);
        self.pending.insert(position, Timer { due, action });
    }

    /// Removes and returns every action due at `now`, earliest first
    pub fn take_due(&mut self, now: Duration) -> Vec<TimerAction> {
        let split = self.pending.partition_point(|timer| timer.due <= now);
        self.pending
            .drain(..split)
            .map(|timer| timer.action)
            .collect()
    }

    /// Drops the earliest pending timer carrying `action`
    ///
    /// # Returns
    /// true if a timer was cancelled
    pub fn cancel(&mut self, action: &TimerAction) -> bool {
        match self.pending.iter().position(|timer| &timer.action == action) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|timer| timer.due)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
