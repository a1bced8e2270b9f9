use std::time::{Duration, Instant};

/// Fixed-interval deadline timer driven from the UI thread.
///
/// Nothing runs in the background. The owner passes `now` into [`PollTimer::fire`] on every
/// tick and gets `true` at most once per elapsed interval.
#[derive(Debug, Clone)]
pub struct PollTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        PollTimer {
            interval,
            next_due: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// (Re)arms the timer. A running timer restarts from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Time left until the next firing, if the timer is armed.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                // Missed intervals collapse into a single firing.
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }
}
