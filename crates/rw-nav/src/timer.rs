//! Cancelable deadline timers.
//!
//! The engine never spawns threads or callbacks. A timer is a deadline owned
//! by the component that armed it; the host calls `tick(now)` and the owner
//! checks whether its deadline has passed. Re-arming replaces the deadline,
//! so a superseded timer can never fire.

use std::time::{Duration, Instant};

/// One-shot timer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    deadline: Option<Instant>,
}

impl Timer {
    /// Create a disarmed timer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the timer to fire `delay` after `now`, replacing any pending deadline.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarm the timer. Returns true if it was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// True if the timer is pending.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Pending deadline.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Consume the deadline if it has passed. Returns true exactly once per arm.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Shortest cadence a [`SettlePoll`] runs at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Fixed-cadence poll over a bounded window.
///
/// Used to re-measure layout while CSS transitions settle: the poll is due
/// every `interval` until `window` has elapsed since the last restart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlePoll {
    interval: Duration,
    window: Duration,
    next: Option<Instant>,
    until: Option<Instant>,
}

impl SettlePoll {
    /// Create an idle poll.
    ///
    /// The interval is clamped to [`MIN_POLL_INTERVAL`] so the cadence always
    /// advances.
    #[must_use]
    pub fn new(interval: Duration, window: Duration) -> Self {
        Self {
            interval: interval.max(MIN_POLL_INTERVAL),
            window,
            next: None,
            until: None,
        }
    }

    /// Start (or restart) the window at `now`.
    pub fn restart(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
        self.until = Some(now + self.window);
    }

    /// Stop polling.
    pub fn cancel(&mut self) {
        self.next = None;
        self.until = None;
    }

    /// True while the window is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.next.is_some()
    }

    /// Next time a measurement is due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Check whether a measurement is due at `now`.
    ///
    /// Returns true at most once per call and schedules the following poll.
    /// The last poll lands on or after the end of the window, then the poll
    /// goes idle.
    pub fn poll(&mut self, now: Instant) -> bool {
        let (Some(next), Some(until)) = (self.next, self.until) else {
            return false;
        };
        if next > now {
            return false;
        }

        if now >= until {
            self.cancel();
        } else {
            let mut following = next + self.interval;
            while following <= now {
                following += self.interval;
            }
            self.next = Some(following.min(until));
        }
        true
    }
}
