//! Cancellable timers polled against a [`Clock`](crate::Clock) reading.
//!
//! Neither timer owns a thread or a callback. The owner polls them with the
//! current time, so cancelling is just clearing a deadline and nothing can
//! fire after the owner is gone.

/// A single deadline. Re-arming replaces the previous deadline.
#[derive(Debug, Clone, Default)]
pub struct OneShotTimer {
    deadline: Option<u64>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm (or re-arm) to expire `duration_ms` after `now`
    pub fn arm(&mut self, now: u64, duration_ms: u64) {
        self.deadline = Some(now.saturating_add(duration_ms));
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline
    }

    /// Time left before expiry, if armed
    pub fn remaining(&self, now: u64) -> Option<u64> {
        self.deadline.map(|d| d.saturating_sub(now))
    }

    /// Returns true exactly once when the deadline has passed, disarming the timer
    pub fn take_expired(&mut self, now: u64) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Fixed-period timer.
///
/// Missed periods collapse into a single tick and the schedule stays
/// anchored to the original start, so a late poll never produces a burst.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period_ms: u64,
    next_due: Option<u64>,
}

impl RepeatingTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due: None,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn start(&mut self, now: u64) {
        self.next_due = Some(now.saturating_add(self.period_ms));
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.next_due
    }

    /// Returns true if at least one period elapsed since the last tick
    pub fn poll(&mut self, now: u64) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }

        let missed = (now - due) / self.period_ms + 1;
        self.next_due = Some(due + missed * self.period_ms);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_rearm_supersedes() {
        let mut timer = OneShotTimer::new();
        timer.arm(0, 1500);
        timer.arm(1000, 1500);

        assert!(!timer.take_expired(1500));
        assert_eq!(timer.remaining(1500), Some(1000));
        assert!(timer.take_expired(2500));
        assert!(!timer.take_expired(3000));
        assert!(!timer.is_armed());
    }

    #[test]
    fn test_one_shot_cancel() {
        let mut timer = OneShotTimer::new();
        timer.arm(0, 10);
        timer.cancel();
        assert!(!timer.take_expired(100));
    }

    #[test]
    fn test_repeating_collapses_missed_ticks() {
        let mut timer = RepeatingTimer::new(5000);
        timer.start(0);

        assert!(!timer.poll(4999));
        assert!(timer.poll(5000));
        assert!(!timer.poll(5001));

        // Three periods late: one tick, next due stays on the 5s grid
        assert!(timer.poll(21_000));
        assert_eq!(timer.next_due(), Some(25_000));
        assert!(!timer.poll(24_999));
    }

    #[test]
    fn test_repeating_stopped_never_fires() {
        let mut timer = RepeatingTimer::new(100);
        assert!(!timer.poll(1_000));
        timer.start(0);
        timer.stop();
        assert!(!timer.poll(1_000));
    }
}
