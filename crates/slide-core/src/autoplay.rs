//! Autoplay scheduling.
//!
//! The scheduler keeps ticking on its period regardless of pause state; a
//! tick only turns into a navigation request when the carousel is eligible.
//! That way resuming never needs to resynchronise the timer.

use tracing::trace;

use crate::config::CarouselConfig;
use crate::navigation::CarouselState;
use crate::timer::RepeatingTimer;

#[derive(Debug, Clone)]
pub struct AutoplayScheduler {
    enabled: bool,
    timer: RepeatingTimer,
}

impl AutoplayScheduler {
    pub fn new(config: &CarouselConfig) -> Self {
        Self {
            enabled: config.autoplay,
            timer: RepeatingTimer::new(config.autoplay_interval_ms),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn period_ms(&self) -> u64 {
        self.timer.period_ms()
    }

    /// Start ticking from `now`. No-op when autoplay is disabled.
    pub fn start(&mut self, now: u64) {
        if self.enabled {
            self.timer.start(now);
        }
    }

    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn next_due(&self) -> Option<u64> {
        self.timer.next_due()
    }

    /// True when a tick is due at `now`
    pub fn poll(&mut self, now: u64) -> bool {
        let due = self.timer.poll(now);
        if due {
            trace!(now, "autoplay tick");
        }
        due
    }

    /// Whether a tick should advance the given state
    pub fn is_eligible(&self, state: &CarouselState) -> bool {
        self.enabled && !state.is_paused && !state.is_dragging && state.slide_count > 1
    }
}
