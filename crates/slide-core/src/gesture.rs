//! Pointer gesture tracking.
//!
//! Turns a pointer-down → move → up sequence into a single commit or cancel
//! decision. Only the first pointer to go down is tracked; any other pointer
//! is ignored until that gesture resolves.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::CarouselConfig;
use crate::navigation::Direction;

/// Host-assigned pointer identifier (pointerId, touch identifier, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// Raw pointer input as delivered by the host surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pointer: PointerId,
    pub kind: PointerKind,
    /// Mouse button index, 0 is primary. Ignored for touch and pen.
    #[serde(default)]
    pub button: u8,
    pub x: f32,
}

impl PointerEvent {
    pub fn touch(pointer: u64, x: f32) -> Self {
        Self {
            pointer: PointerId(pointer),
            kind: PointerKind::Touch,
            button: 0,
            x,
        }
    }

    pub fn mouse(button: u8, x: f32) -> Self {
        Self {
            pointer: PointerId(0),
            kind: PointerKind::Mouse,
            button,
            x,
        }
    }

    fn is_secondary_button(&self) -> bool {
        self.kind == PointerKind::Mouse && self.button != 0
    }
}

/// Position and timing of an in-flight gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub start_x: f32,
    pub current_x: f32,
    pub start_time_ms: u64,
    pub last_time_ms: u64,
}

impl GestureSample {
    fn begin(x: f32, now: u64) -> Self {
        Self {
            start_x: x,
            current_x: x,
            start_time_ms: now,
            last_time_ms: now,
        }
    }

    fn record(&mut self, x: f32, now: u64) {
        self.current_x = x;
        self.last_time_ms = now.max(self.start_time_ms);
    }

    pub fn displacement(&self) -> f32 {
        self.current_x - self.start_x
    }

    /// Average velocity in px/ms. Zero when no time has elapsed.
    pub fn velocity(&self) -> f32 {
        let elapsed = self.last_time_ms.saturating_sub(self.start_time_ms);
        if elapsed == 0 {
            0.0
        } else {
            self.displacement() / elapsed as f32
        }
    }
}

/// Decides whether a finished gesture navigates
pub trait CommitPolicy: Send + Sync + fmt::Debug {
    /// `Some(direction)` to navigate, `None` to snap back
    fn decide(&self, sample: &GestureSample) -> Option<Direction>;
}

/// Commits on an absolute displacement threshold, or on a fast flick whose
/// velocity × displacement exceeds `flick_product`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdPolicy {
    pub threshold_px: f32,
    pub flick_product: Option<f32>,
}

impl ThresholdPolicy {
    pub fn from_config(config: &CarouselConfig) -> Self {
        Self {
            threshold_px: config.drag_commit_threshold_px,
            flick_product: config.flick_commit_product,
        }
    }
}

impl CommitPolicy for ThresholdPolicy {
    fn decide(&self, sample: &GestureSample) -> Option<Direction> {
        let dx = sample.displacement();
        let far_enough = dx.abs() >= self.threshold_px;
        let flicked = self
            .flick_product
            .is_some_and(|limit| (sample.velocity() * dx).abs() > limit);

        if far_enough || flicked {
            Direction::against(dx)
        } else {
            None
        }
    }
}

/// How a gesture ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Commit {
        direction: Direction,
        sample: GestureSample,
    },
    Cancelled {
        sample: GestureSample,
    },
}

#[derive(Debug, Clone, Copy)]
struct ActiveGesture {
    pointer: PointerId,
    sample: GestureSample,
}

/// Tracks at most one pointer gesture at a time
#[derive(Debug)]
pub struct GestureTracker {
    active: Option<ActiveGesture>,
    policy: Box<dyn CommitPolicy>,
    clamp_px: Option<f32>,
    primary_only: bool,
}

impl GestureTracker {
    pub fn new(config: &CarouselConfig) -> Self {
        Self::with_policy(config, Box::new(ThresholdPolicy::from_config(config)))
    }

    pub fn with_policy(config: &CarouselConfig, policy: Box<dyn CommitPolicy>) -> Self {
        Self {
            active: None,
            policy,
            clamp_px: config.drag_clamp_px,
            primary_only: config.primary_button_only,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn sample(&self) -> Option<&GestureSample> {
        self.active.as_ref().map(|g| &g.sample)
    }

    /// Displacement for the projector, clamped when configured
    pub fn live_offset(&self) -> Option<f32> {
        let dx = self.sample()?.displacement();
        Some(match self.clamp_px {
            Some(limit) => dx.clamp(-limit, limit),
            None => dx,
        })
    }

    /// Start tracking. Returns false when the event is ignored.
    pub fn begin(&mut self, event: &PointerEvent, now: u64) -> bool {
        if let Some(active) = &self.active {
            trace!(
                "ignoring pointer {:?}, gesture owned by {:?}",
                event.pointer,
                active.pointer
            );
            return false;
        }
        if self.primary_only && event.is_secondary_button() {
            trace!("ignoring non-primary mouse button {}", event.button);
            return false;
        }

        self.active = Some(ActiveGesture {
            pointer: event.pointer,
            sample: GestureSample::begin(event.x, now),
        });
        true
    }

    /// Record a move. Returns the new live offset if the pointer owns the gesture.
    pub fn update(&mut self, event: &PointerEvent, now: u64) -> Option<f32> {
        let active = self.active.as_mut().filter(|g| g.pointer == event.pointer)?;
        active.sample.record(event.x, now);
        trace!(dx = active.sample.displacement(), "gesture move");
        self.live_offset()
    }

    /// Resolve the gesture on pointer-up
    pub fn finish(&mut self, event: &PointerEvent, now: u64) -> Option<GestureOutcome> {
        let mut active = self.take_owned(event.pointer)?;
        active.sample.record(event.x, now);

        let sample = active.sample;
        Some(match self.policy.decide(&sample) {
            Some(direction) => GestureOutcome::Commit { direction, sample },
            None => GestureOutcome::Cancelled { sample },
        })
    }

    /// Resolve the gesture without committing, whatever the displacement
    pub fn cancel(&mut self, pointer: PointerId) -> Option<GestureOutcome> {
        let active = self.take_owned(pointer)?;
        Some(GestureOutcome::Cancelled {
            sample: active.sample,
        })
    }

    /// Drop any in-flight gesture without an outcome
    pub fn abort(&mut self) {
        self.active = None;
    }

    fn take_owned(&mut self, pointer: PointerId) -> Option<ActiveGesture> {
        if self.active.as_ref()?.pointer != pointer {
            return None;
        }
        self.active.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> GestureTracker {
        GestureTracker::new(&CarouselConfig::default())
    }

    #[test]
    fn test_drag_past_threshold_commits_next() {
        let mut gestures = tracker();
        assert!(gestures.begin(&PointerEvent::touch(1, 300.0), 0));
        gestures.update(&PointerEvent::touch(1, 270.0), 200);

        let outcome = gestures.finish(&PointerEvent::touch(1, 240.0), 400).unwrap();
        match outcome {
            GestureOutcome::Commit { direction, sample } => {
                assert_eq!(direction, Direction::Next);
                assert_eq!(sample.displacement(), -60.0);
            }
            other => panic!("expected commit, got {:?}", other),
        }
        assert!(!gestures.is_active());
    }

    #[test]
    fn test_short_slow_drag_cancels() {
        let mut gestures = tracker();
        gestures.begin(&PointerEvent::touch(1, 100.0), 0);
        let outcome = gestures.finish(&PointerEvent::touch(1, 120.0), 500).unwrap();
        assert!(matches!(outcome, GestureOutcome::Cancelled { .. }));
    }

    #[test]
    fn test_fast_flick_commits_below_threshold() {
        let config = CarouselConfig {
            flick_commit_product: Some(40.0),
            ..CarouselConfig::default()
        };
        let mut gestures = GestureTracker::new(&config);
        gestures.begin(&PointerEvent::touch(1, 100.0), 0);
        // 40px in 20ms: 2 px/ms * 40px = 80 > 40
        let outcome = gestures.finish(&PointerEvent::touch(1, 140.0), 20).unwrap();
        assert!(matches!(
            outcome,
            GestureOutcome::Commit {
                direction: Direction::Prev,
                ..
            }
        ));
    }

    #[test]
    fn test_flick_disabled_by_default() {
        let mut gestures = tracker();
        gestures.begin(&PointerEvent::touch(1, 100.0), 0);
        let outcome = gestures.finish(&PointerEvent::touch(1, 140.0), 20).unwrap();
        assert!(matches!(outcome, GestureOutcome::Cancelled { .. }));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let policy = ThresholdPolicy::from_config(&CarouselConfig::default());

        let mut sample = GestureSample::begin(400.0, 0);
        sample.record(352.0, 400);
        assert_eq!(sample.displacement(), -48.0);
        assert_eq!(policy.decide(&sample), Some(Direction::Next));

        sample.record(352.5, 400);
        assert_eq!(policy.decide(&sample), None);
    }

    #[test]
    fn test_second_pointer_ignored() {
        let mut gestures = tracker();
        assert!(gestures.begin(&PointerEvent::touch(1, 100.0), 0));
        assert!(!gestures.begin(&PointerEvent::touch(2, 500.0), 10));

        assert_eq!(gestures.update(&PointerEvent::touch(2, 0.0), 20), None);
        assert!(gestures.finish(&PointerEvent::touch(2, 0.0), 30).is_none());
        assert!(gestures.is_active());
        assert_eq!(gestures.sample().unwrap().start_x, 100.0);
    }

    #[test]
    fn test_cancel_never_commits() {
        let mut gestures = tracker();
        gestures.begin(&PointerEvent::touch(7, 400.0), 0);
        gestures.update(&PointerEvent::touch(7, 100.0), 50);

        let outcome = gestures.cancel(PointerId(7)).unwrap();
        assert!(matches!(outcome, GestureOutcome::Cancelled { .. }));
        assert!(gestures.cancel(PointerId(7)).is_none());
    }

    #[test]
    fn test_secondary_mouse_button_ignored() {
        let mut gestures = tracker();
        assert!(!gestures.begin(&PointerEvent::mouse(2, 10.0), 0));
        assert!(gestures.begin(&PointerEvent::mouse(0, 10.0), 0));
    }

    #[test]
    fn test_live_offset_clamped() {
        let mut gestures = GestureTracker::new(&CarouselConfig::timeline());
        gestures.begin(&PointerEvent::touch(1, 500.0), 0);
        assert_eq!(gestures.update(&PointerEvent::touch(1, 100.0), 100), Some(-220.0));
        assert_eq!(gestures.update(&PointerEvent::touch(1, 550.0), 200), Some(50.0));
    }

    #[test]
    fn test_velocity_with_zero_elapsed() {
        let sample = GestureSample::begin(10.0, 100);
        assert_eq!(sample.velocity(), 0.0);
    }
}
