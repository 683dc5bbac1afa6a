//! Replay scripts: timed input events run against a manual clock

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use slide_core::{
    CarouselConfig, CarouselState, Clock, IndexChange, IndexSubscriber, ManualClock,
    NavigationController, NavigationRequest, PointerEvent, PointerId, PointerKind, Slide,
    SlideCollection, Transition,
};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Hero,
    Journey,
    Timeline,
}

impl Preset {
    fn config(self) -> CarouselConfig {
        match self {
            Preset::Hero => CarouselConfig::hero_banner(),
            Preset::Journey => CarouselConfig::journey(),
            Preset::Timeline => CarouselConfig::timeline(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub preset: Preset,
    /// Replaces the preset entirely when present
    pub config: Option<CarouselConfig>,
    pub slides: usize,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Time to let pass before the event, e.g. "150ms" or "5s"
    pub wait: Option<String>,
    pub event: ScriptEvent,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScriptEvent {
    Next,
    Prev,
    GoTo {
        target: usize,
    },
    PointerDown {
        pointer: u64,
        x: f32,
        #[serde(default = "default_kind")]
        kind: PointerKind,
        #[serde(default)]
        button: u8,
    },
    PointerMove {
        pointer: u64,
        x: f32,
    },
    PointerUp {
        pointer: u64,
        x: f32,
    },
    PointerCancel {
        pointer: u64,
    },
    HoverEnter,
    HoverExit,
    /// Only lets timers run
    Poll,
}

fn default_kind() -> PointerKind {
    PointerKind::Touch
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeRecord {
    pub at_ms: u64,
    pub from: usize,
    pub to: usize,
    pub cause: Option<NavigationRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub changes: Vec<ChangeRecord>,
    pub final_state: CarouselState,
    pub elapsed_ms: u64,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("failed to parse replay script")
    }

    pub fn run(&self) -> Result<ReplayReport> {
        let config = match &self.config {
            Some(config) => config.clone(),
            None => self.preset.config(),
        };
        let slides = SlideCollection::new(
            (0..self.slides)
                .map(|i| Slide::new(i as u64, ()))
                .collect(),
        )?;

        let clock = ManualClock::new();
        let mut nav = NavigationController::new(config, slides, Arc::new(clock.clone()))?;

        let changes = Arc::new(Mutex::new(Vec::new()));
        let recorder: Arc<dyn IndexSubscriber> = {
            let changes = changes.clone();
            let clock = clock.clone();
            Arc::new(move |change: &IndexChange| {
                info!(
                    at_ms = clock.now_ms(),
                    from = change.from,
                    to = change.to,
                    cause = ?change.cause,
                    "index changed"
                );
                changes.lock().push(ChangeRecord {
                    at_ms: clock.now_ms(),
                    from: change.from,
                    to: change.to,
                    cause: change.cause,
                });
            })
        };
        nav.add_subscriber(recorder.clone());

        for (number, step) in self.steps.iter().enumerate() {
            if let Some(wait) = &step.wait {
                let wait = humantime::parse_duration(wait)
                    .with_context(|| format!("step {}: invalid wait '{}'", number, wait))?;
                advance(&mut nav, &clock, wait);
            }
            let transition = apply(&mut nav, &step.event);
            debug!(step = number, event = ?step.event, ?transition, "step applied");
        }

        let final_state = nav.state();
        let elapsed_ms = clock.now_ms();
        nav.teardown();

        let changes = changes.lock().clone();
        Ok(ReplayReport {
            changes,
            final_state,
            elapsed_ms,
        })
    }
}

/// Move the clock forward, stopping at every timer deadline on the way
fn advance<P>(nav: &mut NavigationController<P>, clock: &ManualClock, by: Duration) {
    let target = clock.now_ms() + by.as_millis() as u64;
    while let Some(wakeup) = nav.next_wakeup().filter(|&at| at <= target) {
        clock.set(wakeup);
        nav.poll();
    }
    clock.set(target);
}

fn apply<P>(nav: &mut NavigationController<P>, event: &ScriptEvent) -> Transition {
    match *event {
        ScriptEvent::Next => nav.next(),
        ScriptEvent::Prev => nav.prev(),
        ScriptEvent::GoTo { target } => nav.go_to(target),
        ScriptEvent::PointerDown {
            pointer,
            x,
            kind,
            button,
        } => {
            let event = PointerEvent {
                pointer: PointerId(pointer),
                kind,
                button,
                x,
            };
            nav.pointer_down(&event);
            Transition::Unchanged
        }
        ScriptEvent::PointerMove { pointer, x } => {
            nav.pointer_move(&PointerEvent::touch(pointer, x));
            Transition::Unchanged
        }
        ScriptEvent::PointerUp { pointer, x } => nav.pointer_up(&PointerEvent::touch(pointer, x)),
        ScriptEvent::PointerCancel { pointer } => nav.pointer_cancel(PointerId(pointer)),
        ScriptEvent::HoverEnter => {
            nav.hover_enter();
            Transition::Unchanged
        }
        ScriptEvent::HoverExit => {
            nav.hover_exit();
            Transition::Unchanged
        }
        ScriptEvent::Poll => nav.poll(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_core::Direction;

    #[test]
    fn test_bundled_hero_script() {
        let script = Script::from_json(include_str!("../scripts/hero_swipe.json")).unwrap();
        let report = script.run().unwrap();

        let indices: Vec<_> = report.changes.iter().map(|c| c.to).collect();
        assert_eq!(indices, vec![1, 2, 0, 1]);
        assert_eq!(report.changes[0].at_ms, 5_000);
        let swipe = NavigationRequest::DragCommit {
            direction: Direction::Next,
        };
        assert_eq!(report.changes[1].cause, Some(swipe));
        assert_eq!(report.changes[3].at_ms, 20_000);
        assert_eq!(report.final_state.index, 1);
        assert_eq!(report.elapsed_ms, 23_300);
    }

    #[test]
    fn test_timeline_preset_bounded() {
        let script = Script::from_json(
            r#"{
                "preset": "timeline",
                "slides": 3,
                "steps": [
                    { "event": { "type": "prev" } },
                    { "event": { "type": "pointerDown", "pointer": 3, "x": 400 } },
                    { "wait": "300ms", "event": { "type": "pointerUp", "pointer": 3, "x": 340 } },
                    { "event": { "type": "goTo", "target": 9 } },
                    { "wait": "30s", "event": { "type": "next" } }
                ]
            }"#,
        )
        .unwrap();
        let report = script.run().unwrap();

        // 60px is under the timeline's 70px threshold
        let indices: Vec<_> = report.changes.iter().map(|c| c.to).collect();
        assert_eq!(indices, vec![2]);
        assert_eq!(report.final_state.index, 2);
    }

    #[test]
    fn test_bad_wait_reported() {
        let script = Script::from_json(
            r#"{ "slides": 2, "steps": [ { "wait": "soon", "event": { "type": "poll" } } ] }"#,
        )
        .unwrap();
        let err = script.run().unwrap_err();
        assert!(err.to_string().contains("step 0"));
    }
}
