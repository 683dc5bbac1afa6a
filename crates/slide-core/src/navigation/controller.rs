//! Navigation controller implementation

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::{debug, info, trace};

use super::{
    BoundaryMode, CarouselState, IndexChange, IndexSubscriber, NavigationPhase,
    NavigationRequest, PauseReasons, RejectReason, Transition,
};
use crate::autoplay::AutoplayScheduler;
use crate::clock::Clock;
use crate::config::CarouselConfig;
use crate::error::Result;
use crate::gesture::{CommitPolicy, GestureOutcome, GestureTracker, PointerEvent, PointerId};
use crate::projector::{DisplayPosition, Projector};
use crate::slides::{Slide, SlideCollection, SlideId};
use crate::timer::OneShotTimer;

/// Single owner of a carousel's position.
///
/// Buttons, dots, pointer gestures and the autoplay timer all end up in
/// [`submit`](Self::submit), which applies one request at a time against
/// the current index. Nothing else writes the index.
pub struct NavigationController<P> {
    slides: SlideCollection<P>,
    config: CarouselConfig,
    index: usize,
    hovering: bool,
    gestures: GestureTracker,
    autoplay: AutoplayScheduler,
    cooldown: OneShotTimer,
    clock: Arc<dyn Clock>,
    subscribers: RwLock<Vec<Weak<dyn IndexSubscriber>>>,
    alive: bool,
}

impl<P> NavigationController<P> {
    /// Mount a carousel. Autoplay starts ticking immediately if enabled.
    pub fn new(
        config: CarouselConfig,
        slides: SlideCollection<P>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let index = clamp_index(config.initial_index, slides.len());
        let mut autoplay = AutoplayScheduler::new(&config);
        autoplay.start(clock.now_ms());

        info!(
            slides = slides.len(),
            index,
            boundary = ?config.boundary(),
            autoplay = autoplay.is_running(),
            "carousel mounted"
        );

        Ok(Self {
            gestures: GestureTracker::new(&config),
            slides,
            config,
            index,
            hovering: false,
            autoplay,
            cooldown: OneShotTimer::new(),
            clock,
            subscribers: RwLock::new(Vec::new()),
            alive: true,
        })
    }

    /// Replace the swipe commit rule
    pub fn with_commit_policy(mut self, policy: Box<dyn CommitPolicy>) -> Self {
        self.gestures = GestureTracker::with_policy(&self.config, policy);
        self
    }

    pub fn config(&self) -> &CarouselConfig {
        &self.config
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &SlideCollection<P> {
        &self.slides
    }

    pub fn current_slide(&self) -> Option<&Slide<P>> {
        self.slides.get(self.index)
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn state(&self) -> CarouselState {
        self.state_at(self.clock.now_ms())
    }

    pub fn pause_reasons(&self) -> PauseReasons {
        self.pause_reasons_at(self.clock.now_ms())
    }

    pub fn phase(&self) -> NavigationPhase {
        if self.gestures.is_active() {
            NavigationPhase::Dragging
        } else if self.cooldown_running(self.clock.now_ms()) {
            NavigationPhase::CooldownAfterManualNav
        } else {
            NavigationPhase::Idle
        }
    }

    /// Current drag displacement, clamped for display
    pub fn live_offset(&self) -> Option<f32> {
        self.gestures.live_offset()
    }

    /// Project the current state through `projector`
    pub fn display(&self, projector: &Projector) -> DisplayPosition {
        projector.project(self.index, self.live_offset())
    }

    /// Earliest clock reading at which [`poll`](Self::poll) has work to do
    pub fn next_wakeup(&self) -> Option<u64> {
        if !self.alive {
            return None;
        }
        match (self.cooldown.deadline(), self.autoplay.next_due()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn next(&mut self) -> Transition {
        self.submit(NavigationRequest::Next)
    }

    pub fn prev(&mut self) -> Transition {
        self.submit(NavigationRequest::Prev)
    }

    /// Jump to `target`, clamped into range
    pub fn go_to(&mut self, target: usize) -> Transition {
        self.submit(NavigationRequest::GoTo { target })
    }

    pub fn go_to_slide(&mut self, id: &SlideId) -> Transition {
        match self.slides.position_of(id) {
            Some(target) => self.go_to(target),
            None => {
                debug!(%id, "go_to_slide: unknown slide");
                Transition::Rejected(RejectReason::UnknownSlide)
            }
        }
    }

    /// Handler for one autoplay tick
    pub fn autoplay_tick(&mut self) -> Transition {
        self.submit(NavigationRequest::AutoAdvance)
    }

    /// Apply one navigation request
    pub fn submit(&mut self, request: NavigationRequest) -> Transition {
        if !self.alive {
            debug!(?request, "request after teardown dropped");
            return Transition::Rejected(RejectReason::Disposed);
        }
        let count = self.slides.len();
        if count == 0 {
            trace!(?request, "no slides, request ignored");
            return Transition::Rejected(RejectReason::Empty);
        }

        let now = self.clock.now_ms();
        self.expire_cooldown(now);

        if request.is_manual() {
            self.cooldown.arm(now, self.config.manual_nav_cooldown_ms);
        } else if !self.autoplay.is_eligible(&self.state_at(now)) {
            trace!(index = self.index, "autoplay tick suppressed");
            return Transition::Rejected(RejectReason::AutoplaySuspended);
        }

        let target = self.resolve(request, count);
        if target == self.index {
            return Transition::Unchanged;
        }

        let from = self.index;
        self.index = target;
        debug!(from, to = target, ?request, "slide changed");
        self.notify(IndexChange {
            from,
            to: target,
            cause: Some(request),
        });
        Transition::Moved { from, to: target }
    }

    /// Advance timers to the clock's current reading.
    ///
    /// Hosts call this from their frame loop or timer callback; it expires
    /// the manual cooldown and turns a due autoplay period into a tick.
    pub fn poll(&mut self) -> Transition {
        if !self.alive {
            return Transition::Rejected(RejectReason::Disposed);
        }
        let now = self.clock.now_ms();
        self.expire_cooldown(now);

        if self.autoplay.poll(now) {
            self.autoplay_tick()
        } else {
            Transition::Unchanged
        }
    }

    /// Start a drag. Returns false if the event was ignored.
    pub fn pointer_down(&mut self, event: &PointerEvent) -> bool {
        if !self.alive || self.slides.is_empty() {
            return false;
        }
        let accepted = self.gestures.begin(event, self.clock.now_ms());
        if accepted {
            debug!(pointer = ?event.pointer, x = event.x, "drag started");
        }
        accepted
    }

    /// Track a drag; returns the live offset for the projector
    pub fn pointer_move(&mut self, event: &PointerEvent) -> Option<f32> {
        if !self.alive {
            return None;
        }
        self.gestures.update(event, self.clock.now_ms())
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Transition {
        if !self.alive {
            return Transition::Rejected(RejectReason::Disposed);
        }
        match self.gestures.finish(event, self.clock.now_ms()) {
            Some(outcome) => self.resolve_gesture(outcome),
            None => Transition::Rejected(RejectReason::NoGesture),
        }
    }

    /// Interrupted gesture: never navigates
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Transition {
        if !self.alive {
            return Transition::Rejected(RejectReason::Disposed);
        }
        match self.gestures.cancel(pointer) {
            Some(outcome) => self.resolve_gesture(outcome),
            None => Transition::Rejected(RejectReason::NoGesture),
        }
    }

    pub fn hover_enter(&mut self) {
        if self.alive {
            self.hovering = true;
        }
    }

    pub fn hover_exit(&mut self) {
        self.hovering = false;
    }

    /// Swap in a new slide list, keeping the index in range
    pub fn replace_slides(&mut self, slides: SlideCollection<P>) -> Transition {
        if !self.alive {
            return Transition::Rejected(RejectReason::Disposed);
        }

        let from = self.index;
        self.slides = slides;
        self.index = clamp_index(from, self.slides.len());
        if self.slides.is_empty() {
            self.gestures.abort();
        }
        info!(slides = self.slides.len(), index = self.index, "slides replaced");

        if self.index == from {
            return Transition::Unchanged;
        }
        self.notify(IndexChange {
            from,
            to: self.index,
            cause: None,
        });
        Transition::Moved {
            from,
            to: self.index,
        }
    }

    /// Register a subscriber. Held weakly: the caller keeps it alive.
    pub fn add_subscriber(&self, subscriber: Arc<dyn IndexSubscriber>) {
        self.subscribers.write().push(Arc::downgrade(&subscriber));
    }

    /// Unmount: stop timers, drop any gesture and all subscribers.
    /// Every later call is a no-op.
    pub fn teardown(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.autoplay.stop();
        self.cooldown.cancel();
        self.gestures.abort();
        self.hovering = false;
        self.subscribers.write().clear();
        info!(index = self.index, "carousel torn down");
    }

    fn resolve_gesture(&mut self, outcome: GestureOutcome) -> Transition {
        match outcome {
            GestureOutcome::Commit { direction, sample } if self.slides.len() > 1 => {
                debug!(
                    dx = sample.displacement(),
                    velocity = sample.velocity(),
                    ?direction,
                    "drag committed"
                );
                self.submit(NavigationRequest::DragCommit { direction })
            }
            GestureOutcome::Commit { sample, .. } | GestureOutcome::Cancelled { sample } => {
                trace!(dx = sample.displacement(), "drag released without commit");
                Transition::Unchanged
            }
        }
    }

    fn resolve(&self, request: NavigationRequest, count: usize) -> usize {
        let last = count - 1;
        match request {
            NavigationRequest::Next => self.step(1, count),
            NavigationRequest::Prev => self.step(-1, count),
            NavigationRequest::DragCommit { direction } => self.step(direction.step(), count),
            NavigationRequest::GoTo { target } => target.min(last),
            NavigationRequest::AutoAdvance => {
                if self.index == last && self.config.rewind_at_end {
                    0
                } else {
                    self.step(1, count)
                }
            }
        }
    }

    fn step(&self, delta: isize, count: usize) -> usize {
        let count = count as isize;
        let target = self.index as isize + delta;
        match self.config.boundary() {
            BoundaryMode::Wrap => target.rem_euclid(count) as usize,
            BoundaryMode::Bounded => target.clamp(0, count - 1) as usize,
        }
    }

    fn expire_cooldown(&mut self, now: u64) {
        if self.cooldown.take_expired(now) {
            trace!(now, "cooldown elapsed, autoplay re-armed");
        }
    }

    fn cooldown_running(&self, now: u64) -> bool {
        self.cooldown.deadline().is_some_and(|deadline| now < deadline)
    }

    fn pause_reasons_at(&self, now: u64) -> PauseReasons {
        PauseReasons {
            cooldown: self.cooldown_running(now),
            hover: self.hovering,
            gesture: self.gestures.is_active(),
        }
    }

    fn state_at(&self, now: u64) -> CarouselState {
        CarouselState {
            index: self.index,
            slide_count: self.slides.len(),
            is_dragging: self.gestures.is_active(),
            is_paused: self.pause_reasons_at(now).any(),
        }
    }

    fn notify(&self, change: IndexChange) {
        let live: Vec<Arc<dyn IndexSubscriber>> = {
            let mut subscribers = self.subscribers.write();
            subscribers.retain(|weak| weak.strong_count() > 0);
            subscribers.iter().filter_map(Weak::upgrade).collect()
        };

        for subscriber in live {
            subscriber.on_index_change(&change);
        }
    }
}

fn clamp_index(index: usize, count: usize) -> usize {
    index.min(count.saturating_sub(1))
}
