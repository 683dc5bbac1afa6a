//! Headless slide navigator.
//!
//! Reconciles autoplay ticks, button presses and pointer drags into a single
//! current index for carousels such as the hero banner, the yearly journey
//! navigator and the horizontal timeline. Presentation is left to the host:
//! it reads the index and live drag offset, or asks a [`Projector`] for a
//! track position.

pub mod autoplay;
pub mod clock;
pub mod config;
pub mod error;
pub mod gesture;
pub mod navigation;
pub mod projector;
pub mod slides;
pub mod timer;

// Re-export commonly used types
pub use autoplay::AutoplayScheduler;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CarouselConfig;
pub use error::{CarouselError, Result};
pub use gesture::{
    CommitPolicy, GestureOutcome, GestureSample, GestureTracker, PointerEvent, PointerId,
    PointerKind, ThresholdPolicy,
};
pub use navigation::{
    BoundaryMode, CarouselState, Direction, IndexChange, IndexSubscriber, NavigationController,
    NavigationPhase, NavigationRequest, PauseReasons, RejectReason, Transition,
};
pub use projector::{nearest_slide, DisplayPosition, Projector, ScrollFocus, TrackLayout};
pub use slides::{Slide, SlideCollection, SlideId};
pub use timer::{OneShotTimer, RepeatingTimer};
