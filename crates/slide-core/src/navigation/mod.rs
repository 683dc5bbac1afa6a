use serde::{Deserialize, Serialize};

mod controller;
mod state;
mod subscriber;

pub use controller::NavigationController;
pub use state::{CarouselState, NavigationPhase, PauseReasons};
pub use subscriber::IndexSubscriber;

/// What happens at either end of the slide list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    /// Past the last slide comes the first, and the other way round
    Wrap,
    /// Clamp at the first and last slide
    Bounded,
}

/// Step direction for relative navigation, `-1` or `1` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Direction {
    Prev,
    Next,
}

impl Direction {
    /// Direction opposite to a pointer displacement: dragging content left
    /// reveals the next slide. `None` for zero displacement.
    pub fn against(displacement: f32) -> Option<Self> {
        if displacement < 0.0 {
            Some(Direction::Next)
        } else if displacement > 0.0 {
            Some(Direction::Prev)
        } else {
            None
        }
    }

    pub fn step(self) -> isize {
        match self {
            Direction::Prev => -1,
            Direction::Next => 1,
        }
    }
}

impl From<Direction> for i8 {
    fn from(direction: Direction) -> Self {
        direction.step() as i8
    }
}

impl TryFrom<i8> for Direction {
    type Error = String;

    fn try_from(step: i8) -> Result<Self, Self::Error> {
        match step {
            -1 => Ok(Direction::Prev),
            1 => Ok(Direction::Next),
            other => Err(format!("direction must be -1 or 1, got {}", other)),
        }
    }
}

/// A single request to move the current index.
///
/// Every source (buttons, dots, gestures, the autoplay timer) expresses its
/// intent as one of these and hands it to
/// [`NavigationController::submit`], which applies requests one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationRequest {
    Next,
    Prev,
    GoTo { target: usize },
    DragCommit { direction: Direction },
    /// Issued by the autoplay scheduler; does not start a cooldown
    AutoAdvance,
}

impl NavigationRequest {
    /// Manual requests pause autoplay for the cooldown period
    pub fn is_manual(&self) -> bool {
        !matches!(self, NavigationRequest::AutoAdvance)
    }
}

/// Why a request was dropped without effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No slides to navigate
    Empty,
    /// The carousel has been torn down
    Disposed,
    /// Autoplay tick while paused, dragging or with fewer than two slides
    AutoplaySuspended,
    /// Pointer event for a gesture that is not being tracked
    NoGesture,
    /// `go_to_slide` with an id not in the collection
    UnknownSlide,
}

/// Result of applying a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: usize, to: usize },
    Unchanged,
    Rejected(RejectReason),
}

impl Transition {
    pub fn moved(&self) -> bool {
        matches!(self, Transition::Moved { .. })
    }
}

/// Payload of an index-changed notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexChange {
    pub from: usize,
    pub to: usize,
    /// `None` when the index moved because the slide list shrank
    pub cause: Option<NavigationRequest>,
}
