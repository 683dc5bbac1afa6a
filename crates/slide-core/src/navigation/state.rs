use serde::{Deserialize, Serialize};

/// Snapshot of a carousel, handed to readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarouselState {
    pub index: usize,
    pub slide_count: usize,
    pub is_dragging: bool,
    pub is_paused: bool,
}

/// Independent reasons autoplay is held back. Paused while any is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PauseReasons {
    /// Manual navigation happened less than a cooldown ago
    pub cooldown: bool,
    /// Pointer is hovering the carousel
    pub hover: bool,
    /// A drag gesture is in progress
    pub gesture: bool,
}

impl PauseReasons {
    pub fn any(&self) -> bool {
        self.cooldown || self.hover || self.gesture
    }
}

/// Coarse controller state, for observers and debugging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationPhase {
    Idle,
    Dragging,
    CooldownAfterManualNav,
}
