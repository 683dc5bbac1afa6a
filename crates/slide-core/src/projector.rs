//! Maps navigator state to a track position for the presentation layer.
//!
//! Everything here is pure: the same index and drag offset always give the
//! same [`DisplayPosition`].

use serde::{Deserialize, Serialize};

/// Largest tilt applied while dragging
pub const MAX_TILT_DEG: f32 = 18.0;

/// Drag distance that produces the full tilt
const TILT_SPAN_PX: f32 = 260.0;

/// Geometry of the slide track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    /// Distance between consecutive slide origins
    pub step_px: f32,
    /// Offset of slide 0 at rest, e.g. to centre it in the viewport
    pub lead_px: f32,
}

impl TrackLayout {
    /// One slide per viewport width
    pub fn paged(viewport_width: f32) -> Self {
        Self {
            step_px: viewport_width,
            lead_px: 0.0,
        }
    }

    /// Fixed item pitch with a leading offset
    pub fn stepped(step_px: f32, lead_px: f32) -> Self {
        Self { step_px, lead_px }
    }

    /// Track translation that puts `index` in its resting place
    pub fn resting_offset(&self, index: usize) -> f32 {
        self.lead_px - index as f32 * self.step_px
    }
}

/// Where the presentation layer should draw the track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPosition {
    /// Horizontal translation of the whole track
    pub offset_px: f32,
    /// Rotation of the focused slide; zero unless tilt is enabled
    pub tilt_deg: f32,
    /// True when the track should animate to rest, false while it follows
    /// the pointer
    pub settling: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    layout: TrackLayout,
    tilt: bool,
}

impl Projector {
    pub fn new(layout: TrackLayout) -> Self {
        Self {
            layout,
            tilt: false,
        }
    }

    /// Tilt the focused slide in proportion to the drag
    pub fn with_tilt(mut self) -> Self {
        self.tilt = true;
        self
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn project(&self, index: usize, live_drag: Option<f32>) -> DisplayPosition {
        let rest = self.layout.resting_offset(index);
        match live_drag {
            Some(dx) => DisplayPosition {
                offset_px: rest + dx,
                tilt_deg: if self.tilt {
                    (dx / TILT_SPAN_PX * MAX_TILT_DEG).clamp(-MAX_TILT_DEG, MAX_TILT_DEG)
                } else {
                    0.0
                },
                settling: false,
            },
            None => DisplayPosition {
                offset_px: rest,
                tilt_deg: 0.0,
                settling: true,
            },
        }
    }
}

/// Slide closest to the viewport centre of a free-scrolling track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollFocus {
    pub index: usize,
    /// Progress toward the neighbouring slide, -1.0 (previous) to 1.0 (next)
    pub phase: f32,
}

/// Find the focused slide from measured slide centres.
///
/// Used by scroll-driven navigators, which feed `index` back through
/// [`NavigationController::go_to`](crate::NavigationController::go_to).
pub fn nearest_slide(centers: &[f32], viewport_center: f32) -> Option<ScrollFocus> {
    let (index, current) = centers
        .iter()
        .copied()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (a - viewport_center)
                .abs()
                .total_cmp(&(b - viewport_center).abs())
        })?;

    let span = match (centers.get(index + 1), index.checked_sub(1).map(|i| centers[i])) {
        (Some(next), _) => (next - current).abs(),
        (None, Some(prev)) => (current - prev).abs(),
        (None, None) => return Some(ScrollFocus { index, phase: 0.0 }),
    };
    let phase = ((viewport_center - current) / span.max(1.0)).clamp(-1.0, 1.0);

    Some(ScrollFocus { index, phase })
}
