//! Carousel configuration and the presets used across the site

use serde::{Deserialize, Serialize};

use crate::error::{CarouselError, Result};
use crate::navigation::BoundaryMode;

/// Options recognised by a carousel instance.
///
/// Field names serialize in camelCase (`autoplayIntervalMs`, `loop`, ...) so
/// the host page can hand its options object over unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    /// Whether the autoplay timer runs at all
    pub autoplay: bool,

    /// Autoplay period
    pub autoplay_interval_ms: u64,

    /// Wrap past the last slide (true) or clamp at the ends (false)
    #[serde(rename = "loop")]
    pub looping: bool,

    /// Absolute displacement that commits a drag
    pub drag_commit_threshold_px: f32,

    /// Velocity (px/ms) times displacement (px) above which a short flick
    /// still commits. `None` disables flick detection.
    pub flick_commit_product: Option<f32>,

    /// Live drag offset reported to the projector is clamped to this magnitude
    pub drag_clamp_px: Option<f32>,

    /// Autoplay suppression after manual navigation
    pub manual_nav_cooldown_ms: u64,

    /// In bounded mode, autoplay jumps back to the first slide after the last
    pub rewind_at_end: bool,

    /// Index shown on mount, clamped into range
    pub initial_index: usize,

    /// Ignore drags started with a non-primary mouse button
    pub primary_button_only: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            autoplay_interval_ms: 5000,
            looping: true,
            drag_commit_threshold_px: 48.0,
            flick_commit_product: None,
            drag_clamp_px: None,
            manual_nav_cooldown_ms: 1500,
            rewind_at_end: false,
            initial_index: 0,
            primary_button_only: true,
        }
    }
}

impl CarouselConfig {
    /// Full-width hero banner: wraps, autoplays every 5s
    pub fn hero_banner() -> Self {
        Self::default()
    }

    /// Yearly journey navigator: bounded, driven by buttons and scroll only
    pub fn journey() -> Self {
        Self {
            autoplay: false,
            looping: false,
            ..Self::default()
        }
    }

    /// Horizontal timeline: bounded, stiffer swipe, clamped live drag
    pub fn timeline() -> Self {
        Self {
            autoplay: false,
            looping: false,
            drag_commit_threshold_px: 70.0,
            drag_clamp_px: Some(220.0),
            ..Self::default()
        }
    }

    /// Parse from a JSON options object; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn boundary(&self) -> BoundaryMode {
        if self.looping {
            BoundaryMode::Wrap
        } else {
            BoundaryMode::Bounded
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.autoplay && self.autoplay_interval_ms == 0 {
            return Err(CarouselError::invalid(
                "autoplayIntervalMs",
                "must be greater than zero when autoplay is enabled",
            ));
        }
        if !positive(self.drag_commit_threshold_px) {
            return Err(CarouselError::invalid(
                "dragCommitThresholdPx",
                "must be a positive finite number",
            ));
        }
        if matches!(self.flick_commit_product, Some(p) if !positive(p)) {
            return Err(CarouselError::invalid(
                "flickCommitProduct",
                "must be a positive finite number",
            ));
        }
        if matches!(self.drag_clamp_px, Some(c) if !positive(c)) {
            return Err(CarouselError::invalid(
                "dragClampPx",
                "must be a positive finite number",
            ));
        }
        Ok(())
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_behaviour() {
        let config = CarouselConfig::default();
        assert_eq!(config.autoplay_interval_ms, 5000);
        assert_eq!(config.manual_nav_cooldown_ms, 1500);
        assert_eq!(config.drag_commit_threshold_px, 48.0);
        assert_eq!(config.flick_commit_product, None);
        assert!(config.looping);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_options() {
        let config =
            CarouselConfig::from_json_str(r#"{"loop": false, "autoplayIntervalMs": 3000}"#)
                .unwrap();
        assert_eq!(config.boundary(), BoundaryMode::Bounded);
        assert_eq!(config.autoplay_interval_ms, 3000);
        assert_eq!(config.manual_nav_cooldown_ms, 1500);
    }

    #[test]
    fn test_rejects_invalid_values() {
        let err = CarouselConfig::from_json_str(r#"{"autoplayIntervalMs": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            CarouselError::InvalidConfig { field: "autoplayIntervalMs", .. }
        ));

        let config = CarouselConfig {
            drag_commit_threshold_px: f32::NAN,
            ..CarouselConfig::default()
        };
        assert!(config.validate().is_err());

        assert!(matches!(
            CarouselConfig::from_json_str("{not json"),
            Err(CarouselError::Parse(_))
        ));
    }

    #[test]
    fn test_presets() {
        let timeline = CarouselConfig::timeline();
        assert_eq!(timeline.boundary(), BoundaryMode::Bounded);
        assert!(!timeline.autoplay);
        assert_eq!(timeline.drag_clamp_px, Some(220.0));
        assert!(timeline.validate().is_ok());
        assert!(CarouselConfig::journey().validate().is_ok());
    }
}
