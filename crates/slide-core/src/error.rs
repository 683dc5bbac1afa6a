//! Errors raised while building a carousel

use thiserror::Error;

use crate::slides::SlideId;

/// Errors that can occur when configuring a carousel or its slide collection.
///
/// Navigation itself never fails; see [`crate::navigation::Transition`].
#[derive(Error, Debug)]
pub enum CarouselError {
    #[error("invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },

    #[error("duplicate slide id: {0}")]
    DuplicateSlide(SlideId),

    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CarouselError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        CarouselError::InvalidConfig { field, reason }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, CarouselError>;
