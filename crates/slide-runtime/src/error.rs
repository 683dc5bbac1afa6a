use slide_core::CarouselError;
use thiserror::Error;

/// Errors surfaced by the async driver
#[derive(Error, Debug)]
pub enum DriverError {
    #[error("carousel driver has shut down")]
    Closed,

    #[error("invalid carousel: {0}")]
    Carousel(#[from] CarouselError),

    #[error("slide source '{source_name}' failed: {error:#}")]
    Source {
        source_name: String,
        error: anyhow::Error,
    },
}
