//! Where slide lists come from.
//!
//! Fetching is the host's business (REST calls, caching, auth); the driver
//! only needs something that eventually yields slides.

use async_trait::async_trait;
use slide_core::Slide;

/// Trait for collaborators that supply slides
#[async_trait]
pub trait SlideSource<P: Send>: Send + Sync {
    /// Load the current slide list, inactive entries included
    async fn load(&self) -> anyhow::Result<Vec<Slide<P>>>;

    /// Name used in logs and errors
    fn source_name(&self) -> &str;
}

/// In-memory source
#[derive(Debug, Clone)]
pub struct StaticSource<P> {
    name: String,
    slides: Vec<Slide<P>>,
}

impl<P> StaticSource<P> {
    pub fn new(name: impl Into<String>, slides: Vec<Slide<P>>) -> Self {
        Self {
            name: name.into(),
            slides,
        }
    }
}

#[async_trait]
impl<P> SlideSource<P> for StaticSource<P>
where
    P: Clone + Send + Sync,
{
    async fn load(&self) -> anyhow::Result<Vec<Slide<P>>> {
        Ok(self.slides.clone())
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
