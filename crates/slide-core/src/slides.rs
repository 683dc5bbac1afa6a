//! Slide descriptors supplied by the host

use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{CarouselError, Result};

/// Opaque key identifying a slide within its collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SlideId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for SlideId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A single slide. The payload is whatever the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide<P> {
    pub id: SlideId,
    pub payload: P,
    /// Inactive slides are dropped by [`SlideCollection::active_only`]
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl<P> Slide<P> {
    pub fn new(id: impl Into<SlideId>, payload: P) -> Self {
        Self {
            id: id.into(),
            payload,
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// Ordered, immutable list of slides.
///
/// The navigator only reads its length and the identity of its entries.
/// Replacing the list goes through
/// [`NavigationController::replace_slides`](crate::NavigationController::replace_slides).
#[derive(Debug, Clone, PartialEq)]
pub struct SlideCollection<P> {
    slides: Vec<Slide<P>>,
}

impl<P> SlideCollection<P> {
    /// Build a collection, rejecting duplicate ids
    pub fn new(slides: Vec<Slide<P>>) -> Result<Self> {
        let mut seen = AHashSet::with_capacity(slides.len());
        for slide in &slides {
            if !seen.insert(&slide.id) {
                return Err(CarouselError::DuplicateSlide(slide.id.clone()));
            }
        }
        Ok(Self { slides })
    }

    pub fn empty() -> Self {
        Self { slides: Vec::new() }
    }

    /// Keep only slides flagged active, preserving order
    pub fn active_only(self) -> Self {
        Self {
            slides: self.slides.into_iter().filter(|s| s.active).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Slide<P>> {
        self.slides.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slide<P>> {
        self.slides.iter()
    }

    /// Index of the slide with the given id
    pub fn position_of(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|s| &s.id == id)
    }
}

impl<P> Default for SlideCollection<P> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = SlideCollection::new(vec![
            Slide::new("a", ()),
            Slide::new("b", ()),
            Slide::new("a", ()),
        ]);

        match result {
            Err(CarouselError::DuplicateSlide(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_active_only_keeps_order() {
        let slides = SlideCollection::new(vec![
            Slide::new(1u64, "first"),
            Slide::new(2u64, "hidden").inactive(),
            Slide::new(3u64, "third"),
        ])
        .unwrap()
        .active_only();

        let ids: Vec<_> = slides.iter().map(|s| s.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(slides.position_of(&SlideId::from(3u64)), Some(1));
    }

    #[test]
    fn test_inactive_flag_defaults_on_deserialize() {
        let slide: Slide<String> =
            serde_json::from_str(r#"{"id":"2019","payload":"Founding year"}"#).unwrap();
        assert!(slide.active);
        assert_eq!(slide.id, SlideId::from("2019"));
    }
}
