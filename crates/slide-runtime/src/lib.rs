//! Async host for a slide navigator.
//!
//! [`CarouselDriver`] runs one [`NavigationController`](slide_core::NavigationController)
//! inside a tokio task. Buttons, pointer events and timers reach it through a
//! single command queue, so they are applied strictly in arrival order.

pub mod clock;
pub mod driver;
pub mod error;
pub mod source;

pub use clock::TokioClock;
pub use driver::{Applied, CarouselDriver, CarouselHandle};
pub use error::DriverError;
pub use source::{SlideSource, StaticSource};
