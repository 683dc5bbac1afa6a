//! Index change subscriber trait

use super::IndexChange;

/// Trait for components that redraw when the current slide changes
pub trait IndexSubscriber: Send + Sync {
    /// Called after every applied transition
    fn on_index_change(&self, change: &IndexChange);
}

impl<F> IndexSubscriber for F
where
    F: Fn(&IndexChange) + Send + Sync,
{
    fn on_index_change(&self, change: &IndexChange) {
        self(change)
    }
}
