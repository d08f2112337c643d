//! One-way shutdown latch shared between the classifier and the crawlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Process-wide shutdown flag that can only go from `false` to `true`.
///
/// The classifier trips the latch once the collection goal is reached, and a failing worker
/// trips it to stop the run early. Crawlers only read it. Stores use [`Ordering::Release`] and loads use
/// [`Ordering::Acquire`], so a crawler that observes the latch also observes everything the
/// classifier did before tripping it.
#[derive(Debug, Clone, Default)]
pub struct ShutdownLatch {
    tripped: Arc<AtomicBool>,
}

impl ShutdownLatch {
    /// Creates a new untripped latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Trips the latch.
    ///
    /// Returns `true` only for the call that performed the transition, so the caller can
    /// run its one-time side effects exactly once.
    pub fn trip(&self) -> bool {
        self.tripped
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Returns whether the latch has been tripped.
    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::Acquire)
    }
}
