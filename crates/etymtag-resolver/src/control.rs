//! Run-level cancellation

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cancel flag plus optional deadline shared by everything in one run
///
/// Clones share the flag, so a signal handler can hold one clone while
/// resolvers on other threads hold theirs.
#[derive(Debug, Clone, Default)]
pub struct RunControl {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl RunControl {
    /// A control that never stops on its own
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop the run once `budget` has elapsed from now
    pub fn with_timeout(mut self, budget: Duration) -> Self {
        self.deadline = Some(Instant::now() + budget);
        self
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested explicitly
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Whether the run must stop (cancelled or past its deadline)
    pub fn should_stop(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}
