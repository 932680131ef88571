//! Single-flight guard: at most one export at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Busy flag shared by every clone of an exporter
///
/// A second request while the flag is held is ignored rather than queued.
#[derive(Clone, Debug, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    /// Create an idle guard
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag, or `None` if another export holds it
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    /// Whether the flag is currently held
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the busy flag when dropped.
#[must_use = "the flag is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct FlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
