//! RAII guard backing the single-in-flight rule.
//!
//! The runner itself refuses a second run while one is active instead of
//! relying on a UI layer to disable its submit controls. The guard releases
//! the slot on drop, so every exit path of a run frees it, including panics
//! in the driving task.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

pub(crate) struct InFlightGuard {
    slot: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// Take the in-flight slot; `None` when a run is already active.
    pub(crate) fn acquire(slot: &Arc<AtomicBool>) -> Option<Self> {
        if slot
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            debug!("in-flight slot acquired");
            Some(Self {
                slot: Arc::clone(slot),
            })
        } else {
            None
        }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
        debug!("in-flight slot released");
    }
}
