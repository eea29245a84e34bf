mod auto_pause;

pub use auto_pause::{
    AdjustStep, AutoPauseController, AutoPauseState, DurationLimits, DEFAULT_MINUTES,
    FORCE_RESUME_MINUTES, MAX_MINUTES, MIN_MINUTES,
};

use std::sync::{Arc, Mutex, MutexGuard};

/// Auto-pause controller shared between the activity loop and the
/// dispatcher. Each lock is one critical section.
#[derive(Debug, Clone, Default)]
pub struct SharedAutoPause(Arc<Mutex<AutoPauseController>>);

impl SharedAutoPause {
    pub fn new(controller: AutoPauseController) -> Self {
        Self(Arc::new(Mutex::new(controller)))
    }

    /// Lock the controller. A poisoned lock still holds a consistent
    /// controller (every mutation is a plain field write), so it is reused.
    pub fn lock(&self) -> MutexGuard<'_, AutoPauseController> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> AutoPauseState {
        self.lock().state()
    }
}
