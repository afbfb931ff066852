use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use super::TerminationCondition;

/// A [`TerminationCondition`] which triggers when a shared flag is raised, either by another
/// thread holding the flag (e.g. a SIGINT handler) or by a portfolio worker which finished the
/// search.
#[derive(Clone, Debug, Default)]
pub struct StopFlag {
    flag: Arc<AtomicBool>,
}

impl StopFlag {
    pub fn new() -> StopFlag {
        StopFlag::default()
    }

    /// The underlying flag, e.g. to register it with a signal handler.
    pub fn handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    pub fn raise(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl TerminationCondition for StopFlag {
    fn should_stop(&mut self) -> bool {
        self.is_raised()
    }
}
