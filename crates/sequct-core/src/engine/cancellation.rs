use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag used to stop a running search between iterations.
///
/// Clones observe the same flag, so a token can be handed to another thread
/// (a signal handler, a UI) while the search holds its own copy.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
