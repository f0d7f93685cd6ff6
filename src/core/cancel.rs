use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Cooperative cancellation flag shared between a worker and its driver.
///
/// Workers poll it at group boundaries while scanning and before each
/// write while exporting; there is no hard interrupt.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// New, not canceled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clears a pending request so the worker keeps going.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }

    /// True once [`CancelToken::cancel`] was called and not reset.
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}
