use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Shared cancellation signal for long running searches
///
/// Cloning yields a handle to the same flag. Searches check it once per
/// frontier expansion and give up with [`crate::Error::Cancelled`] once raised.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
