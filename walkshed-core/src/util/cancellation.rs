use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// cooperative cancellation signal for long-running requests. workers poll
/// the token between work items, never mid-ray, so cancellation latency is
/// bounded by the largest single task.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> CancellationToken {
        CancellationToken::default()
    }

    /// request cancellation. idempotent and visible to all clones.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::CancellationToken;

    #[test]
    fn test_cancellation_shared_across_clones() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
