use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One-way stop flag shared by every task of a run. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Signal {
    fired: Arc<AtomicBool>,
    token: CancellationToken,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` only for the first caller.
    pub fn stop(&self) -> bool {
        let won = !self.fired.swap(true, Ordering::AcqRel);
        self.token.cancel();
        won
    }

    pub fn is_stopped(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    pub async fn stopped(&self) {
        self.token.cancelled().await
    }
}
