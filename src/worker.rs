use crate::model::Outcome;
use crate::signal::Signal;
use crate::transport::Transport;
use reqwest::Url;
use std::sync::Arc;

/// Issues GETs back to back until the signal is stopped or a request fails.
pub async fn worker(
    rank: usize,
    transport: Arc<dyn Transport>,
    url: Url,
    signal: Signal,
) -> Outcome {
    tracing::debug!(rank, "worker started");
    let mut ite: u64 = 0;
    loop {
        if signal.is_stopped() {
            tracing::debug!(rank, requests = ite, "worker stopped");
            return Outcome::Stopped;
        }

        if let Err(err) = transport.get(&url).await {
            tracing::debug!(rank, requests = ite, error = %err, "worker failed");
            signal.stop();
            return Outcome::Failed(err);
        }
        ite += 1;
    }
}
