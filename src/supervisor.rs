use crate::model::{Config, Outcome};
use crate::signal::Signal;
use crate::transport::Transport;
use crate::worker::worker;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{Instant, MissedTickBehavior};

const PROGRESS_TICK: Duration = Duration::from_millis(100);

// Deadline used when the run duration does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Runs the timer and `concurrency` workers, joining all of them before returning.
pub struct Supervisor {
    config: Config,
    transport: Arc<dyn Transport>,
    signal: Signal,
    progress: ProgressBar,
}

impl Supervisor {
    pub fn new(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            signal: Signal::new(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn signal(&self) -> Signal {
        self.signal.clone()
    }

    pub async fn run(self) -> Outcome {
        let Self {
            config,
            transport,
            signal,
            progress,
        } = self;
        tracing::info!(
            url = %config.url,
            concurrency = config.concurrency.get(),
            duration = ?config.duration,
            "starting load"
        );

        let mut set = JoinSet::new();
        set.spawn(timer(config.duration, signal.clone(), progress));
        for rank in 0..config.concurrency.get() {
            set.spawn(worker(
                rank,
                transport.clone(),
                config.url.clone(),
                signal.clone(),
            ));
        }

        let mut overall = Outcome::Stopped;
        while let Some(joined) = set.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(err) if err.is_panic() => {
                    signal.stop();
                    std::panic::resume_unwind(err.into_panic());
                }
                Err(_) => Outcome::Stopped,
            };
            if !matches!(outcome, Outcome::Stopped) {
                signal.stop();
            }
            overall = overall.absorb(outcome);
        }
        overall
    }
}

async fn timer(duration: Duration, signal: Signal, progress: ProgressBar) -> Outcome {
    let start = Instant::now();
    let deadline = start
        .checked_add(duration)
        .unwrap_or_else(|| start + FAR_FUTURE);
    let deadline = tokio::time::sleep_until(deadline);
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(PROGRESS_TICK);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let outcome = loop {
        tokio::select! {
            biased;
            _ = signal.stopped() => break Outcome::Stopped,
            _ = &mut deadline => {
                if signal.stop() {
                    tracing::debug!(elapsed = ?start.elapsed(), "time's up");
                    break Outcome::TimedOut;
                }
                break Outcome::Stopped;
            }
            _ = ticker.tick() => progress.set_position(millis(start.elapsed())),
        }
    };
    progress.finish_and_clear();
    outcome
}

/// Progress position for an elapsed span, one unit per millisecond.
pub fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}
