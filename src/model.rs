use crate::transport::RequestError;
use reqwest::Url;
use std::num::NonZeroUsize;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub duration: Duration,
    pub concurrency: NonZeroUsize,
    pub url: Url,
}

#[derive(Debug)]
pub enum Outcome {
    Stopped,
    TimedOut,
    Failed(RequestError),
}

impl Outcome {
    /// The earliest `Failed` is kept; otherwise `TimedOut` beats `Stopped`.
    pub fn absorb(self, other: Outcome) -> Outcome {
        match (self, other) {
            (failed @ Outcome::Failed(_), _) | (_, failed @ Outcome::Failed(_)) => failed,
            (Outcome::TimedOut, _) | (_, Outcome::TimedOut) => Outcome::TimedOut,
            (Outcome::Stopped, Outcome::Stopped) => Outcome::Stopped,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::TimedOut)
    }
}
