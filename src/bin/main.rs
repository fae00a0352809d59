use getload::*;

use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXIT_INTERRUPTED: u8 = 130;

/// Hammer a single URL with GET requests from concurrent workers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL to request
    url: Url,

    /// How long to run, e.g. 30s, 5m or 1h30m
    #[arg(short, long, default_value = "1m", value_parser = duration::parse_run_duration)]
    duration: Duration,

    /// Number of concurrent workers
    #[arg(short, long, visible_alias = "goroutines", default_value = "10")]
    concurrency: NonZeroUsize,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn seconds_to_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

fn progress_bar(duration: Duration) -> ProgressBar {
    let pb = ProgressBar::new(supervisor::millis(duration));
    match ProgressStyle::with_template("{spinner} {elapsed_precise}/{msg} {wide_bar}") {
        Ok(sty) => pb.set_style(sty),
        Err(err) => tracing::debug!(error = %err, "bad progress template"),
    }
    pb.set_message(seconds_to_hms(duration.as_secs()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = Config {
        duration: args.duration,
        concurrency: args.concurrency,
        url: args.url,
    };

    let progress = if args.quiet {
        ProgressBar::hidden()
    } else {
        progress_bar(config.duration)
    };

    let supervisor =
        Supervisor::new(config, Arc::new(HttpTransport::new())).with_progress(progress);

    let signal = supervisor.signal();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.stop();
        }
    });

    let outcome = supervisor.run().await;
    interrupt.abort();

    match outcome {
        Outcome::TimedOut => ExitCode::SUCCESS,
        Outcome::Failed(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
        Outcome::Stopped => {
            tracing::warn!("interrupted");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}
