//! Price Logger — polls a quote from Yahoo Finance, prints a short summary and
//! appends the observation to a CSV table. It either runs a single cycle
//! (`--once`) or keeps running one cycle every `--interval` minutes until Ctrl+C.
//!
//! Usage example (CLI):
//! ```bash
//! price_logger --symbol NVDA --interval 5 --output nvda_prices.csv
//! price_logger --symbol AAPL --once
//! ```
//!
//! Missing quote fields fall back to recent bars and finally to zero; see
//! `price_common::fetcher` for the resolution rules.
#![warn(missing_docs)]
mod args;

use crate::args::Args;
use clap::Parser;
use crossbeam_channel::{Receiver, bounded};
use log::info;
use price_common::Result;
use price_common::clock::{Clock, SystemClock};
use price_common::config::{FetchConfig, JobConfig, ProviderConfig, ScheduleConfig};
use price_common::market::MarketData;
use price_common::provider::YahooProvider;
use price_common::{Cycle, QuoteError, QuoteFetcher, Scheduler};

fn main() -> Result<(), QuoteError> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let provider_config = ProviderConfig::default().with_timeout_secs(args.timeout_secs);
    let provider = YahooProvider::new(provider_config)?;
    run(&args, provider, &SystemClock, install_shutdown_handler)
}

/// Runs one cycle (`--once`) or the interval scheduler until shutdown.
///
/// `install_shutdown` is only called in continuous mode, after the interval
/// has been validated.
fn run<P, C, S>(args: &Args, provider: P, clock: &C, install_shutdown: S) -> Result<()>
where
    P: MarketData,
    C: Clock,
    S: FnOnce() -> Result<Receiver<()>>,
{
    let job = JobConfig::new(args.symbol.trim(), normalize_path(&args.output));
    let cycle = Cycle::new(QuoteFetcher::new(provider, clock, FetchConfig::default()), job);

    if args.once {
        cycle.run_logged();
        return Ok(());
    }

    let schedule = ScheduleConfig::new(args.interval)?;
    let shutdown = install_shutdown()?;
    info!(
        "Starting scheduler: every {} minute(s) for symbol={}",
        schedule.interval_minutes,
        cycle.job().symbol
    );
    let mut scheduler = Scheduler::from_config(clock, &schedule);
    scheduler.run_until_interrupted(&shutdown, || {
        cycle.run_logged();
    });
    Ok(())
}

fn init_logger(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_secs()
        .parse_default_env()
        .init();
}

/// Installs the Ctrl+C handler and returns the channel it signals on.
fn install_shutdown_handler() -> Result<Receiver<()>> {
    let (shutdown_tx, shutdown_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Stopping after the current tick...");
        let _ = shutdown_tx.try_send(());
    })
    .map_err(|e| QuoteError::Signal(e.to_string()))?;
    Ok(shutdown_rx)
}

/// Strips whitespace and one pair of surrounding quotes from a CLI-provided path.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &std::path::Path) -> std::path::PathBuf {
    let raw = raw.to_string_lossy();
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    std::path::PathBuf::from(no_quotes)
}
