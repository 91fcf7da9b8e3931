//! Command-line arguments for the price logger.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use price_common::config::{
    DEFAULT_INTERVAL_MINUTES, DEFAULT_OUTPUT, DEFAULT_SYMBOL, DEFAULT_TIMEOUT_SECS,
};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about = "Quote price logger with scheduler", long_about = None)]
pub struct Args {
    /// Ticker symbol to poll.
    #[clap(long, default_value = DEFAULT_SYMBOL)]
    pub symbol: String,

    /// Run a single check and exit.
    #[clap(long)]
    pub once: bool,

    /// Scheduler interval in minutes.
    #[clap(long, default_value_t = DEFAULT_INTERVAL_MINUTES,
        value_parser = clap::value_parser!(u32).range(1..))]
    pub interval: u32,

    /// CSV table the observations are appended to.
    #[clap(long, alias = "csv", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Upstream request timeout in seconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Log verbosity; `RUST_LOG` takes precedence when set.
    #[clap(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

/// Verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Errors and warnings.
    Warn,
    /// Progress messages (default).
    Info,
    /// Upstream fallbacks and scheduling details.
    Debug,
    /// Everything.
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}
