//! Default constants and the explicit configuration handed to each component.
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use crate::QuoteError;
use crate::Result;
use crate::market::{BarWindow, Granularity, Period};

/// Symbol polled when none is given.
pub const DEFAULT_SYMBOL: &str = "NVDA";
/// Log table written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "nvda_prices.csv";
/// Minutes between two cycles in continuous mode.
pub const DEFAULT_INTERVAL_MINUTES: u32 = 5;
const DEFAULT_INTERVAL: NonZeroU32 = match NonZeroU32::new(DEFAULT_INTERVAL_MINUTES) {
    Some(minutes) => minutes,
    None => NonZeroU32::MIN,
};
/// Scheduler due-check period.
pub const POLL_TICK: Duration = Duration::from_secs(1);
/// Prefix printed in front of every price in the summary.
pub const CURRENCY_PREFIX: &str = "$";
/// Upstream request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Recent minute bars used when the snapshot is incomplete.
pub const INTRADAY_WINDOW: BarWindow = BarWindow::new(Period::TwoDays, Granularity::OneMinute);
/// Daily bars used to recover the previous close.
pub const DAILY_WINDOW: BarWindow = BarWindow::new(Period::FiveDays, Granularity::OneDay);

pub const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const YAHOO_COOKIE_URL: &str = "https://fc.yahoo.com";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko)";

/// What a single cycle observes and where it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub symbol: String,
    pub output: PathBuf,
}

impl JobConfig {
    pub fn new(symbol: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            symbol: symbol.into(),
            output: output.into(),
        }
    }
}

impl Default for JobConfig {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOL, DEFAULT_OUTPUT)
    }
}

/// Continuous-mode timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Minutes between cycles, always at least one.
    pub interval_minutes: NonZeroU32,
    /// Sleep between two due checks.
    pub tick: Duration,
}

impl ScheduleConfig {
    /// Validates `interval_minutes`; zero is rejected.
    pub fn new(interval_minutes: u32) -> Result<Self> {
        let interval_minutes = NonZeroU32::new(interval_minutes).ok_or_else(|| {
            QuoteError::Config(String::from("interval must be a positive number of minutes"))
        })?;
        Ok(Self {
            interval_minutes,
            tick: POLL_TICK,
        })
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_minutes: DEFAULT_INTERVAL,
            tick: POLL_TICK,
        }
    }
}

/// Bar windows consulted by the fallback tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchConfig {
    pub intraday: BarWindow,
    pub daily: BarWindow,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            intraday: INTRADAY_WINDOW,
            daily: DAILY_WINDOW,
        }
    }
}

/// HTTP settings of the Yahoo Finance provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Host serving the quote, chart and crumb endpoints.
    pub base_url: String,
    /// Host visited to obtain session cookies.
    pub cookie_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(YAHOO_BASE_URL),
            cookie_url: String::from(YAHOO_COOKIE_URL),
            user_agent: String::from(USER_AGENT),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
