//! Market data seen from the fetcher's side.
//!
//! A provider exposes two capabilities:
//! - a live `Snapshot` for a symbol, where every field is optional because
//!   providers routinely omit some of them (outside market hours, thin names);
//! - a sequence of OHLCV `Bar`s for a `BarWindow` (period + granularity),
//!   ordered oldest to newest.
use chrono::{DateTime, Utc};
use strum_macros::{Display, EnumString};

use crate::Result;

/// Live single-point-in-time quote. `None` means the provider did not supply the field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Snapshot {
    /// Last traded price.
    pub current_price: Option<f64>,
    /// Close of the previous session.
    pub previous_close: Option<f64>,
    /// Session high.
    pub day_high: Option<f64>,
    /// Session low.
    pub day_low: Option<f64>,
    /// Session volume.
    pub volume: Option<u64>,
}

impl Snapshot {
    /// Returns `true` when all five fields are present.
    pub fn is_complete(&self) -> bool {
        self.current_price.is_some()
            && self.previous_close.is_some()
            && self.day_high.is_some()
            && self.day_low.is_some()
            && self.volume.is_some()
    }
}

/// OHLCV aggregate over one granularity step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Start of the bar.
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// How far back a bars request reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Period {
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "2d")]
    TwoDays,
    #[strum(serialize = "5d")]
    FiveDays,
    #[strum(serialize = "1mo")]
    OneMonth,
}

/// Width of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Granularity {
    #[strum(serialize = "1m")]
    OneMinute,
    #[strum(serialize = "5m")]
    FiveMinutes,
    #[strum(serialize = "15m")]
    FifteenMinutes,
    #[strum(serialize = "1h")]
    OneHour,
    #[strum(serialize = "1d")]
    OneDay,
}

/// Time window and granularity of a bars request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BarWindow {
    pub period: Period,
    pub granularity: Granularity,
}

impl BarWindow {
    pub const fn new(period: Period, granularity: Granularity) -> Self {
        Self { period, granularity }
    }
}

/// Upstream market data capability used by `QuoteFetcher`.
pub trait MarketData: Send + Sync {
    /// Requests a live snapshot for `symbol`.
    fn snapshot(&self, symbol: &str) -> Result<Snapshot>;

    /// Requests bars for `symbol` covering `window`, oldest first.
    fn bars(&self, symbol: &str, window: BarWindow) -> Result<Vec<Bar>>;
}

impl<T: MarketData + ?Sized> MarketData for &T {
    fn snapshot(&self, symbol: &str) -> Result<Snapshot> {
        (**self).snapshot(symbol)
    }

    fn bars(&self, symbol: &str, window: BarWindow) -> Result<Vec<Bar>> {
        (**self).bars(symbol, window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_parts_render_as_provider_strings() {
        assert_eq!(Period::TwoDays.to_string(), "2d");
        assert_eq!(Period::OneMonth.to_string(), "1mo");
        assert_eq!(Granularity::OneMinute.to_string(), "1m");
        assert_eq!("1d".parse::<Granularity>().ok(), Some(Granularity::OneDay));
        assert!("7x".parse::<Period>().is_err());
    }

    #[test]
    fn snapshot_is_complete_only_with_all_fields() {
        let mut snapshot = Snapshot {
            current_price: Some(1.0),
            previous_close: Some(1.0),
            day_high: Some(1.0),
            day_low: Some(1.0),
            volume: None,
        };
        assert!(!snapshot.is_complete());
        snapshot.volume = Some(0);
        assert!(snapshot.is_complete());
        assert!(!Snapshot::default().is_complete());
    }
}
