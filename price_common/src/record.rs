//! The observation written to the log table.
//!
//! A `QuoteRecord` is always fully populated: whatever the provider could not
//! supply is coerced to zero when the record is built from a `Snapshot`.
use chrono::NaiveDateTime;

use crate::market::Snapshot;

/// Format used for the timestamp column and the summary title.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column names of the log table, in row order.
pub const COLUMNS: [&str; 7] = [
    "timestamp",
    "symbol",
    "current_price",
    "previous_close",
    "day_high",
    "day_low",
    "volume",
];

/// One price observation for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRecord {
    /// Local capture time, second precision.
    pub timestamp: NaiveDateTime,
    /// Ticker as supplied by the caller.
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub day_high: f64,
    pub day_low: f64,
    pub volume: u64,
}

impl QuoteRecord {
    /// Builds a record from resolved fields, coercing unresolved ones to zero.
    pub fn from_snapshot(timestamp: NaiveDateTime, symbol: &str, fields: Snapshot) -> Self {
        QuoteRecord {
            timestamp,
            symbol: String::from(symbol),
            current_price: fields.current_price.unwrap_or(0.0),
            previous_close: fields.previous_close.unwrap_or(0.0),
            day_high: fields.day_high.unwrap_or(0.0),
            day_low: fields.day_low.unwrap_or(0.0),
            volume: fields.volume.unwrap_or(0),
        }
    }

    /// Timestamp rendered as `YYYY-MM-DD HH:MM:SS`.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 8)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid datetime")
    }

    #[test]
    fn unresolved_fields_become_zero() {
        let record = QuoteRecord::from_snapshot(at(9, 30, 0), "NVDA", Snapshot::default());

        assert_eq!(record.symbol, "NVDA");
        assert_eq!(record.current_price, 0.0);
        assert_eq!(record.previous_close, 0.0);
        assert_eq!(record.day_high, 0.0);
        assert_eq!(record.day_low, 0.0);
        assert_eq!(record.volume, 0);
    }

    #[test]
    fn resolved_fields_are_kept() {
        let fields = Snapshot {
            current_price: Some(875.28),
            previous_close: Some(926.69),
            day_high: Some(974.0),
            day_low: Some(865.06),
            volume: Some(113_299_600),
        };
        let record = QuoteRecord::from_snapshot(at(16, 0, 5), "NVDA", fields);

        assert_eq!(record.current_price, 875.28);
        assert_eq!(record.volume, 113_299_600);
        assert_eq!(record.formatted_timestamp(), "2024-03-08 16:00:05");
    }
}
