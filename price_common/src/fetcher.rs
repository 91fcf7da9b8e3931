//! Best-effort quote resolution.
//!
//! `QuoteFetcher::fetch` never fails. Fields are resolved in two tiers:
//!
//! 1. the provider's live `Snapshot`;
//! 2. when anything is still missing, recent intraday bars (last close, overall
//!    high/low, last volume) and, for the previous close, daily bars.
//!
//! Provider errors are logged at debug level and only leave fields unresolved.
//! Whatever remains unresolved is coerced to zero by `QuoteRecord::from_snapshot`.
use log::debug;

use crate::Result;
use crate::clock::{Clock, truncate_to_seconds};
use crate::config::FetchConfig;
use crate::market::{Bar, MarketData, Snapshot};
use crate::record::QuoteRecord;

/// Resolves a `QuoteRecord` for a symbol from a `MarketData` provider.
pub struct QuoteFetcher<P, C> {
    provider: P,
    clock: C,
    config: FetchConfig,
}

impl<P: MarketData, C: Clock> QuoteFetcher<P, C> {
    pub fn new(provider: P, clock: C, config: FetchConfig) -> Self {
        Self {
            provider,
            clock,
            config,
        }
    }

    /// Returns a complete record for `symbol`, falling back to bars and then to zeros.
    pub fn fetch(&self, symbol: &str) -> QuoteRecord {
        let mut fields = match self.provider.snapshot(symbol) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("Snapshot request for {} failed: {}", symbol, e);
                Snapshot::default()
            }
        };

        if !fields.is_complete() {
            if let Err(e) = self.fill_from_bars(symbol, &mut fields) {
                debug!("Bar fallback for {} failed: {}", symbol, e);
            }
        }

        let timestamp = truncate_to_seconds(self.clock.now());
        QuoteRecord::from_snapshot(timestamp, symbol, fields)
    }

    fn fill_from_bars(&self, symbol: &str, fields: &mut Snapshot) -> Result<()> {
        let bars = self.provider.bars(symbol, self.config.intraday)?;
        let Some(last) = bars.last() else {
            debug!("No intraday bars for {}", symbol);
            return Ok(());
        };

        fields.current_price = fields.current_price.or(Some(last.close));
        fields.volume = fields.volume.or(Some(last.volume));
        fields.day_high = fields.day_high.or_else(|| max_high(&bars));
        fields.day_low = fields.day_low.or_else(|| min_low(&bars));

        if fields.previous_close.is_none() {
            let daily = self.provider.bars(symbol, self.config.daily)?;
            fields.previous_close = previous_close(&daily);
        }
        Ok(())
    }
}

fn max_high(bars: &[Bar]) -> Option<f64> {
    bars.iter().map(|bar| bar.high).reduce(f64::max)
}

fn min_low(bars: &[Bar]) -> Option<f64> {
    bars.iter().map(|bar| bar.low).reduce(f64::min)
}

/// Close of the second-to-last daily bar, or of the only one.
fn previous_close(daily: &[Bar]) -> Option<f64> {
    match daily {
        [] => None,
        [only] => Some(only.close),
        [.., prior, _] => Some(prior.close),
    }
}
