//! One fetch → persist → print pass for the configured symbol.
//!
//! `Cycle::run_logged` is the single catch-all boundary: a failed cycle is
//! logged and abandoned, so the scheduler keeps going.
use std::io::{self, Write};

use log::error;

use crate::Result;
use crate::clock::Clock;
use crate::config::JobConfig;
use crate::fetcher::QuoteFetcher;
use crate::market::MarketData;
use crate::record::QuoteRecord;
use crate::recorder::{append_row, format_summary};

pub struct Cycle<P, C> {
    fetcher: QuoteFetcher<P, C>,
    job: JobConfig,
}

impl<P: MarketData, C: Clock> Cycle<P, C> {
    pub fn new(fetcher: QuoteFetcher<P, C>, job: JobConfig) -> Self {
        Self { fetcher, job }
    }

    pub fn job(&self) -> &JobConfig {
        &self.job
    }

    /// Fetches a record, appends it to the table and prints its summary to stdout.
    pub fn run(&self) -> Result<QuoteRecord> {
        self.run_to(&mut io::stdout().lock())
    }

    /// Like `run`, with the summary written to `out`.
    ///
    /// The row is persisted before the summary is written, so a broken
    /// console (closed pipe) still leaves the observation in the table.
    pub fn run_to<W: Write>(&self, out: &mut W) -> Result<QuoteRecord> {
        let record = self.fetcher.fetch(&self.job.symbol);
        append_row(&record, &self.job.output)?;
        out.write_all(format_summary(&record).as_bytes())?;
        out.flush()?;
        Ok(record)
    }

    /// Like `run`, but failures are logged instead of returned.
    pub fn run_logged(&self) -> Option<QuoteRecord> {
        log_failure(self.run())
    }

    /// Like `run_to`, but failures are logged instead of returned.
    pub fn run_logged_to<W: Write>(&self, out: &mut W) -> Option<QuoteRecord> {
        log_failure(self.run_to(out))
    }
}

fn log_failure(outcome: Result<QuoteRecord>) -> Option<QuoteRecord> {
    match outcome {
        Ok(record) => Some(record),
        Err(e) => {
            error!("Job failed: {}", e);
            None
        }
    }
}
