//!
//! Quote polling, fallback resolution and CSV logging for a single symbol.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuoteError` used across the workspace.
//! - `result` — handy `Result<T, QuoteError>` alias.
//! - `config` — default constants and the per-component configuration structs.
//! - `market` — snapshots, bars, bar windows and the `MarketData` trait.
//! - `provider` — the Yahoo Finance `MarketData` implementation.
//! - `record` — the `QuoteRecord` written to the log table.
//! - `fetcher` — two-tier quote resolution that never fails.
//! - `recorder` — console summary and append-only CSV table.
//! - `clock` — local time and sleeping, swappable in tests.
//! - `cycle` — one fetch/print/persist pass and its catch-all boundary.
//! - `scheduler` — fixed-interval loop with cooperative shutdown.
pub mod clock;
pub mod config;
pub mod cycle;
pub mod error;
pub mod fetcher;
pub mod market;
pub mod provider;
pub mod record;
pub mod recorder;
pub mod result;
pub mod scheduler;

pub use cycle::Cycle;
pub use error::QuoteError;
pub use fetcher::QuoteFetcher;
pub use record::QuoteRecord;
pub use result::Result;
pub use scheduler::{Scheduler, SchedulerState};
