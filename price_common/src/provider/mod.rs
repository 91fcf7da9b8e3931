//! `MarketData` implementations backed by real data providers.
pub mod yahoo;

pub use yahoo::YahooProvider;
