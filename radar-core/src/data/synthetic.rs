//! Deterministic synthetic bars.
//!
//! A bounded random walk seeded from the BLAKE3 hash of the symbol, so the same
//! symbol and range always produce the same bars. Weekends are skipped.

use super::provider::{BarProvider, DataError, DataSource};
use crate::domain::{Bar, BarSeries};
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Walk parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticProvider {
    pub start_price: f64,
    /// Daily returns are drawn uniformly from `[-max_daily_move, max_daily_move)`.
    pub max_daily_move: f64,
    pub min_volume: f64,
    pub max_volume: f64,
}

impl Default for SyntheticProvider {
    fn default() -> Self {
        Self {
            start_price: 100.0,
            max_daily_move: 0.03,
            min_volume: 500_000.0,
            max_volume: 5_000_000.0,
        }
    }
}

impl SyntheticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Vec<Bar> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        let mut bars = Vec::new();
        let mut price = self.start_price;
        let mut current = start;

        while current <= end {
            if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                current += chrono::Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-self.max_daily_move..self.max_daily_move);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(self.min_volume..self.max_volume).round();

            bars.push(Bar {
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += chrono::Duration::days(1);
        }

        bars
    }
}

impl BarProvider for SyntheticProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn source(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<BarSeries, DataError> {
        Ok(BarSeries::new(symbol, self.generate(symbol, start, end))?)
    }
}
