//! In-memory provider for fixtures and callers that already hold bars.

use super::provider::{BarProvider, DataError, DataSource};
use crate::domain::BarSeries;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: HashMap<String, BarSeries>,
    failures: HashMap<String, String>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, series: BarSeries) -> Self {
        self.insert(series);
        self
    }

    pub fn insert(&mut self, series: BarSeries) {
        self.series.insert(series.symbol.clone(), series);
    }

    /// Make every fetch of `symbol` fail with `reason`.
    pub fn with_failure(mut self, symbol: &str, reason: &str) -> Self {
        self.failures.insert(symbol.to_string(), reason.to_string());
        self
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut v: Vec<&str> = self.series.keys().map(String::as_str).collect();
        v.sort_unstable();
        v
    }
}

impl BarProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "memory"
    }

    fn source(&self) -> DataSource {
        DataSource::Memory
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<BarSeries, DataError> {
        if let Some(reason) = self.failures.get(symbol) {
            return Err(DataError::Unavailable {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        self.series
            .get(symbol)
            .map(|s| s.window(start, end))
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })
    }
}
