//! Indicator trait, precomputed series container, and indicator errors.
//!
//! Indicators are pure functions: bar history in, numeric series out. The
//! snapshot engine computes each series once and reads the last index.

use crate::domain::Bar;
use crate::numeric::finite;
use std::collections::HashMap;
use thiserror::Error;

/// Trait for indicators.
///
/// Indicators take a full bar series and produce a numeric output series of
/// the same length. Indices where the indicator is undefined hold `f64::NAN`.
///
/// # Look-ahead contamination guard
/// No value at bar t may depend on data from bar t+1 or later. Every indicator
/// must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "atr_14").
    fn name(&self) -> &str;

    /// Index of the first bar at which the indicator can be defined.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;

    /// Value at the last bar, if defined and finite.
    fn last_value(&self, bars: &[Bar]) -> Option<f64> {
        self.compute(bars).last().copied().and_then(finite)
    }
}

/// Explicit indicator failures.
///
/// Most indicators report missing history as an absent value; these errors
/// are reserved for the cases that must fail loudly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    #[error("series has no bars")]
    EmptySeries,

    #[error("{indicator} needs at least {required} bars, got {available}")]
    InsufficientHistory {
        indicator: String,
        required: usize,
        available: usize,
    },

    #[error("{indicator} is undefined at the last bar (non-finite input)")]
    Undefined { indicator: String },
}

/// Container for precomputed indicator series, keyed by indicator name.
#[derive(Debug, Clone, Default)]
pub struct IndicatorValues {
    series: HashMap<String, Vec<f64>>,
}

impl IndicatorValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every indicator over `bars` and store the series by name.
    pub fn precompute(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> Self {
        let mut iv = Self::new();
        for indicator in indicators {
            let series = indicator.compute(bars);
            debug_assert_eq!(
                series.len(),
                bars.len(),
                "indicator '{}' produced {} values for {} bars",
                indicator.name(),
                series.len(),
                bars.len(),
            );
            iv.insert(indicator.name(), series);
        }
        iv
    }

    /// Insert a named indicator series.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    /// Raw value at a bar index (may be NaN).
    pub fn get(&self, name: &str, bar_index: usize) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.get(bar_index).copied())
    }

    /// Finite value at the last bar, `None` if missing or undefined.
    pub fn last(&self, name: &str) -> Option<f64> {
        self.series
            .get(name)
            .and_then(|v| v.last().copied())
            .and_then(finite)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{make_bars, Ema, Sma};

    #[test]
    fn indicator_values_insert_and_get() {
        let mut iv = IndicatorValues::new();
        iv.insert("sma_3", vec![f64::NAN, f64::NAN, 11.0, 12.0]);
        assert!(iv.get("sma_3", 0).unwrap().is_nan());
        assert_eq!(iv.get("sma_3", 2), Some(11.0));
        assert_eq!(iv.get("sma_3", 4), None);
        assert_eq!(iv.last("sma_3"), Some(12.0));
    }

    #[test]
    fn last_hides_nan() {
        let mut iv = IndicatorValues::new();
        iv.insert("ema_50", vec![f64::NAN; 10]);
        assert_eq!(iv.last("ema_50"), None);
        assert_eq!(iv.last("missing"), None);
    }

    #[test]
    fn precompute_stores_by_name() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let indicators: Vec<Box<dyn Indicator>> =
            vec![Box::new(Sma::new(3)), Box::new(Ema::new(3))];
        let iv = IndicatorValues::precompute(&bars, &indicators);
        assert_eq!(iv.len(), 2);
        assert!(iv.get("sma_3", 4).is_some());
        assert_eq!(iv.last("sma_3"), Some(13.0));
    }

    #[test]
    fn last_value_default_method() {
        let bars = make_bars(&[10.0, 11.0]);
        assert_eq!(Sma::new(3).last_value(&bars), None);
        assert_eq!(Sma::new(2).last_value(&bars), Some(10.5));
    }
}
