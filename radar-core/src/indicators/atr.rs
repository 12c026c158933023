//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), defined only
//! for bars that have a previous close.
//! ATR is seeded with the mean of the first `period` true ranges and then
//! Wilder-smoothed: atr = (atr * (period - 1) + tr) / period.
//! Lookback: period (needs period+1 bars).

use super::indicator::{Indicator, IndicatorError};
use crate::domain::Bar;
use crate::numeric::finite;

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    name: String,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self {
            period,
            name: format!("atr_{period}"),
        }
    }

    /// Minimum number of bars for a defined ATR.
    pub fn min_bars(&self) -> usize {
        self.period + 1
    }

    /// ATR at the last bar, failing loudly instead of returning an absent value.
    pub fn latest(&self, bars: &[Bar]) -> Result<f64, IndicatorError> {
        if bars.len() < self.min_bars() {
            return Err(IndicatorError::InsufficientHistory {
                indicator: self.name.clone(),
                required: self.min_bars(),
                available: bars.len(),
            });
        }
        self.last_value(bars).ok_or_else(|| IndicatorError::Undefined {
            indicator: self.name.clone(),
        })
    }
}

impl Default for Atr {
    fn default() -> Self {
        Self::new(14)
    }
}

/// True Range series. TR[0] is NaN (no previous close).
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let n = bars.len();
    let mut tr = vec![f64::NAN; n];

    for i in 1..n {
        let h = bars[i].high;
        let l = bars[i].low;
        let pc = bars[i - 1].close;
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    tr
}

/// Wilder smoothing of a series.
///
/// Seed: mean of the first run of `period` consecutive non-NaN values, placed
/// at the last index of that run. Afterwards s = (s * (period - 1) + x) / period.
/// A NaN after the seed taints the rest of the output.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let Some(seed_start) = first_valid_run(values, period) else {
        return result;
    };
    let seed_end = seed_start + period;

    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let p = period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = (prev * (p - 1.0) + values[i]) / p;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

/// Start index of the first run of `len` consecutive non-NaN values.
pub(crate) fn first_valid_run(values: &[f64], len: usize) -> Option<usize> {
    let mut run = 0;
    for (i, v) in values.iter().enumerate() {
        if v.is_nan() {
            run = 0;
            continue;
        }
        run += 1;
        if run == len {
            return Some(i + 1 - len);
        }
    }
    None
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        wilder_smooth(&true_range(bars), self.period)
    }

    fn last_value(&self, bars: &[Bar]) -> Option<f64> {
        if bars.len() < self.min_bars() {
            return None;
        }
        self.compute(bars).last().copied().and_then(finite)
    }
}
