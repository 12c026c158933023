//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * x[t] + (1 - alpha) * EMA[t-1], alpha = 2/(n+1).
//! Seed: EMA[n-1] = SMA of the first n values.
//! Lookback: period - 1.

use super::indicator::Indicator;
use crate::domain::{Bar, BarField};

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    field: BarField,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self::of(BarField::Close, period)
    }

    pub fn of(field: BarField, period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        let name = match field {
            BarField::Close => format!("ema_{period}"),
            other => format!("ema_{}_{period}", other.as_str()),
        };
        Self {
            period,
            field,
            name,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let values: Vec<f64> = bars.iter().map(|b| b.field(self.field)).collect();
        ema_of_series(&values, self.period)
    }
}

/// EMA of a pre-extracted series.
///
/// A NaN inside the seed window leaves the whole output NaN; a NaN after the
/// seed taints every later value.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let mut sum = 0.0;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            return result;
        }
        sum += v;
    }
    let seed = sum / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        if values[i].is_nan() {
            return result;
        }
        let ema = values[i] * alpha + prev * (1.0 - alpha);
        result[i] = ema;
        prev = ema;
    }

    result
}
