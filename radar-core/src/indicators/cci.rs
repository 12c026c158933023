//! Commodity Channel Index (CCI).
//!
//! tp = (high + low + close) / 3
//! CCI = (tp - SMA(tp)) / (0.015 * mean_abs_dev(tp)), 0 when the deviation is 0.
//! Lookback: period - 1.

use super::indicator::Indicator;
use super::sma::sma_of_series;
use crate::domain::{Bar, BarField};

/// Lambert's scaling constant.
const CCI_SCALE: f64 = 0.015;

#[derive(Debug, Clone)]
pub struct Cci {
    period: usize,
    name: String,
}

impl Cci {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "CCI period must be >= 1");
        Self {
            period,
            name: format!("cci_{period}"),
        }
    }
}

impl Default for Cci {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Indicator for Cci {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let tp: Vec<f64> = bars.iter().map(|b| b.field(BarField::Typical)).collect();
        let mean = sma_of_series(&tp, self.period);
        let mut result = vec![f64::NAN; tp.len()];

        for (i, &m) in mean.iter().enumerate() {
            if m.is_nan() {
                continue;
            }
            let window = &tp[(i + 1 - self.period)..=i];
            let mean_dev = window.iter().map(|x| (x - m).abs()).sum::<f64>() / self.period as f64;
            result[i] = if mean_dev == 0.0 {
                0.0
            } else {
                (tp[i] - m) / (CCI_SCALE * mean_dev)
            };
        }

        result
    }
}
