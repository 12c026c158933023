//! Relative Strength Index (RSI), windowed form.
//!
//! At each index t the average gain and average loss are simple means over the
//! `period` close-to-close deltas ending at t (no Wilder carry-over).
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: no losses with some gains → 100; no movement → 50.

use super::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self::new(14)
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period + 1 {
            return result;
        }

        // changes[i] = close[i] - close[i-1]; changes[0] is undefined
        let mut changes = vec![f64::NAN; n];
        for i in 1..n {
            changes[i] = bars[i].close - bars[i - 1].close;
        }

        for t in self.period..n {
            let window = &changes[(t + 1 - self.period)..=t];
            if window.iter().any(|c| c.is_nan()) {
                continue;
            }
            let gains: f64 = window.iter().filter(|&&c| c > 0.0).sum();
            let losses: f64 = window.iter().filter(|&&c| c < 0.0).map(|c| -c).sum();
            let p = self.period as f64;
            result[t] = rsi_from_averages(gains / p, losses / p);
        }

        result
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 {
            100.0
        } else {
            50.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rsi_all_gains() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[2].is_nan());
        assert_approx(result[3], 100.0, DEFAULT_EPSILON);
        assert_approx(result[5], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[3], 0.0, DEFAULT_EPSILON);
        assert_approx(result[4], 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_is_50() {
        let bars = make_bars(&[100.0; 6]);
        let result = Rsi::new(3).compute(&bars);
        assert_approx(result[5], 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_mixed_window() {
        // deltas: +2, -1, +2, -0.5
        let bars = make_bars(&[10.0, 12.0, 11.0, 13.0, 12.5]);
        let result = Rsi::new(3).compute(&bars);
        // index 3: gains 4/3, losses 1/3 → RS = 4 → 80
        assert_approx(result[3], 80.0, DEFAULT_EPSILON);
        // index 4: gains 2/3, losses 1.5/3 → RS = 4/3 → 100 - 300/7
        assert_approx(result[4], 100.0 - 300.0 / 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_window_forgets_old_moves() {
        // A large early drop leaves the window entirely; only gains remain.
        let bars = make_bars(&[100.0, 50.0, 51.0, 52.0, 53.0]);
        let result = Rsi::new(3).compute(&bars);
        assert!(result[3] < 100.0);
        assert_approx(result[4], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_14_needs_15_bars() {
        let closes: Vec<f64> = (0..14).map(|i| 100.0 + i as f64).collect();
        assert_eq!(Rsi::default().last_value(&make_bars(&closes)), None);
        let closes: Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        assert_eq!(Rsi::default().last_value(&make_bars(&closes)), Some(100.0));
    }

    #[test]
    fn rsi_nan_in_window() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0, 106.0]);
        bars[3].close = f64::NAN;
        let result = Rsi::new(2).compute(&bars);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
        assert_approx(result[6], 100.0, DEFAULT_EPSILON);
    }
}
