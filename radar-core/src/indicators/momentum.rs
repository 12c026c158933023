//! Momentum: lookback return as a fraction.
//!
//! momentum[t] = close[t] / close[t-period] - 1
//! Lookback: period. Undefined where the earlier close is zero.

use super::indicator::Indicator;
use crate::domain::Bar;

#[derive(Debug, Clone)]
pub struct Momentum {
    period: usize,
    name: String,
}

impl Momentum {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "Momentum period must be >= 1");
        Self {
            period,
            name: format!("mom_{period}"),
        }
    }
}

impl Indicator for Momentum {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        for i in self.period..n {
            let prev = bars[i - self.period].close;
            let curr = bars[i].close;
            if prev == 0.0 || prev.is_nan() || curr.is_nan() {
                continue;
            }
            result[i] = curr / prev - 1.0;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn momentum_basic() {
        let bars = make_bars(&[100.0, 110.0, 105.0, 115.0]);
        let result = Momentum::new(2).compute(&bars);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert_approx(result[2], 0.05, DEFAULT_EPSILON);
        assert_approx(result[3], 115.0 / 110.0 - 1.0, DEFAULT_EPSILON);
    }

    #[test]
    fn momentum_zero_divisor_is_undefined() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0]);
        bars[0].close = 0.0;
        let result = Momentum::new(2).compute(&bars);
        assert!(result[2].is_nan());
    }

    #[test]
    fn momentum_5_on_five_bars_is_absent() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        assert_eq!(Momentum::new(5).last_value(&bars), None);
        assert_approx(
            Momentum::new(4).last_value(&bars).unwrap(),
            0.4,
            DEFAULT_EPSILON,
        );
    }

    #[test]
    fn momentum_lookback() {
        assert_eq!(Momentum::new(20).lookback(), 20);
        assert_eq!(Momentum::new(5).name(), "mom_5");
    }
}
