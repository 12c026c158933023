//! ADX: Average Directional Index (Wilder DMI).
//!
//! Steps:
//! 1. +DM, -DM and TR for every bar that has a predecessor (index 1..)
//! 2. Running sums seeded over indices 1..=period, then S = S - S/period + x
//! 3. +DI = 100 * S(+DM) / S(TR), -DI = 100 * S(-DM) / S(TR)
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = Wilder-smoothed DX, seeded according to [`AdxSeed`]
//!
//! Lookback: period with `AdxSeed::FirstDx`, 2*period - 1 with
//! `AdxSeed::MeanOfPeriod`.

use super::atr::true_range;
use super::indicator::Indicator;
use crate::domain::Bar;
use serde::{Deserialize, Serialize};

/// How the ADX recurrence is started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdxSeed {
    /// The first ADX value is the first raw DX. Matches the historical
    /// screener output.
    #[default]
    FirstDx,
    /// Textbook Wilder: the first ADX is the mean of the first `period` DX
    /// values.
    MeanOfPeriod,
}

#[derive(Debug, Clone)]
pub struct Adx {
    period: usize,
    seed: AdxSeed,
    name: String,
}

impl Adx {
    pub fn new(period: usize) -> Self {
        Self::with_seed(period, AdxSeed::default())
    }

    pub fn with_seed(period: usize, seed: AdxSeed) -> Self {
        assert!(period >= 1, "ADX period must be >= 1");
        Self {
            period,
            seed,
            name: format!("adx_{period}"),
        }
    }
}

impl Default for Adx {
    fn default() -> Self {
        Self::new(14)
    }
}

/// Directional movement for bar i relative to bar i-1.
fn directional_movement(prev: &Bar, curr: &Bar) -> (f64, f64) {
    let up = curr.high - prev.high;
    let down = prev.low - curr.low;
    let plus = if up > down && up > 0.0 { up } else { 0.0 };
    let minus = if down > up && down > 0.0 { down } else { 0.0 };
    (plus, minus)
}

fn dx_from_sums(tr_sum: f64, plus_sum: f64, minus_sum: f64) -> f64 {
    let (plus_di, minus_di) = if tr_sum == 0.0 {
        (0.0, 0.0)
    } else {
        (100.0 * plus_sum / tr_sum, 100.0 * minus_sum / tr_sum)
    };
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        0.0
    } else {
        100.0 * (plus_di - minus_di).abs() / di_sum
    }
}

impl Adx {
    /// Raw DX series; defined from index `period`.
    pub fn dx_series(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let p = self.period;
        let mut dx = vec![f64::NAN; n];

        if n < p + 1 {
            return dx;
        }

        let tr = true_range(bars);
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];
        for i in 1..n {
            let (plus, minus) = directional_movement(&bars[i - 1], &bars[i]);
            plus_dm[i] = plus;
            minus_dm[i] = minus;
        }

        let mut tr_sum: f64 = tr[1..=p].iter().sum();
        let mut plus_sum: f64 = plus_dm[1..=p].iter().sum();
        let mut minus_sum: f64 = minus_dm[1..=p].iter().sum();
        dx[p] = dx_from_sums(tr_sum, plus_sum, minus_sum);

        let pf = p as f64;
        for i in (p + 1)..n {
            tr_sum = tr_sum - tr_sum / pf + tr[i];
            plus_sum = plus_sum - plus_sum / pf + plus_dm[i];
            minus_sum = minus_sum - minus_sum / pf + minus_dm[i];
            dx[i] = dx_from_sums(tr_sum, plus_sum, minus_sum);
        }

        dx
    }
}

impl Indicator for Adx {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        match self.seed {
            AdxSeed::FirstDx => self.period,
            AdxSeed::MeanOfPeriod => 2 * self.period - 1,
        }
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        let start = self.lookback();
        if n <= start {
            return result;
        }

        let dx = self.dx_series(bars);
        let p = self.period as f64;

        let mut adx = match self.seed {
            AdxSeed::FirstDx => dx[start],
            AdxSeed::MeanOfPeriod => dx[self.period..=start].iter().sum::<f64>() / p,
        };
        result[start] = adx;

        for i in (start + 1)..n {
            adx = (adx * (p - 1.0) + dx[i]) / p;
            result[i] = adx;
        }

        result
    }
}
