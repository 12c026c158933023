//! Volume features: z-score against recent history and short/long trend ratio.

use super::indicator::Indicator;
use super::sma::sma_of_series;
use crate::domain::Bar;

/// Volume z-score.
///
/// z[t] = (volume[t] - mean) / std over the `period` volumes strictly before t.
/// Population standard deviation; 0 when the window is flat.
/// Lookback: period.
#[derive(Debug, Clone)]
pub struct VolumeZScore {
    period: usize,
    name: String,
}

impl VolumeZScore {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "volume z-score period must be >= 1");
        Self {
            period,
            name: format!("vol_z_{period}"),
        }
    }
}

impl Default for VolumeZScore {
    fn default() -> Self {
        Self::new(20)
    }
}

impl Indicator for VolumeZScore {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];
        let p = self.period as f64;

        for t in self.period..n {
            let window = &bars[(t - self.period)..t];
            if window.iter().any(|b| b.volume.is_nan()) || bars[t].volume.is_nan() {
                continue;
            }
            let mean = window.iter().map(|b| b.volume).sum::<f64>() / p;
            let var = window
                .iter()
                .map(|b| (b.volume - mean).powi(2))
                .sum::<f64>()
                / p;
            let std = var.sqrt();
            result[t] = if std == 0.0 {
                0.0
            } else {
                (bars[t].volume - mean) / std
            };
        }

        result
    }
}

/// Volume trend: SMA(volume, short) / SMA(volume, long) - 1.
///
/// Undefined where either average is undefined or the long average is zero.
/// Lookback: long - 1.
#[derive(Debug, Clone)]
pub struct VolumeTrend {
    short: usize,
    long: usize,
    name: String,
}

impl VolumeTrend {
    pub fn new(short: usize, long: usize) -> Self {
        assert!(short >= 1 && long >= short, "volume trend needs 1 <= short <= long");
        Self {
            short,
            long,
            name: format!("vol_trend_{short}_{long}"),
        }
    }
}

impl Default for VolumeTrend {
    fn default() -> Self {
        Self::new(5, 20)
    }
}

impl Indicator for VolumeTrend {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.long - 1
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
        let short = sma_of_series(&volumes, self.short);
        let long = sma_of_series(&volumes, self.long);
        short
            .iter()
            .zip(&long)
            .map(|(&s, &l)| if l == 0.0 { f64::NAN } else { s / l - 1.0 })
            .collect()
    }
}
