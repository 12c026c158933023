//! Indicator Computation Engine.
//!
//! Turns one symbol's bar series into an [`IndicatorSnapshot`] anchored at the
//! last bar. The engine is a pure function of its input series: it holds only
//! the indicator set and thresholds, never per-run state, so one instance can
//! be shared across worker threads.
//!
//! Failure policy:
//! - zero bars is an error (no snapshot at all);
//! - a feature without enough history is `None`;
//! - ATR with fewer than 15 bars is an error, but it is reported next to a
//!   snapshot with every other feature filled in ([`SnapshotOutcome`]).

pub mod risk;

pub use risk::RiskThresholds;

use crate::domain::{BarSeries, IndicatorSnapshot, SymbolSnapshot};
use crate::indicators::{
    Adx, AdxSeed, Atr, Cci, Ema, Indicator, IndicatorError, IndicatorValues, Macd, Momentum,
    Rsi, VolumeTrend, VolumeZScore,
};
use crate::numeric::finite;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Knobs of the indicator engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    #[serde(default)]
    pub risk: RiskThresholds,
    #[serde(default)]
    pub adx_seed: AdxSeed,
}

/// A snapshot plus the ATR failure, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotOutcome {
    pub snapshot: SymbolSnapshot,
    pub atr_error: Option<IndicatorError>,
}

impl SnapshotOutcome {
    /// The snapshot, or the ATR error if ATR could not be computed.
    pub fn into_result(self) -> Result<SymbolSnapshot, IndicatorError> {
        match self.atr_error {
            Some(e) => Err(e),
            None => Ok(self.snapshot),
        }
    }
}

/// Computes the fixed feature set for one symbol at a time.
pub struct IndicatorEngine {
    config: SnapshotConfig,
    atr: Atr,
    indicators: Vec<Box<dyn Indicator>>,
    names: FeatureNames,
}

/// Series keys of the precomputed indicators, captured at construction.
struct FeatureNames {
    mom5: String,
    mom20: String,
    vol_z20: String,
    rsi14: String,
    ema20: String,
    ema50: String,
    adx14: String,
    macd: String,
    cci20: String,
    vol_trend: String,
}

impl IndicatorEngine {
    pub fn new(config: SnapshotConfig) -> Self {
        let indicators: Vec<Box<dyn Indicator>> = vec![
            Box::new(Momentum::new(5)),
            Box::new(Momentum::new(20)),
            Box::new(VolumeZScore::new(20)),
            Box::new(Rsi::new(14)),
            Box::new(Ema::new(20)),
            Box::new(Ema::new(50)),
            Box::new(Adx::with_seed(14, config.adx_seed)),
            Box::new(Macd::new(12, 26)),
            Box::new(Cci::new(20)),
            Box::new(VolumeTrend::new(5, 20)),
        ];
        let name = |i: usize| indicators[i].name().to_string();
        let names = FeatureNames {
            mom5: name(0),
            mom20: name(1),
            vol_z20: name(2),
            rsi14: name(3),
            ema20: name(4),
            ema50: name(5),
            adx14: name(6),
            macd: name(7),
            cci20: name(8),
            vol_trend: name(9),
        };
        Self {
            config,
            atr: Atr::new(14),
            indicators,
            names,
        }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// The precomputed indicator set, in computation order.
    pub fn indicators(&self) -> &[Box<dyn Indicator>] {
        &self.indicators
    }

    /// Compute the snapshot at the last bar of `series`.
    pub fn compute(&self, series: &BarSeries) -> Result<SnapshotOutcome, IndicatorError> {
        let bars = series.bars.as_slice();
        let Some(last) = bars.last() else {
            return Err(IndicatorError::EmptySeries);
        };

        let values = IndicatorValues::precompute(bars, &self.indicators);

        let (atr_pct, atr_error) = match self.atr.latest(bars) {
            Ok(atr) => {
                let pct = if last.close > 0.0 {
                    finite(atr / last.close)
                } else {
                    None
                };
                (pct, None)
            }
            Err(e) => (None, Some(e)),
        };

        let n = &self.names;
        let indicators = IndicatorSnapshot {
            atr_pct,
            mom5: values.last(&n.mom5),
            mom20: values.last(&n.mom20),
            vol_z20: values.last(&n.vol_z20),
            rsi14: values.last(&n.rsi14),
            ema20: values.last(&n.ema20),
            ema50: values.last(&n.ema50),
            adx14: values.last(&n.adx14),
            macd: values.last(&n.macd),
            cci20: values.last(&n.cci20),
            vol_trend: values.last(&n.vol_trend),
            risk_color: self.config.risk.classify(atr_pct),
            close: finite(last.close),
            high: finite(last.high),
            low: finite(last.low),
            volume: finite(last.volume),
        };

        debug!(
            symbol = %series.symbol,
            bars = bars.len(),
            date = %last.date,
            atr_ok = atr_error.is_none(),
            "computed indicator snapshot"
        );

        Ok(SnapshotOutcome {
            snapshot: SymbolSnapshot {
                symbol: series.symbol.clone(),
                date: last.date,
                indicators,
            },
            atr_error,
        })
    }
}

impl Default for IndicatorEngine {
    fn default() -> Self {
        Self::new(SnapshotConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, RiskColor};
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    fn series(closes: &[f64]) -> BarSeries {
        BarSeries::new("TEST", make_bars(closes)).unwrap()
    }

    #[test]
    fn empty_series_is_an_error() {
        let empty = BarSeries::new("NONE", Vec::<Bar>::new()).unwrap();
        assert_eq!(
            IndicatorEngine::default().compute(&empty).unwrap_err(),
            IndicatorError::EmptySeries
        );
    }

    #[test]
    fn full_history_populates_every_field() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + i as f64 * 0.5 + (i as f64 * 0.7).sin())
            .collect();
        let outcome = IndicatorEngine::default().compute(&series(&closes)).unwrap();
        assert!(outcome.atr_error.is_none());
        let ind = &outcome.snapshot.indicators;
        for (name, value) in ind.numeric_fields() {
            assert!(value.is_some(), "{name} should be populated");
        }
        assert!(ind.risk_color.is_some());
        assert!(ind.is_all_finite());
        assert_eq!(outcome.snapshot.date, make_bars(&closes)[79].date);
    }

    #[test]
    fn atr_pct_is_atr_over_close() {
        // make_bars on a +1/day ramp: TR = 3 everywhere
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let snap = IndicatorEngine::default()
            .compute(&series(&closes))
            .unwrap()
            .into_result()
            .unwrap();
        assert_approx(snap.indicators.atr_pct.unwrap(), 3.0 / 129.0, DEFAULT_EPSILON);
        assert_eq!(snap.indicators.risk_color, Some(RiskColor::Green));
    }

    #[test]
    fn risk_thresholds_are_applied() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let engine = IndicatorEngine::new(SnapshotConfig {
            risk: RiskThresholds::new(0.01, 0.03),
            ..Default::default()
        });
        let snap = engine.compute(&series(&closes)).unwrap().snapshot;
        assert_eq!(snap.indicators.risk_color, Some(RiskColor::Yellow));
    }

    #[test]
    fn non_positive_close_leaves_atr_pct_absent() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let mut bars = make_bars(&closes);
        bars[19].close = 0.0;
        let s = BarSeries::new("ZERO", bars).unwrap();
        let outcome = IndicatorEngine::default().compute(&s).unwrap();
        assert!(outcome.atr_error.is_none());
        assert_eq!(outcome.snapshot.indicators.atr_pct, None);
        assert_eq!(outcome.snapshot.indicators.risk_color, None);
    }

    #[test]
    fn short_series_reports_atr_error_with_partial_snapshot() {
        let outcome = IndicatorEngine::default()
            .compute(&series(&[10.0, 11.0, 12.0, 13.0, 14.0]))
            .unwrap();
        assert!(matches!(
            outcome.atr_error,
            Some(IndicatorError::InsufficientHistory { required: 15, available: 5, .. })
        ));
        let ind = &outcome.snapshot.indicators;
        assert_eq!(ind.close, Some(14.0));
        assert_eq!(ind.rsi14, None);
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn engine_is_reusable_and_deterministic() {
        let engine = IndicatorEngine::default();
        let closes: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64).sqrt()).collect();
        let s = series(&closes);
        assert_eq!(engine.compute(&s).unwrap(), engine.compute(&s).unwrap());
    }

    #[test]
    fn adx_seed_choice_changes_history_requirement() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let first = IndicatorEngine::default().compute(&series(&closes)).unwrap();
        assert!(first.snapshot.indicators.adx14.is_some());

        let textbook = IndicatorEngine::new(SnapshotConfig {
            adx_seed: AdxSeed::MeanOfPeriod,
            ..Default::default()
        });
        let second = textbook.compute(&series(&closes)).unwrap();
        assert_eq!(second.snapshot.indicators.adx14, None);
    }
}
