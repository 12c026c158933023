//! Indicator snapshot: the per-symbol feature vector at the last bar.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse volatility classification derived from ATR%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskColor {
    Green,
    Yellow,
    Red,
}

impl RiskColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }
}

impl fmt::Display for RiskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Features for one symbol at one reference date.
///
/// Every numeric field is either finite or `None`; NaN and infinities never
/// leave the indicator engine. `None` serializes as JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub atr_pct: Option<f64>,
    pub mom5: Option<f64>,
    pub mom20: Option<f64>,
    pub vol_z20: Option<f64>,
    pub rsi14: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub adx14: Option<f64>,
    pub macd: Option<f64>,
    pub cci20: Option<f64>,
    pub vol_trend: Option<f64>,
    pub risk_color: Option<RiskColor>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<f64>,
}

impl IndicatorSnapshot {
    /// All numeric fields, by wire name. Used by invariant checks.
    pub fn numeric_fields(&self) -> [(&'static str, Option<f64>); 15] {
        [
            ("atr_pct", self.atr_pct),
            ("mom5", self.mom5),
            ("mom20", self.mom20),
            ("vol_z20", self.vol_z20),
            ("rsi14", self.rsi14),
            ("ema20", self.ema20),
            ("ema50", self.ema50),
            ("adx14", self.adx14),
            ("macd", self.macd),
            ("cci20", self.cci20),
            ("vol_trend", self.vol_trend),
            ("close", self.close),
            ("high", self.high),
            ("low", self.low),
            ("volume", self.volume),
        ]
    }

    pub fn is_all_finite(&self) -> bool {
        self.numeric_fields()
            .iter()
            .all(|(_, v)| v.map_or(true, f64::is_finite))
    }
}

/// Indicator Engine output for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub date: NaiveDate,
    pub indicators: IndicatorSnapshot,
}
