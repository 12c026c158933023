//! Candidate rows: the loose wire form and the typed scoring input.

use crate::domain::SymbolSnapshot;
use crate::numeric::{parse_date, parse_numeric};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A candidate row as it arrives from files or upstream services.
///
/// Every field is an arbitrary JSON value; nothing is interpreted until
/// [`CandidateRow::parse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCandidate {
    pub date: Value,
    pub symbol: Value,
    pub ticker: Value,
    pub code: Value,
    pub volume: Value,
    pub atr_pct: Value,
    pub atr: Value,
    pub mom_5d: Value,
    pub mom_20d: Value,
    pub vol_z20: Value,
    pub rsi_14: Value,
    pub macd: Value,
    pub adx14: Value,
    pub cci20: Value,
    pub vol_trend: Value,
    pub close: Value,
    pub ema20: Value,
    pub ema50: Value,
    pub sector: Value,
}

fn non_empty_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl RawCandidate {
    /// First usable identifier among `symbol`, `ticker`, `code`.
    pub fn symbol(&self) -> Option<String> {
        [&self.symbol, &self.ticker, &self.code]
            .into_iter()
            .find_map(non_empty_text)
    }

    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    /// `atr_pct`, falling back to `atr` when the former is null or missing.
    fn atr_value(&self) -> &Value {
        if self.atr_pct.is_null() {
            &self.atr
        } else {
            &self.atr_pct
        }
    }
}

/// Typed scoring input. Numeric fields are finite or `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub date: NaiveDate,
    pub symbol: String,
    pub volume: Option<f64>,
    pub atr_pct: Option<f64>,
    pub mom_5d: Option<f64>,
    pub mom_20d: Option<f64>,
    pub vol_z20: Option<f64>,
    pub rsi_14: Option<f64>,
    pub macd: Option<f64>,
    pub adx14: Option<f64>,
    pub cci20: Option<f64>,
    pub vol_trend: Option<f64>,
    pub close: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub sector: Option<String>,
}

impl CandidateRow {
    /// Parse and validate a raw row.
    ///
    /// Rows without a symbol or a readable date yield `None`. Malformed
    /// numerics become absent; a negative ATR% is treated as absent.
    pub fn parse(raw: &RawCandidate) -> Option<Self> {
        let symbol = raw.symbol()?;
        let date = raw.date()?;
        let num = parse_numeric;
        Some(Self {
            date,
            symbol,
            volume: num(&raw.volume),
            atr_pct: num(raw.atr_value()).filter(|v| *v >= 0.0),
            mom_5d: num(&raw.mom_5d),
            mom_20d: num(&raw.mom_20d),
            vol_z20: num(&raw.vol_z20),
            rsi_14: num(&raw.rsi_14),
            macd: num(&raw.macd),
            adx14: num(&raw.adx14),
            cci20: num(&raw.cci20),
            vol_trend: num(&raw.vol_trend),
            close: num(&raw.close),
            ema20: num(&raw.ema20),
            ema50: num(&raw.ema50),
            sector: non_empty_text(&raw.sector),
        })
    }

    /// Build a row straight from an indicator snapshot.
    pub fn from_snapshot(snapshot: &SymbolSnapshot, sector: Option<String>) -> Self {
        let ind = &snapshot.indicators;
        Self {
            date: snapshot.date,
            symbol: snapshot.symbol.clone(),
            volume: ind.volume,
            atr_pct: ind.atr_pct.filter(|v| *v >= 0.0),
            mom_5d: ind.mom5,
            mom_20d: ind.mom20,
            vol_z20: ind.vol_z20,
            rsi_14: ind.rsi14,
            macd: ind.macd,
            adx14: ind.adx14,
            cci20: ind.cci20,
            vol_trend: ind.vol_trend,
            close: ind.close,
            ema20: ind.ema20,
            ema50: ind.ema50,
            sector,
        }
    }
}

impl From<&SymbolSnapshot> for CandidateRow {
    fn from(snapshot: &SymbolSnapshot) -> Self {
        Self::from_snapshot(snapshot, None)
    }
}
