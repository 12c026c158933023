//! Bar: the fundamental market data unit, and the per-symbol series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One trading day of OHLCV data for a single symbol.
///
/// Volume is a float because providers report fractional and scaled volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Which bar column an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarField {
    Close,
    High,
    Low,
    Volume,
    /// (high + low + close) / 3
    Typical,
}

impl BarField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BarField::Close => "close",
            BarField::High => "high",
            BarField::Low => "low",
            BarField::Volume => "volume",
            BarField::Typical => "typical",
        }
    }
}

impl Bar {
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn field(&self, field: BarField) -> f64 {
        match field {
            BarField::Close => self.close,
            BarField::High => self.high,
            BarField::Low => self.low,
            BarField::Volume => self.volume,
            BarField::Typical => self.typical_price(),
        }
    }
}

/// Structural errors in a bar series.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BarError {
    #[error("{symbol}: duplicate bar for {date}")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("{symbol}: bar {index} ({date}) is dated before its predecessor ({previous})")]
    OutOfOrder {
        symbol: String,
        index: usize,
        date: NaiveDate,
        previous: NaiveDate,
    },
}

/// Date-ascending bars for one symbol.
///
/// Gaps between trading days are allowed and never back-filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: String,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    /// Build a series, rejecting out-of-order or duplicate dates.
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BarError> {
        let symbol = symbol.into();
        for (i, pair) in bars.windows(2).enumerate() {
            let (prev, curr) = (pair[0].date, pair[1].date);
            if curr == prev {
                return Err(BarError::DuplicateDate { symbol, date: curr });
            }
            if curr < prev {
                return Err(BarError::OutOfOrder {
                    symbol,
                    index: i + 1,
                    date: curr,
                    previous: prev,
                });
            }
        }
        Ok(Self { symbol, bars })
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// Keep only bars dated within `[start, end]`.
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            symbol: self.symbol.clone(),
            bars: self
                .bars
                .iter()
                .filter(|b| b.date >= start && b.date <= end)
                .copied()
                .collect(),
        }
    }

}
