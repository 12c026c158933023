//! Fetch stage: bars for every requested symbol over the lookback window.
//!
//! The window is `[as_of - lookback_days, as_of]` in calendar days, both ends
//! inclusive. Each symbol is fetched on its own; a failure or an empty answer
//! is recorded against that symbol and the batch moves on. The stage reports
//! `OK` when at least one symbol returned bars and `ERROR` otherwise, including
//! when no symbols were requested.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use radar_core::data::{BarProvider, DataError, DataSource};
use radar_core::domain::{BarSeries, DatasetHash};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DEFAULT_LOOKBACK_DAYS;

/// Errors that stop the fetch stage before any provider call.
#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("lookback_days must be >= 0, got {days}")]
    NegativeLookback { days: i64 },

    #[error("lookback of {days} days before {as_of} is out of the calendar range")]
    DateOutOfRange { as_of: NaiveDate, days: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FetchStatus {
    Ok,
    Error,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOptions {
    pub as_of: NaiveDate,
    pub lookback_days: i64,
}

impl FetchOptions {
    pub fn new(as_of: NaiveDate) -> Self {
        Self {
            as_of,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }

    pub fn with_lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = days;
        self
    }

    /// Inclusive `(start, end)` dates of the window.
    pub fn window(&self) -> Result<(NaiveDate, NaiveDate), FetchError> {
        if self.lookback_days < 0 {
            return Err(FetchError::NegativeLookback {
                days: self.lookback_days,
            });
        }
        let start = Duration::try_days(self.lookback_days)
            .and_then(|d| self.as_of.checked_sub_signed(d))
            .ok_or(FetchError::DateOutOfRange {
                as_of: self.as_of,
                days: self.lookback_days,
            })?;
        Ok((start, self.as_of))
    }
}

/// Output of the fetch stage.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub status: FetchStatus,
    pub as_of: NaiveDate,
    pub lookback_days: i64,
    /// Symbols requested, in request order.
    pub symbols: Vec<String>,
    /// Non-empty series by symbol.
    pub data: BTreeMap<String, BarSeries>,
    pub sources: BTreeMap<String, DataSource>,
    /// One message per failed or empty symbol, or a batch-level message.
    pub errors: Vec<String>,
    pub dataset_hash: DatasetHash,
}

impl FetchReport {
    pub fn is_ok(&self) -> bool {
        self.status == FetchStatus::Ok
    }
}

/// The serializable part of a [`FetchReport`], without the bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchSummary {
    pub status: FetchStatus,
    pub as_of: NaiveDate,
    pub lookback_days: i64,
    pub symbols: Vec<String>,
    /// Bars per fetched symbol.
    pub bar_counts: BTreeMap<String, usize>,
    pub errors: Vec<String>,
}

impl From<&FetchReport> for FetchSummary {
    fn from(r: &FetchReport) -> Self {
        Self {
            status: r.status,
            as_of: r.as_of,
            lookback_days: r.lookback_days,
            symbols: r.symbols.clone(),
            bar_counts: r.data.iter().map(|(s, series)| (s.clone(), series.len())).collect(),
            errors: r.errors.clone(),
        }
    }
}

/// Fetch bars for `symbols` from `provider`.
///
/// Duplicate symbols are fetched once.
pub fn fetch_bars(
    symbols: &[String],
    provider: &dyn BarProvider,
    opts: &FetchOptions,
) -> Result<FetchReport, FetchError> {
    let (start, end) = opts.window()?;

    let mut data: BTreeMap<String, BarSeries> = BTreeMap::new();
    let mut sources: BTreeMap<String, DataSource> = BTreeMap::new();
    let mut errors: Vec<String> = Vec::new();

    if symbols.is_empty() {
        errors.push("no symbols provided".to_string());
    }

    for symbol in symbols {
        if data.contains_key(symbol) {
            continue;
        }
        match provider.fetch(symbol, start, end) {
            Ok(series) if series.is_empty() => {
                warn!(symbol = %symbol, provider = provider.name(), "no data returned");
                errors.push(format!("{symbol}: no data returned"));
            }
            Ok(series) => {
                debug!(symbol = %symbol, bars = series.len(), "fetched");
                data.insert(symbol.clone(), series);
                sources.insert(symbol.clone(), provider.source());
            }
            Err(e) => {
                warn!(symbol = %symbol, provider = provider.name(), error = %e, "fetch failed");
                errors.push(describe(symbol, &e));
            }
        }
    }

    let status = if data.is_empty() {
        FetchStatus::Error
    } else {
        FetchStatus::Ok
    };
    let dataset_hash = compute_dataset_hash(&data);

    info!(
        status = status.as_str(),
        requested = symbols.len(),
        fetched = data.len(),
        failed = errors.len(),
        start = %start,
        end = %end,
        "fetch complete"
    );

    Ok(FetchReport {
        status,
        as_of: opts.as_of,
        lookback_days: opts.lookback_days,
        symbols: symbols.to_vec(),
        data,
        sources,
        errors,
        dataset_hash,
    })
}

/// Error text prefixed with the symbol where the error itself does not name it.
fn describe(symbol: &str, err: &DataError) -> String {
    match err {
        DataError::Io { .. } | DataError::Csv { .. } => format!("{symbol}: {err}"),
        _ => err.to_string(),
    }
}

/// Deterministic BLAKE3 hash over all fetched bars.
///
/// Covers the symbol, date and OHLCV of every bar in sorted symbol order, so it
/// is independent of fetch order.
pub fn compute_dataset_hash(data: &BTreeMap<String, BarSeries>) -> DatasetHash {
    let mut hasher = blake3::Hasher::new();

    for (symbol, series) in data {
        hasher.update(symbol.as_bytes());
        for bar in &series.bars {
            hasher.update(bar.date.to_string().as_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
    }

    DatasetHash(hasher.finalize().to_hex().to_string())
}
