//! Bar provider trait and structured error types.
//!
//! The BarProvider trait abstracts over bar sources (CSV directory, in-memory
//! fixtures, synthetic generation) so the pipeline can swap implementations
//! and tests can inject failures.

use crate::domain::{BarError, BarSeries};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for per-symbol data retrieval.
///
/// A provider error never aborts a batch; the fetch stage records it against
/// the symbol and moves on.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: malformed CSV: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{symbol}: row {row}: {message}")]
    BadRow {
        symbol: String,
        row: usize,
        message: String,
    },

    #[error(transparent)]
    InvalidSeries(#[from] BarError),

    #[error("{symbol}: provider unavailable: {reason}")]
    Unavailable { symbol: String, reason: String },
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    CsvImport,
    Memory,
    Synthetic,
}

impl DataSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CsvImport => "csv_import",
            Self::Memory => "memory",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Source of daily bars.
///
/// `fetch` returns the bars of `symbol` dated within `[start, end]`, ascending.
/// An empty series is a valid answer; the caller decides whether that is an
/// error.
pub trait BarProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn source(&self) -> DataSource;

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate)
        -> Result<BarSeries, DataError>;
}
