//! CSV directory provider.
//!
//! One file per symbol at `<dir>/<SYMBOL>.csv` with the header
//! `date,open,high,low,close,volume`. Dates are ISO (`YYYY-MM-DD`, anything
//! after the tenth character is ignored). Rows may be in any order; duplicate
//! dates are rejected.

use super::provider::{BarProvider, DataError, DataSource};
use crate::domain::{Bar, BarSeries};
use crate::numeric::parse_date_str;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct CsvDirProvider {
    dir: PathBuf,
}

impl CsvDirProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `<dir>/<symbol>.csv`, falling back to the uppercase file name.
    fn path_for(&self, symbol: &str) -> Option<PathBuf> {
        let exact = self.dir.join(format!("{symbol}.csv"));
        if exact.is_file() {
            return Some(exact);
        }
        let upper = self.dir.join(format!("{}.csv", symbol.to_ascii_uppercase()));
        upper.is_file().then_some(upper)
    }

    /// Read and validate the whole file for `symbol`.
    pub fn read_all(&self, symbol: &str) -> Result<BarSeries, DataError> {
        let path = self.path_for(symbol).ok_or_else(|| DataError::SymbolNotFound {
            symbol: symbol.to_string(),
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|source| DataError::Csv {
                path: path.clone(),
                source,
            })?;

        let mut bars = Vec::new();
        for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
            let row = record.map_err(|source| DataError::Csv {
                path: path.clone(),
                source,
            })?;
            bars.push(row_to_bar(symbol, i + 1, row)?);
        }

        bars.sort_by_key(|b| b.date);
        Ok(BarSeries::new(symbol, bars)?)
    }
}

fn row_to_bar(symbol: &str, row_no: usize, row: CsvRow) -> Result<Bar, DataError> {
    let bad = |message: String| DataError::BadRow {
        symbol: symbol.to_string(),
        row: row_no,
        message,
    };
    let date = parse_date_str(&row.date).ok_or_else(|| bad(format!("bad date '{}'", row.date)))?;
    let price = |name: &str, v: Option<f64>| v.ok_or_else(|| bad(format!("missing {name}")));
    Ok(Bar {
        date,
        open: price("open", row.open)?,
        high: price("high", row.high)?,
        low: price("low", row.low)?,
        close: price("close", row.close)?,
        volume: row.volume.unwrap_or(0.0),
    })
}

impl BarProvider for CsvDirProvider {
    fn name(&self) -> &str {
        "csv_dir"
    }

    fn source(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<BarSeries, DataError> {
        Ok(self.read_all(symbol)?.window(start, end))
    }
}
