//! Concrete indicator implementations.
//!
//! Every indicator implements the `Indicator` trait and produces a full series
//! (NaN where undefined). The snapshot engine precomputes them once per symbol
//! and reads the value at the last bar.
//!
//! Series helpers (`sma_of_series`, `ema_of_series`, `wilder_smooth`) work on
//! plain `f64` slices so composed indicators (MACD, CCI, ADX, volume trend) can
//! reuse them on derived columns.

pub mod adx;
pub mod atr;
pub mod cci;
pub mod ema;
pub mod indicator;
pub mod macd;
pub mod momentum;
pub mod rsi;
pub mod sma;
pub mod volume;

pub use adx::{Adx, AdxSeed};
pub use atr::Atr;
pub use cci::Cci;
pub use ema::Ema;
pub use indicator::{Indicator, IndicatorError, IndicatorValues};
pub use macd::Macd;
pub use momentum::Momentum;
pub use rsi::Rsi;
pub use sma::Sma;
pub use volume::{VolumeTrend, VolumeZScore};

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples, volume = 1000.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Create bars with flat prices and the given volumes.
#[cfg(test)]
pub fn make_volume_bars(volumes: &[f64]) -> Vec<crate::domain::Bar> {
    use crate::domain::Bar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    volumes
        .iter()
        .enumerate()
        .map(|(i, &volume)| Bar {
            date: base_date + chrono::Duration::days(i as i64),
            open: 100.0,
            high: 101.0,
            low: 99.0,
            close: 100.0,
            volume,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
